//! Shared name → year → id collection loop used by both student flows

use super::prompts;
use super::state::{IntakeField, Student, StudentIntake, MAX_STUDENTS, MIN_STUDENTS};

/// Outcome of feeding one answer into a [`StudentIntake`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeProgress {
    /// More answers needed; `prompt` asks for the next one
    Continue {
        intake: StudentIntake,
        prompt: String,
    },
    /// Every record is complete, in submission order
    Complete(Vec<Student>),
}

impl StudentIntake {
    /// Prompt that opens the intake (first student's name)
    pub fn opening_prompt(&self) -> String {
        prompts::student_name(self.current_index(), self.count)
    }

    /// Record `answer` as the field currently awaited and advance
    pub fn accept(mut self, answer: &str) -> IntakeProgress {
        let index = self.current_index();
        let answer = answer.to_string();

        match self.awaiting {
            IntakeField::Name => {
                self.awaiting = IntakeField::Year { name: answer };
                IntakeProgress::Continue {
                    intake: self,
                    prompt: prompts::student_year(index),
                }
            }
            IntakeField::Year { name } => {
                self.awaiting = IntakeField::Id { name, year: answer };
                IntakeProgress::Continue {
                    intake: self,
                    prompt: prompts::student_id(index),
                }
            }
            IntakeField::Id { name, year } => {
                self.students.push(Student {
                    name,
                    year,
                    id: answer,
                });
                if self.students.len() < usize::from(self.count) {
                    self.awaiting = IntakeField::Name;
                    let prompt = prompts::student_name(self.current_index(), self.count);
                    IntakeProgress::Continue {
                        intake: self,
                        prompt,
                    }
                } else {
                    IntakeProgress::Complete(self.students)
                }
            }
        }
    }
}

/// Parse a student count the way a lenient integer prompt would: leading
/// whitespace, an optional sign, then the leading run of digits. Anything
/// outside `MIN_STUDENTS..=MAX_STUDENTS` is rejected.
pub fn parse_student_count(text: &str) -> Option<u8> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let leading: String = digits.chars().take_while(char::is_ascii_digit).collect();
    if leading.is_empty() || negative {
        return None;
    }

    // Overlong digit runs are out of range anyway
    let value: u32 = leading.parse().ok()?;
    u8::try_from(value)
        .ok()
        .filter(|count| (MIN_STUDENTS..=MAX_STUDENTS).contains(count))
}
