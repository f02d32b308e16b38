//! Reply copy sent by the assistant

use super::state::{Requirement, Student};
use std::fmt::Write;

pub const WELCOME: &str = "🏛️ *Welcome to Imperial College Egypt*\n*Finance Department Assistant*\n\n📋 **How can we help you today?**\n\nPlease choose:\n\n*1* - Request information/documents\n*2* - Submit payment receipt\n*3* - Our payment plans & Deadlines\n*4* - Contact finance team\n\nType the number of your choice.";

pub const RESET: &str = "🏛️ *Imperial College Egypt - Finance Department*\n\nLet's start over. How can we help you today?\n\n*1* - Request information\n*2* - Submit payment receipt\n*3* - Payment plans & deadlines\n*4* - Contact finance team";

pub const REACTIVATED: &str = "🤖 **Assistant Reactivated**\n\nI'm back online and ready to take your request once again!";

pub const RECEIPT_ACKNOWLEDGED: &str = "🏛️ *Imperial College Egypt - Finance Department*\n\n✅ Thank you for your payment submission.\n\n⏳ **Please wait for confirmation**\n\nOur finance team will review your payment and get back to you shortly.\n\n📞 For urgent matters, please contact the finance office directly.";

pub const INVALID_SERVICE: &str = "❌ Invalid choice. Please type:\n*1* For information request\n*2* For payment receipt\n*3* For payment plans & deadlines\n*4* To contact finance team";

pub const INFO_COUNT: &str = "📝 **Information Request**\n\nHow many students do you need information for?\n\nPlease type the number (e.g., 1, 2, 3...)";

pub const RECEIPT_INSTRUCTIONS: &str = "📎 **Payment Receipt Submission**\n\nPlease send your payment receipt/proof as:\n• Photo\n• Document\n• Or type details in your message\n\nWe'll confirm receipt shortly.\n\n⏳ **Please wait for someone from our team to contact you.**\n\n🤖 *Assistant service ended. It will be restarted after reviewing you request.*";

pub const PAYMENT_PLANS: &str = "💰 **Payment Plans & Deadlines**\n\n📅 **Academic Year Payment Schedule:**\n\n🔸 **1st Installment 40%** - July\nBeginning from 01-06-20XX To 15-06-20XX\n\n🔸 **2nd Installment 30%** - September\nBeginning from 01-09-20XX To 15-09-20XX\n\n🔸 **3rd Installment 30%** - December\nBeginning from 01-12-20XX To 15-12-20XX\n\n📞 For specific dates and detailed information, please contact our finance team.\n\n🏛️ *Imperial College Egypt - Finance Department*";

pub const CONTACT_TYPE: &str = "💬 **Contact Finance Team**\n\nPlease specify your relation:\n\n*1* - Parent\n*2* - Supplier (مورد)\n\nType the number of your choice.";

pub const INVALID_CONTACT_TYPE: &str = "❌ Invalid choice. Please type:\n*1* For Parent\n*2* For Supplier (مورد)";

pub const SUPPLIER_CONTACT: &str = "💬 **Contact Finance Team**\n\n🏢 **Office Location:** Finance Department\n⏰ **Working Hours:** Sunday-Thursday, 9 AM - 2 PM\n📧 **Email:** finance@imperialcollegeegypt.edu.eg\n📱 **Phone:** +20 10 5023 9220\n\n⏳ **Please wait for someone from our team to contact you.**\n\n🤖 *Assistant service ended. It will be restarted after reviewing you request.*";

pub const PARENT_COUNT: &str = "📝 **Parent Request**\n\nHow many students do you have at Imperial College Egypt?\n\nPlease type the number (e.g., 1, 2, 3...)";

pub const INVALID_COUNT: &str = "❌ Please enter a valid number between 1 and 10.";

pub const REQUIREMENT: &str = "📋 **What do you need from us?**\n\nPlease choose:\n\n*1* - Payment Order\n*2* - Payment Link\n*3* - Other (Someone from our team will be with you as soons as possible)\n\nType the number of your choice.";

pub const INVALID_REQUIREMENT: &str = "❌ Invalid choice. Please type:\n*1* For Payment Order\n*2* For Payment Link\n*3* For Other(Team Contact)";

pub const PARENT_CONTACT: &str = "💬 **Finance Department**\n\n⏰ **(Summer)Working Hours:** Sunday-Thursday, 9 AM - 2 PM\n📧 **Email:** finance@imperialcollegeegypt.edu.eg\n📱 **Phone:** +20 10 5023 9220";

const SERVICE_ENDED: &str = "⏳ **Someone from our finance team will get back to you shortly.**\n\n🤖 *Assistant service ended. It will be restarted after reviewing you request.*\n\n🏛️ *Imperial College Egypt - Finance Department*";

/// Header for student `index` (zero-based) of `count`, asking for the name
pub fn student_name(index: usize, count: u8) -> String {
    format!(
        "📝 **Student {} of {count}**\n\n👤 **Student Full Name:**",
        index + 1
    )
}

pub fn student_year(index: usize) -> String {
    format!(
        "📅 **Student {} Academic Year/Section:**\n\nExample: Y1 British, G1 American, etc.",
        index + 1
    )
}

pub fn student_id(index: usize) -> String {
    format!("🆔 **Student {} ID Number:**", index + 1)
}

fn push_students(out: &mut String, students: &[Student]) {
    for (index, student) in students.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "**Student {}:**\n👤 **Name:** {}\n📅 **Year:** {}\n🆔 **ID:** {}\n\n",
            index + 1,
            student.name,
            student.year,
            student.id
        );
    }
}

/// Closing summary of the info-request flow
pub fn request_summary(students: &[Student], requirement: Requirement) -> String {
    let mut out = String::from("📋 **Request Summary**\n\n");
    push_students(&mut out, students);
    let _ = write!(out, "📋 **Request:** {}\n\n", requirement.label());
    if requirement != Requirement::TeamContact {
        out.push_str(
            "✅ **Your request has been recorded.**\n\n⏳ **Please wait while we process your request.**\n\n",
        );
    }
    out.push_str(SERVICE_ENDED);
    out
}

/// Closing summary of the parent-contact flow, sent after [`PARENT_CONTACT`]
pub fn student_details(students: &[Student]) -> String {
    let mut out = String::from("📋 **Student Details**\n\n");
    push_students(&mut out, students);
    out.push_str(SERVICE_ENDED);
    out
}
