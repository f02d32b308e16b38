//! Credential bootstrap
//!
//! Hosts without a persistent disk ship the bridge's auth directory as a
//! base64-encoded tarball in `AUTH_B64`. It is unpacked into the working
//! directory before anything connects.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Name of the archive written next to the extracted files
pub const ARCHIVE_NAME: &str = "auth.tar.gz";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("AUTH_B64 is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to run tar: {0}")]
    Spawn(std::io::Error),
    #[error("tar exited with {status}: {stderr}")]
    Extract { status: String, stderr: String },
}

/// Restore credentials from `AUTH_B64` if it is set
pub async fn restore_from_env(dir: &Path) -> Result<bool, BootstrapError> {
    match std::env::var("AUTH_B64") {
        Ok(encoded) if !encoded.trim().is_empty() => {
            restore(&encoded, dir).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Decode `encoded` into `dir/auth.tar.gz` and extract it in `dir`
pub async fn restore(encoded: &str, dir: &Path) -> Result<(), BootstrapError> {
    // Env values pasted from a terminal often carry line breaks
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;

    let archive = dir.join(ARCHIVE_NAME);
    tokio::fs::write(&archive, bytes)
        .await
        .map_err(|source| BootstrapError::Write {
            path: archive.clone(),
            source,
        })?;

    let output = Command::new("tar")
        .arg("-xzf")
        .arg(ARCHIVE_NAME)
        .current_dir(dir)
        .output()
        .await
        .map_err(BootstrapError::Spawn)?;

    if !output.status.success() {
        return Err(BootstrapError::Extract {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tracing::info!(archive = %archive.display(), "Auth session restored from environment");
    Ok(())
}
