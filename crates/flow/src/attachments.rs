//! Placeholder upload files

use std::path::PathBuf;

use tracing::info;

use otp_signup_common::{AttachmentConfig, Result};

/// Create every configured attachment that does not exist yet.
///
/// Existing files are left untouched. Returns the paths that were created.
pub fn ensure_placeholders(config: &AttachmentConfig) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    for path in &config.paths {
        if path.exists() {
            continue;
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, config.placeholder.as_bytes())?;
        info!("Created placeholder file: {}", path.display());
        created.push(path.clone());
    }

    Ok(created)
}
