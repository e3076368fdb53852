use std::{ffi::OsStr, path::Path};

use crate::error::AlarmFileError;

pub const ALLOWED_EXTENSIONS: [&str; 2] = ["mp3", "mp4"];

/// gate before the countdown starts, existence is checked first
pub fn validate(path: &Path) -> Result<(), AlarmFileError> {
    if !path.exists() {
        return Err(AlarmFileError::Missing(path.to_path_buf()));
    }
    if !has_allowed_extension(path) {
        return Err(AlarmFileError::Unsupported(path.to_path_buf()));
    }
    Ok(())
}

/// exact, case sensitive match on the last extension
#[must_use]
pub fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
}
