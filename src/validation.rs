use lazy_static::lazy_static;
use regex::Regex;

use crate::config::VideoExtension;
use crate::error::ApiError;

// Plain file names only: no separators, no dots before the extension
lazy_static! {
    static ref MP4_PATH: Regex = Regex::new(r"^[a-zA-Z0-9_\-]+\.mp4$").unwrap();
    static ref MOV_PATH: Regex = Regex::new(r"^[a-zA-Z0-9_\-]+\.mov$").unwrap();
}

/// Accepts `path` only if the whole string is a bare video file name with
/// the configured extension.
pub fn validate_path(path: Option<&str>, extension: VideoExtension) -> Result<&str, ApiError> {
    let path = path.ok_or(ApiError::InvalidPath)?;
    let pattern: &Regex = match extension {
        VideoExtension::Mp4 => &MP4_PATH,
        VideoExtension::Mov => &MOV_PATH,
    };
    if pattern.is_match(path) {
        Ok(path)
    } else {
        Err(ApiError::InvalidPath)
    }
}
