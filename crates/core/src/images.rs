//! Movie image upload checks and stored-file naming.

use std::path::Path;

use uuid::Uuid;

/// Accepted image file extensions (lowercase, without the dot).
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name supplied by the client.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// An upload is accepted when its extension is a supported image type
    /// and it carries at least one byte.
    pub fn is_valid(&self) -> bool {
        !self.bytes.is_empty() && has_supported_extension(&self.file_name)
    }
}

/// Check the file extension against [`SUPPORTED_IMAGE_EXTENSIONS`], ignoring case.
///
/// The extension is whatever follows the last `.` of the final path
/// component, so a bare `.png` counts as a PNG.
pub fn has_supported_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Build a collision-free stored file name: `{uuid}_{sanitised original}`.
///
/// Path separators and anything outside `[A-Za-z0-9._-]` are replaced with
/// `_` so the client cannot escape the storage directory.
pub fn unique_file_name(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");

    let sanitised: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}_{sanitised}", Uuid::new_v4())
}
