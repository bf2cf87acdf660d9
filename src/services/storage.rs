//! Image file storage.
//!
//! Uploaded images land in a flat directory served statically under
//! `/images/`. Filenames are derived from the original name plus a
//! millisecond timestamp so concurrent uploads of the same file do not
//! collide.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use chrono::Utc;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

/// URL segment under which stored images are exposed
pub const IMAGES_URL_PREFIX: &str = "/images/";

/// Accepted MIME types and the extension each maps to
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpg", "jpg"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// An image file extracted from a multipart request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Clone)]
pub struct StorageService {
    config: StorageConfig,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Ensure the image directory exists
    pub async fn init(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.config.images_dir)
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "Failed to create image directory {}: {}",
                    self.config.images_dir, e
                ))
            })
    }

    /// Directory where image files are written
    pub fn images_dir(&self) -> &str {
        &self.config.images_dir
    }

    /// Write an uploaded image to disk and return its public URL.
    /// Uploads with a MIME type outside the allow-list are rejected.
    pub async fn store(&self, upload: &ImageUpload) -> AppResult<String> {
        let file_name = build_file_name(
            &upload.file_name,
            &upload.content_type,
            Utc::now().timestamp_millis(),
        )?;

        let path = PathBuf::from(&self.config.images_dir).join(&file_name);
        tokio::fs::write(&path, &upload.data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store image: {}", e)))?;

        tracing::debug!("Stored image {}", file_name);
        Ok(format!(
            "{}{}{}",
            self.config.public_base_url, IMAGES_URL_PREFIX, file_name
        ))
    }

    /// Best-effort removal of the file behind a stored image URL.
    ///
    /// A missing or undeletable file is logged and otherwise ignored; the
    /// caller's database operation must not depend on it.
    pub async fn delete_by_url(&self, image_url: &str) {
        let Some(file_name) = file_name_from_url(image_url) else {
            tracing::warn!("Cannot derive filename from image URL {}", image_url);
            return;
        };

        let path = PathBuf::from(&self.config.images_dir).join(file_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Failed to delete image {}: {}", path.display(), e);
        }
    }
}

/// Map an accepted MIME type to its file extension
fn extension_for(content_type: &str) -> Option<&'static str> {
    MIME_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

/// Build the stored filename: original base name up to the first dot,
/// spaces replaced with underscores, then the timestamp and extension.
fn build_file_name(original: &str, content_type: &str, timestamp_millis: i64) -> AppResult<String> {
    let extension = extension_for(content_type).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported image type {}: expected jpeg, jpg, png or webp",
            content_type
        ))
    })?;

    let stem = original
        .split('.')
        .next()
        .unwrap_or("image")
        .replace(' ', "_");
    let stem = if stem.is_empty() { "image".to_string() } else { stem };

    Ok(format!("{}{}.{}", stem, timestamp_millis, extension))
}

/// Extract the stored filename from a public image URL. Only the final path
/// segment is kept, so a doctored URL cannot reach outside the image dir.
fn file_name_from_url(image_url: &str) -> Option<&str> {
    let tail = image_url.split(IMAGES_URL_PREFIX).nth(1)?;
    Path::new(tail).file_name()?.to_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_accepted_mime_types() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/jpg"), Some("jpg"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/webp"), Some("webp"));
        assert_eq!(extension_for("image/gif"), None);
        assert_eq!(extension_for("application/pdf"), None);
    }

    #[test]
    fn builds_collision_resistant_names() {
        let name = build_file_name("my hot sauce.png", "image/png", 1700000000000).unwrap();
        assert_eq!(name, "my_hot_sauce1700000000000.png");
    }

    #[test]
    fn keeps_only_base_name_before_first_dot() {
        let name = build_file_name("photo.final.jpeg", "image/jpeg", 42).unwrap();
        assert_eq!(name, "photo42.jpg");
    }

    #[test]
    fn rejects_unsupported_mime_type() {
        assert!(build_file_name("x.gif", "image/gif", 42).is_err());
    }

    #[test]
    fn extracts_file_name_from_url() {
        assert_eq!(
            file_name_from_url("http://localhost:3000/images/sauce42.png"),
            Some("sauce42.png")
        );
        assert_eq!(file_name_from_url("http://localhost:3000/other/x.png"), None);
    }

    #[test]
    fn strips_path_segments_from_url_tail() {
        assert_eq!(
            file_name_from_url("http://localhost:3000/images/../secret.png"),
            Some("secret.png")
        );
    }
}
