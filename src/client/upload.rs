//! Image upload and deletion

use super::envelope::UploadedImage;
use super::{Auth, MarketClient};
use crate::core::cancel::{ScopeHandle, run_scoped};
use crate::core::error::{MarketError, Result, ValidationError};
use crate::core::validation::upload::{validate_file, validate_upload};
use crate::core::validation::validators::safe_filename;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::de::IgnoredAny;
use std::path::Path;

/// A file selected for upload
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ValidationError::field("file", format!("'{}' is not a file", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ValidationError::field("file", format!("cannot read '{}': {}", path.display(), e))
        })?;
        let mime_type = mime_from_extension(path).to_string();
        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn into_part(self) -> Result<Part> {
        let Self {
            file_name,
            mime_type,
            bytes,
        } = self;
        Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(&mime_type)
            .map_err(|_| {
                ValidationError::UnsupportedMimeType {
                    name: file_name,
                    mime: mime_type,
                }
                .into()
            })
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

impl MarketClient {
    /// Upload several images in one request (multipart field `images`)
    ///
    /// The batch is validated locally first; a failing batch sends nothing.
    pub async fn upload_images(
        &self,
        files: Vec<UploadFile>,
        scope: Option<&ScopeHandle>,
    ) -> Result<Vec<UploadedImage>> {
        validate_upload(&files, &self.config().upload)?;
        let count = files.len();
        let form = files
            .into_iter()
            .try_fold(Form::new(), |form, file| Ok::<_, MarketError>(form.part("images", file.into_part()?)))?;

        run_scoped(scope, async {
            let url = self.endpoint(&["upload", "images"])?;
            let request = self.request(Method::POST, url, Auth::Required)?.multipart(form);
            let images: Vec<UploadedImage> = self
                .execute(request)
                .await?
                .into_data("/upload/images")?;
            tracing::info!(files = count, stored = images.len(), "images uploaded");
            Ok(images)
        })
        .await
    }

    /// Upload one image (multipart field `image`)
    pub async fn upload_single(
        &self,
        file: UploadFile,
        scope: Option<&ScopeHandle>,
    ) -> Result<UploadedImage> {
        validate_file(&file, &self.config().upload)?;
        let form = Form::new().part("image", file.into_part()?);

        run_scoped(scope, async {
            let url = self.endpoint(&["upload", "single"])?;
            let request = self.request(Method::POST, url, Auth::Required)?.multipart(form);
            let image: UploadedImage = self
                .execute(request)
                .await?
                .into_data("/upload/single")?;
            tracing::info!(url = %image.url, "image uploaded");
            Ok(image)
        })
        .await
    }

    /// Delete a previously uploaded image by its stored filename
    pub async fn delete_upload(&self, filename: &str, scope: Option<&ScopeHandle>) -> Result<()> {
        safe_filename(filename)?;
        run_scoped(scope, async {
            let url = self.endpoint(&["upload", filename])?;
            let request = self.request(Method::DELETE, url, Auth::Required)?;
            self.execute::<IgnoredAny>(request).await?;
            tracing::info!(filename, "upload deleted");
            Ok(())
        })
        .await
    }
}
