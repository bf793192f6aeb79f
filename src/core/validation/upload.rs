//! Upload checks run before any file leaves the client

use crate::client::UploadFile;
use crate::config::UploadLimits;
use crate::core::error::ValidationError;

/// Validate a batch of files against the configured limits
///
/// The count is checked first, then each file in order; the first failing
/// file is reported.
pub fn validate_upload(files: &[UploadFile], limits: &UploadLimits) -> Result<(), ValidationError> {
    if files.is_empty() {
        return Err(ValidationError::NoFiles);
    }
    if files.len() > limits.max_files {
        return Err(ValidationError::TooManyFiles {
            max: limits.max_files,
            actual: files.len(),
        });
    }
    files.iter().try_for_each(|file| validate_file(file, limits))
}

/// Validate a single file against the size and type limits
pub fn validate_file(file: &UploadFile, limits: &UploadLimits) -> Result<(), ValidationError> {
    if file.len() > limits.max_file_size {
        return Err(ValidationError::FileTooLarge {
            name: file.file_name.clone(),
            size: file.len(),
            max: limits.max_file_size,
        });
    }
    let accepted = limits
        .allowed_mime_types
        .iter()
        .any(|m| m.eq_ignore_ascii_case(&file.mime_type));
    if !accepted {
        return Err(ValidationError::UnsupportedMimeType {
            name: file.file_name.clone(),
            mime: file.mime_type.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(name: &str, size: usize) -> UploadFile {
        UploadFile::new(name, "image/jpeg", vec![0u8; size])
    }

    #[test]
    fn test_empty_batch() {
        let err = validate_upload(&[], &UploadLimits::default()).unwrap_err();
        assert_eq!(err, ValidationError::NoFiles);
    }

    #[test]
    fn test_too_many_files() {
        let files: Vec<_> = (0..11).map(|i| jpeg(&format!("{i}.jpg"), 10)).collect();
        let err = validate_upload(&files, &UploadLimits::default()).unwrap_err();
        assert_eq!(err, ValidationError::TooManyFiles { max: 10, actual: 11 });
    }

    #[test]
    fn test_file_too_large() {
        let limits = UploadLimits {
            max_file_size: 100,
            ..UploadLimits::default()
        };
        let files = vec![jpeg("small.jpg", 100), jpeg("big.jpg", 101)];
        let err = validate_upload(&files, &limits).unwrap_err();
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
        assert!(err.to_string().contains("big.jpg"));
    }

    #[test]
    fn test_unsupported_type() {
        let file = UploadFile::new("notes.pdf", "application/pdf", vec![1, 2, 3]);
        let err = validate_upload(&[file], &UploadLimits::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedMimeType {
                name: "notes.pdf".to_string(),
                mime: "application/pdf".to_string(),
            }
        );
    }

    #[test]
    fn test_accepts_mixed_image_types() {
        let files = vec![
            jpeg("front.jpg", 1024),
            UploadFile::new("side.png", "image/PNG", vec![0; 512]),
            UploadFile::new("rear.webp", "image/webp", vec![0; 256]),
        ];
        assert!(validate_upload(&files, &UploadLimits::default()).is_ok());
    }
}
