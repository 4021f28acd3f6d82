use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upload size cap: 10 MiB per file.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// The closed set of media types the adjudication service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Jpeg,
    Png,
    Heic,
    Heif,
    Pdf,
}

impl MediaType {
    /// Parse a declared MIME type. Returns `None` for anything outside the
    /// accepted set.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/heic" => Some(Self::Heic),
            "image/heif" => Some(Self::Heif),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Heic => "image/heic",
            Self::Heif => "image/heif",
            Self::Pdf => "application/pdf",
        }
    }

    /// Image uploads get an in-memory preview; PDFs do not.
    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

/// Why a candidate upload was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("file is too large ({size} bytes), the limit is {}", format_size(MAX_UPLOAD_BYTES))]
    TooLarge { size: u64 },

    #[error("unsupported file type '{0}', accepted formats: JPG, PNG, HEIC, PDF")]
    UnsupportedType(String),
}

/// Check a candidate upload against the fixed policy. Pure; size first, then
/// declared media type, matching the order the rejection messages are shown.
pub fn validate_upload(media_type: &str, size: u64) -> Result<MediaType, FileRejection> {
    if size > MAX_UPLOAD_BYTES {
        return Err(FileRejection::TooLarge { size });
    }
    MediaType::from_mime(media_type)
        .ok_or_else(|| FileRejection::UnsupportedType(media_type.to_string()))
}

/// Human-readable byte count, used in rejection messages.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exp = ((bytes as f64).log2() / 10.0).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    if exp == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", bytes as f64 / 1024f64.powi(exp as i32), UNITS[exp])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_allowed_type_under_the_limit() {
        for mime in [
            "image/jpeg",
            "image/jpg",
            "image/png",
            "image/heic",
            "image/heif",
            "application/pdf",
        ] {
            assert!(validate_upload(mime, 1024).is_ok(), "{mime} should pass");
        }
    }

    #[test]
    fn rejects_oversized_file() {
        let err = validate_upload("image/jpeg", 15 * 1024 * 1024).unwrap_err();
        assert_eq!(
            err,
            FileRejection::TooLarge {
                size: 15 * 1024 * 1024
            }
        );
    }

    #[test]
    fn accepts_file_exactly_at_the_limit() {
        assert_eq!(
            validate_upload("application/pdf", MAX_UPLOAD_BYTES).unwrap(),
            MediaType::Pdf
        );
    }

    #[test]
    fn rejects_unsupported_media_type() {
        let err = validate_upload("image/gif", 1024).unwrap_err();
        assert_eq!(err, FileRejection::UnsupportedType("image/gif".to_string()));
    }

    #[test]
    fn size_check_wins_over_type_check() {
        // An oversized file of an unsupported type reports the size problem.
        let err = validate_upload("image/gif", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(matches!(err, FileRejection::TooLarge { .. }));
    }

    #[test]
    fn mime_parsing_is_case_insensitive() {
        assert_eq!(MediaType::from_mime("IMAGE/PNG"), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime(" application/pdf "), Some(MediaType::Pdf));
    }

    #[test]
    fn pdf_is_not_an_image() {
        assert!(!MediaType::Pdf.is_image());
        assert!(MediaType::Jpeg.is_image());
        assert!(MediaType::Heif.is_image());
    }

    #[test]
    fn formats_sizes_in_binary_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(format_size(MAX_UPLOAD_BYTES), "10.0 MB");
    }
}
