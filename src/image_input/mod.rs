//! Image input — bytes in, MIME type + base64 payload out.
//!
//! The model receives the picture as a `data:` URL, so this module only
//! needs to sniff the format and encode; it never decodes pixels.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// An image ready to be attached to a model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub base64: String,
}

impl ImageData {
    /// Detect the format from magic bytes and encode the payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let format = image::guess_format(bytes).map_err(|_| ImageError::UnsupportedFormat)?;
        let mime_type = format.to_mime_type().to_string();

        log::info!("[IMAGE] Loaded {} bytes as {}", bytes.len(), mime_type);

        Ok(Self {
            mime_type,
            base64: STANDARD.encode(bytes),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ImageError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&bytes)
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    /// Parse a `data:<mime>;base64,<payload>` URL back into its parts.
    pub fn parse_data_url(url: &str) -> Result<Self, ImageError> {
        let invalid = |reason: &str| ImageError::InvalidDataUrl(reason.to_string());

        let rest = url.strip_prefix("data:").ok_or_else(|| invalid("missing data: scheme"))?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| invalid("missing payload separator"))?;
        let (mime_type, _) = header.split_once(';').ok_or_else(|| invalid("missing MIME type"))?;

        if mime_type.is_empty() {
            return Err(invalid("missing MIME type"));
        }
        if payload.is_empty() {
            return Err(invalid("empty payload"));
        }
        STANDARD
            .decode(payload)
            .map_err(|e| ImageError::InvalidDataUrl(format!("payload is not base64: {}", e)))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            base64: payload.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Image is empty")]
    Empty,

    #[error("Unsupported or unrecognized image format")]
    UnsupportedFormat,

    #[error("Could not read image: {0}")]
    Io(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

impl ImageError {
    pub fn message_key(&self) -> &'static str {
        match self {
            ImageError::Empty => "error_no_image",
            _ => "error_image_process",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 16, b'J', b'F', b'I', b'F'];

    #[test]
    fn detects_png_and_jpeg() {
        assert_eq!(ImageData::from_bytes(PNG_MAGIC).unwrap().mime_type, "image/png");
        assert_eq!(ImageData::from_bytes(JPEG_MAGIC).unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn empty_bytes_rejected() {
        assert!(matches!(ImageData::from_bytes(&[]), Err(ImageError::Empty)));
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(matches!(
            ImageData::from_bytes(b"just some text"),
            Err(ImageError::UnsupportedFormat)
        ));
    }

    #[test]
    fn data_url_round_trip() {
        let image = ImageData::from_bytes(PNG_MAGIC).unwrap();
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(ImageData::parse_data_url(&url).unwrap(), image);
    }

    #[test]
    fn malformed_data_urls_rejected() {
        for url in [
            "image/png;base64,AAAA",
            "data:image/png;base64",
            "data:;base64,AAAA",
            "data:image/png,AAAA",
            "data:image/png;base64,",
            "data:image/png;base64,@@@",
        ] {
            assert!(
                matches!(ImageData::parse_data_url(url), Err(ImageError::InvalidDataUrl(_))),
                "accepted {:?}",
                url
            );
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ImageData::from_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }
}
