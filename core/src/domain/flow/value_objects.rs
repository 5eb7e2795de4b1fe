use std::borrow::Cow;

use base64::{Engine as _, engine::general_purpose};
use validator::ValidationError;

use crate::domain::common::entities::app_errors::{CoreError, FieldErrors};

/// An inline image attached to a model call, taken from a
/// `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    /// Base64 payload, already checked to decode.
    pub data: String,
}

impl ImageData {
    pub fn from_data_uri(uri: &str) -> Result<Self, CoreError> {
        parse_data_uri(uri).map_err(|message| {
            CoreError::Validation(FieldErrors::single("photoDataUri", message))
        })
    }

    pub fn decoded_len(&self) -> usize {
        // 4 base64 chars carry 3 bytes, minus padding
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4) * 3 - padding
    }
}

fn parse_data_uri(uri: &str) -> Result<ImageData, &'static str> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or("photo must be a data URI")?;
    let (mime_type, data) = rest
        .split_once(";base64,")
        .ok_or("photo data URI must be base64 encoded")?;

    let mime_type = mime_type.to_ascii_lowercase();
    if !mime_type.starts_with("image/") || mime_type.len() == "image/".len() {
        return Err("photo data URI must carry an image mime type");
    }
    if data.is_empty() {
        return Err("photo data URI has no image data");
    }
    general_purpose::STANDARD
        .decode(data)
        .map_err(|_| "photo data URI payload is not valid base64")?;

    Ok(ImageData {
        mime_type,
        data: data.to_string(),
    })
}

/// `validator` hook for input fields carrying a photo.
pub fn validate_image_data_uri(value: &str) -> Result<(), ValidationError> {
    parse_data_uri(value)
        .map(|_| ())
        .map_err(|message| ValidationError::new("data_uri").with_message(Cow::Borrowed(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_png_data_uri() {
        let image = ImageData::from_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.decoded_len(), 5);
    }

    #[test]
    fn test_reject_non_image_mime() {
        let err = ImageData::from_data_uri("data:text/plain;base64,aGVsbG8=").unwrap_err();
        match err {
            CoreError::Validation(fields) => {
                assert_eq!(fields.0[0].field, "photoDataUri");
                assert!(fields.0[0].message.contains("image mime type"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reject_bad_base64_and_plain_urls() {
        assert!(ImageData::from_data_uri("data:image/jpeg;base64,@@@").is_err());
        assert!(ImageData::from_data_uri("https://example.com/a.jpg").is_err());
        assert!(ImageData::from_data_uri("data:image/jpeg;base64,").is_err());
        assert!(validate_image_data_uri("data:image/jpeg,raw").is_err());
    }
}
