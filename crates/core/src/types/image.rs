//! Image MIME types accepted for restaurant photos.

use core::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Returned when an uploaded file's declared MIME type is not allow-listed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported image type: {0:?}")]
pub struct ImageTypeError(pub String);

/// The image formats a restaurant photo may be uploaded in.
///
/// Matching is exact on the declared MIME type; no content sniffing is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMimeType {
    Jpeg,
    Png,
    Gif,
}

impl ImageMimeType {
    /// All accepted types, in the order they are advertised.
    pub const ALL: [Self; 3] = [Self::Jpeg, Self::Png, Self::Gif];

    /// Parse a declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`ImageTypeError`] for anything other than `image/jpeg`,
    /// `image/png`, or `image/gif`.
    pub fn parse(mime: &str) -> Result<Self, ImageTypeError> {
        match mime {
            "image/jpeg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/gif" => Ok(Self::Gif),
            other => Err(ImageTypeError(other.to_owned())),
        }
    }

    /// The canonical MIME string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

impl fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode image bytes as a `data:` URI (`data:<mime>;base64,<payload>`).
///
/// ```
/// use forkful_core::{ImageMimeType, to_data_uri};
///
/// assert_eq!(to_data_uri(ImageMimeType::Png, b"hi"), "data:image/png;base64,aGk=");
/// ```
#[must_use]
pub fn to_data_uri(mime: ImageMimeType, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime.as_str(), STANDARD.encode(bytes))
}
