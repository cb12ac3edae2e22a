use thiserror::Error;

/// User-facing failures of a [`Session`](crate::Session) operation.
///
/// All variants are recoverable: the session keeps its previous state and the
/// message is posted to the advisory slot.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("File is too large ({}), the maximum is {}", pretty_size(.size), pretty_size(.max))]
    TooLarge { size: u64, max: u64 },

    #[error("File must be an image: {0}")]
    NotAnImage(String),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Image resize failed: {0}")]
    Resize(String),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;

fn pretty_size(bytes: &u64) -> String {
    cutil::fs::pretty_bytes_size(*bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_message() {
        let err = SessionError::TooLarge {
            size: 15 * cutil::fs::MB,
            max: 12 * cutil::fs::MB,
        };
        assert_eq!(
            err.to_string(),
            "File is too large (15.00 MB), the maximum is 12.00 MB"
        );
    }
}
