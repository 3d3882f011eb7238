//! Error types for framevault.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using framevault's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for framevault operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration, rejected at construction
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document text was empty; nothing to encode
    #[error("Empty document: {0}")]
    EmptyDocument(String),

    /// A chunk does not fit a single QR symbol at the configured
    /// error-correction level
    #[error("Payload too large for QR symbol: chunk {frame_number} is {len} bytes")]
    PayloadTooLarge { frame_number: u32, len: usize },

    /// The external video tool is not installed or not on PATH
    #[error("Video encoder not found: {0}")]
    EncoderNotFound(String),

    /// The external video tool exited non-zero
    #[error("Video encoder failed: {0}")]
    EncoderFailed(String),

    /// The MP4 artifact does not exist at the given path
    #[error("Video not found: {0}")]
    VideoNotFound(PathBuf),

    /// A frame could not be extracted or its QR payload decoded
    #[error("Frame decode error: {0}")]
    FrameDecode(String),

    /// Embedding generation failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// The backend does not implement an optional capability
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The operation was cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("chunk_overlap must be less than chunk_size".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: chunk_overlap must be less than chunk_size"
        );
    }

    #[test]
    fn test_error_display_payload_too_large() {
        let err = Error::PayloadTooLarge {
            frame_number: 3,
            len: 5000,
        };
        assert_eq!(
            err.to_string(),
            "Payload too large for QR symbol: chunk 3 is 5000 bytes"
        );
    }

    #[test]
    fn test_error_display_encoder_failed() {
        let err = Error::EncoderFailed("exit status: 1".to_string());
        assert_eq!(err.to_string(), "Video encoder failed: exit status: 1");
    }

    #[test]
    fn test_error_display_video_not_found() {
        let err = Error::VideoNotFound(PathBuf::from("/tmp/missing.mp4"));
        assert_eq!(err.to_string(), "Video not found: /tmp/missing.mp4");
    }

    #[test]
    fn test_error_display_cancelled() {
        assert_eq!(Error::Cancelled.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
