//! QR3K error types.
//!
//! Errors fall into three user-facing categories (see [`ErrorCategory`]):
//!
//! | Category         | Variants                                  |
//! |------------------|-------------------------------------------|
//! | Invalid input    | `InvalidInput`, `InvalidKey`, `Config`    |
//! | Corrupted data   | `Decode`                                  |
//! | Internal         | `Compression`, `Internal`, `Json`         |
//!
//! Exceeding the QR capacity is *not* an error: it is reported through
//! [`SizeReport::is_over_limit`](crate::accounting::SizeReport::is_over_limit)
//! on an otherwise complete result.

use thiserror::Error;

/// Stage at which a decode failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// Percent-escaping was malformed.
    UrlEscape,
    /// Base64 body was malformed.
    Base64,
    /// Gzip container was invalid, truncated or failed its checksum.
    Decompression,
    /// Recovered bytes were not UTF-8.
    Utf8,
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeErrorKind::UrlEscape => write!(f, "url-escape"),
            DecodeErrorKind::Base64 => write!(f, "base64"),
            DecodeErrorKind::Decompression => write!(f, "decompression"),
            DecodeErrorKind::Utf8 => write!(f, "utf-8"),
        }
    }
}

/// QR3K errors.
#[derive(Error, Debug)]
pub enum Qr3kError {
    /// Source text was empty or missing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cipher key was empty.
    #[error("Invalid cipher key: key must contain at least one byte")]
    InvalidKey,

    /// Compression engine rejected the level or the input.
    #[error("Compression error: {0}")]
    Compression(String),

    /// Encoded payload could not be turned back into source text.
    #[error("Decode error ({kind}): {message}")]
    Decode {
        /// Stage that detected the failure.
        kind: DecodeErrorKind,
        /// Detail from the failing stage.
        message: String,
    },

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Failure outside the codec, such as a worker task that panicked.
    #[error("Internal error: {0}")]
    Internal(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for QR3K operations
pub type Result<T> = std::result::Result<T, Qr3kError>;

/// User-facing error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller supplied something unusable.
    InvalidInput,
    /// Scanned or pasted game data is damaged.
    CorruptedData,
    /// Failure inside the encoder itself.
    Internal,
}

impl Qr3kError {
    /// Shorthand for a decode failure at `kind`.
    pub fn decode(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Qr3kError::Decode {
            kind,
            message: message.into(),
        }
    }

    /// Category used to pick the message shown to users.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Qr3kError::InvalidInput(_) | Qr3kError::InvalidKey | Qr3kError::Config(_) => {
                ErrorCategory::InvalidInput
            },
            Qr3kError::Decode { .. } => ErrorCategory::CorruptedData,
            Qr3kError::Compression(_) | Qr3kError::Internal(_) | Qr3kError::Json(_) => {
                ErrorCategory::Internal
            },
        }
    }

    /// Stage that rejected the payload, for decode failures.
    pub fn decode_kind(&self) -> Option<DecodeErrorKind> {
        match self {
            Qr3kError::Decode { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self.category() {
            ErrorCategory::InvalidInput => format!("Your input is invalid: {self}"),
            ErrorCategory::CorruptedData => {
                "Invalid or corrupted game data. This game may be damaged or use an \
                 incompatible encoding."
                    .to_string()
            },
            ErrorCategory::Internal => format!("Encoding failed: {self}"),
        }
    }
}

impl From<base64::DecodeError> for Qr3kError {
    fn from(err: base64::DecodeError) -> Self {
        Qr3kError::decode(DecodeErrorKind::Base64, err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Qr3kError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Qr3kError::decode(DecodeErrorKind::Utf8, err.to_string())
    }
}

impl From<toml::de::Error> for Qr3kError {
    fn from(err: toml::de::Error) -> Self {
        Qr3kError::Config(err.to_string())
    }
}
