//! # QR3K - Games in a QR Code
//!
//! Packs small browser games (HTML or JavaScript source) into a link short
//! enough to fit in a single QR code, and unpacks them again.
//!
//! ## Pipeline
//!
//! ```text
//!            encode                                    decode
//! source ──> gzip ──> xor ──> base64 ──> url    url ──> base64 ──> xor ──> gunzip ──> source
//! ```
//!
//! The legacy method skips the gzip stage. Every stage is reversible and the
//! decoder applies the inverse stages in exactly the reverse order.
//!
//! ## Methods
//!
//! | Method  | Query param | Stages                    | Use                          |
//! |---------|-------------|---------------------------|------------------------------|
//! | Current | `z`         | gzip → xor → base64 → url | Default for new games        |
//! | Legacy  | `x`         | xor → base64 → url        | Links already in circulation |
//!
//! ## Size budget
//!
//! A QR code holds at most 2953 bytes. The runtime decoder takes roughly 180
//! of them, so a payload fits when `base64_len + 180 <= 2953`. Above 2200 the
//! payload is reported as approaching the limit.
//!
//! ## Quick Start
//!
//! ```rust
//! use qr3k::{Encoder, Method};
//!
//! let encoder = Encoder::new();
//! let result = encoder.encode("alert('hello')").unwrap();
//!
//! println!("{}", result.qr_url);
//! assert!(!result.size.is_over_limit);
//!
//! let code = encoder.decode(&result.encoded, Method::Current).unwrap();
//! assert_eq!(code, "alert('hello')");
//! ```
//!
//! ## Modules
//!
//! - [`codec`]: Cipher, transport, gzip and the pipeline composer
//! - [`accounting`]: Size reports, limits and method comparison
//! - [`links`]: Game and QR-image link construction
//! - [`content`]: HTML vs script detection
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod accounting;
pub mod codec;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod links;

// Re-exports for convenience
pub use accounting::{
    ComparisonReport, LimitStatus, Limits, SizeAccountant, SizeReport, DECODER_OVERHEAD,
    QR_CAPACITY, SOFT_LIMIT,
};
pub use codec::{CipherKey, CompressionLevel, Method, Pipeline, Stage};
pub use config::Config;
pub use content::ContentKind;
pub use engine::{EncodeRequest, Encoder, EncodingMetadata, EncodingResult};
pub use error::{DecodeErrorKind, ErrorCategory, Qr3kError, Result};
pub use links::LinkBuilder;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
