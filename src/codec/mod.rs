//! Reversible encoding pipeline for QR3K game payloads.
//!
//! # Methods
//!
//! | Method      | Query param | Stages                          |
//! |-------------|-------------|---------------------------------|
//! | [`Current`] | `z`         | gzip → xor → base64 → url       |
//! | [`Legacy`]  | `x`         | xor → base64 → url              |
//!
//! Decoding applies the inverse stages in reverse order. Nothing in a payload
//! says which method produced it, so decoders always take the method
//! explicitly.
//!
//! # Usage
//!
//! ```rust
//! use qr3k::codec::{Method, Pipeline};
//!
//! let pipeline = Pipeline::new();
//! let escaped = pipeline.encode("alert('hi')", Method::Current).unwrap();
//! assert_eq!(pipeline.decode(&escaped, Method::Current).unwrap(), "alert('hi')");
//! ```
//!
//! [`Current`]: Method::Current
//! [`Legacy`]: Method::Legacy

mod cipher;
mod gzip;
mod method;
mod pipeline;
mod transport;

pub use cipher::{xor_with_key, CipherKey, DEFAULT_KEY};
pub use gzip::{CompressionLevel, GzipCodec};
pub use method::{Method, Stage};
pub use pipeline::{Pipeline, PipelineOutput, StageTrace};
pub use transport::{base64_decode, base64_encode, base64_len, url_escape, url_unescape};
