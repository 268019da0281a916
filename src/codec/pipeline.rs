//! Pipeline composer.
//!
//! Applies the stages of a [`Method`] in order when encoding and in exact
//! reverse order when decoding. The order comes from [`Method::stages`] and is
//! never rearranged here.

use serde::Serialize;
use tracing::debug;

use super::cipher::CipherKey;
use super::gzip::{CompressionLevel, GzipCodec};
use super::method::{Method, Stage};
use super::transport::{base64_decode, base64_encode, url_escape, url_unescape};
use crate::error::{DecodeErrorKind, Qr3kError, Result};

/// Byte count after one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageTrace {
    /// Stage applied
    pub stage: Stage,
    /// Output length in bytes
    pub bytes: usize,
}

/// Everything produced by one encode run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Method used
    pub method: Method,
    /// Compression level, when the method compresses
    pub level: Option<CompressionLevel>,
    /// UTF-8 length of the input
    pub raw_bytes: usize,
    /// Output length after each stage, in stage order
    pub trace: Vec<StageTrace>,
    /// Base64 payload (not URL-escaped)
    pub encoded: String,
    /// URL-escaped payload
    pub escaped: String,
}

impl PipelineOutput {
    /// Output length after `stage`, if the method has that stage
    pub fn bytes_after(&self, stage: Stage) -> Option<usize> {
        self.trace.iter().find(|t| t.stage == stage).map(|t| t.bytes)
    }
}

/// Encode/decode pipeline for both methods
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    key: CipherKey,
    gzip: GzipCodec,
}

impl Pipeline {
    /// Pipeline with the canonical key and default level
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the cipher key
    pub fn with_key(mut self, key: CipherKey) -> Self {
        self.key = key;
        self
    }

    /// Override the compression level
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.gzip = GzipCodec::with_level(level);
        self
    }

    /// Cipher key in use
    pub fn key(&self) -> &CipherKey {
        &self.key
    }

    /// Compression level in use
    pub fn level(&self) -> CompressionLevel {
        self.gzip.level
    }

    /// Run every stage of `method` over `text`
    pub fn run(&self, text: &str, method: Method) -> Result<PipelineOutput> {
        let mut bytes = text.as_bytes().to_vec();
        let mut trace = Vec::with_capacity(method.stages().len());
        let mut encoded = String::new();
        let mut escaped = String::new();

        for &stage in method.stages() {
            match stage {
                Stage::Compress => bytes = self.gzip.compress(&bytes)?,
                Stage::Cipher => bytes = self.key.apply(&bytes),
                Stage::Base64 => {
                    encoded = base64_encode(&bytes);
                    bytes = encoded.as_bytes().to_vec();
                },
                Stage::UrlEscape => {
                    escaped = url_escape(&encoded);
                    bytes = escaped.as_bytes().to_vec();
                },
            }
            debug!(%method, %stage, bytes = bytes.len(), "stage applied");
            trace.push(StageTrace {
                stage,
                bytes: bytes.len(),
            });
        }

        Ok(PipelineOutput {
            method,
            level: method.compresses().then_some(self.gzip.level),
            raw_bytes: text.len(),
            trace,
            encoded,
            escaped,
        })
    }

    /// Encode `text` into a URL-escaped payload
    pub fn encode(&self, text: &str, method: Method) -> Result<String> {
        Ok(self.run(text, method)?.escaped)
    }

    /// Decode a URL-escaped payload produced by [`Pipeline::encode`]
    pub fn decode(&self, escaped: &str, method: Method) -> Result<String> {
        self.invert(escaped.as_bytes().to_vec(), method.stages(), method)
    }

    /// Decode a base64 payload that has already been URL-unescaped
    pub fn decode_payload(&self, encoded: &str, method: Method) -> Result<String> {
        let stages = method.stages();
        let without_escape = match stages.last() {
            Some(Stage::UrlEscape) => &stages[..stages.len() - 1],
            _ => stages,
        };
        self.invert(encoded.as_bytes().to_vec(), without_escape, method)
    }

    fn invert(&self, mut bytes: Vec<u8>, stages: &[Stage], method: Method) -> Result<String> {
        for &stage in stages.iter().rev() {
            bytes = match stage {
                Stage::UrlEscape => {
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| Qr3kError::decode(DecodeErrorKind::UrlEscape, e.to_string()))?;
                    url_unescape(text)?.into_bytes()
                },
                Stage::Base64 => base64_decode(&bytes)?,
                Stage::Cipher => self.key.apply(&bytes),
                Stage::Compress => self.gzip.decompress(&bytes)?,
            };
            debug!(%method, %stage, bytes = bytes.len(), "stage inverted");
        }

        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_roundtrip() {
        let pipeline = Pipeline::new();
        let encoded = pipeline.encode("x=1", Method::Legacy).unwrap();
        assert_eq!(pipeline.decode(&encoded, Method::Legacy).unwrap(), "x=1");
    }

    #[test]
    fn test_current_roundtrip() {
        let pipeline = Pipeline::new();
        let encoded = pipeline.encode("x=1", Method::Current).unwrap();
        assert_eq!(pipeline.decode(&encoded, Method::Current).unwrap(), "x=1");
    }

    #[test]
    fn test_legacy_known_value() {
        // "x=1" ^ "qr3" = [0x09, 0x4f, 0x02] -> "CU8C"
        let output = Pipeline::new().run("x=1", Method::Legacy).unwrap();
        assert_eq!(output.encoded, "CU8C");
        assert_eq!(output.escaped, "CU8C");
    }

    #[test]
    fn test_trace_follows_stage_order() {
        let output = Pipeline::new().run("hello world", Method::Current).unwrap();
        let stages: Vec<Stage> = output.trace.iter().map(|t| t.stage).collect();
        assert_eq!(stages, Method::Current.stages());
        assert_eq!(
            output.bytes_after(Stage::Compress),
            output.bytes_after(Stage::Cipher)
        );
        assert_eq!(output.bytes_after(Stage::Base64), Some(output.encoded.len()));
        assert_eq!(output.level, Some(CompressionLevel::DEFAULT));
    }

    #[test]
    fn test_legacy_trace_has_no_compression() {
        let output = Pipeline::new().run("hello", Method::Legacy).unwrap();
        assert_eq!(output.bytes_after(Stage::Compress), None);
        assert_eq!(output.bytes_after(Stage::Cipher), Some(5));
        assert_eq!(output.level, None);
    }

    #[test]
    fn test_cipher_runs_on_compressed_bytes() {
        let pipeline = Pipeline::new();
        let text = "abcabcabc".repeat(50);
        let output = pipeline.run(&text, Method::Current).unwrap();

        let expected = pipeline
            .key()
            .apply(&GzipCodec::new().compress(text.as_bytes()).unwrap());
        assert_eq!(base64_encode(&expected), output.encoded);
    }

    #[test]
    fn test_decode_payload_skips_unescape() {
        let pipeline = Pipeline::new();
        let output = pipeline.run("a+b/c", Method::Current).unwrap();
        assert_eq!(
            pipeline.decode_payload(&output.encoded, Method::Current).unwrap(),
            "a+b/c"
        );
    }

    #[test]
    fn test_custom_key() {
        let pipeline = Pipeline::new().with_key(CipherKey::new(b"k".to_vec()).unwrap());
        let encoded = pipeline.encode("game", Method::Legacy).unwrap();
        assert_ne!(encoded, Pipeline::new().encode("game", Method::Legacy).unwrap());
        assert_eq!(pipeline.decode(&encoded, Method::Legacy).unwrap(), "game");
    }

    #[test]
    fn test_legacy_payload_is_not_current_input() {
        let pipeline = Pipeline::new();
        let legacy = pipeline.run("alert('hi')", Method::Legacy).unwrap();
        let err = pipeline
            .decode_payload(&legacy.encoded, Method::Current)
            .unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Decompression));
    }
}
