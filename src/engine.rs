//! Encoder facade: pipeline, size accounting and links in one call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::accounting::{ComparisonReport, Limits, SizeAccountant, SizeReport};
use crate::codec::{CipherKey, CompressionLevel, Method, Pipeline};
use crate::config::Config;
use crate::content::ContentKind;
use crate::error::{Qr3kError, Result};
use crate::links::LinkBuilder;

/// Descriptive data attached to an encoding
#[derive(Debug, Clone, Serialize)]
pub struct EncodingMetadata {
    /// Method used
    pub method: Method,
    /// Gzip level (current method only)
    pub gzip_level: Option<CompressionLevel>,
    /// How the runtime will execute the payload
    pub content_kind: ContentKind,
    /// When the encoding was produced; informational only
    pub timestamp: DateTime<Utc>,
}

impl PartialEq for EncodingMetadata {
    // Timestamps differ between otherwise identical encodings.
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.gzip_level == other.gzip_level
            && self.content_kind == other.content_kind
    }
}

/// Result of one encode call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingResult {
    /// Base64 payload (not URL-escaped)
    pub encoded: String,
    /// Game link carrying the payload
    pub game_url: String,
    /// QR-image link wrapping the game link
    pub qr_url: String,
    /// Sizes and limit verdict
    pub size: SizeReport,
    /// Method, level and timestamp
    pub metadata: EncodingMetadata,
}

impl EncodingResult {
    /// Pretty-printed JSON, as returned by the encode API
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Encode request as accepted by API front-ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeRequest {
    /// Game source (HTML or JavaScript)
    pub code: String,
    /// Gzip level override
    #[serde(default)]
    pub level: Option<u32>,
    /// Method to encode with
    #[serde(default)]
    pub method: Method,
}

impl EncodeRequest {
    /// Request for the current method at the default level
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            level: None,
            method: Method::Current,
        }
    }

    /// Reject empty or whitespace-only source
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(Qr3kError::InvalidInput("Code cannot be empty.".to_string()));
        }
        if let Some(level) = self.level {
            CompressionLevel::new(level)?;
        }
        Ok(())
    }
}

/// High-level encoder
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    pipeline: Pipeline,
    limits: Limits,
    links: LinkBuilder,
}

impl Encoder {
    /// Encoder with the canonical key, default level, limits and links
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder configured from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pipeline: Pipeline::new()
                .with_key(config.cipher.key()?)
                .with_level(config.compression.level),
            limits: config.limits,
            links: config.links.clone(),
        })
    }

    /// Override the gzip level
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.pipeline = self.pipeline.with_level(level);
        self
    }

    /// Override the cipher key
    pub fn with_key(mut self, key: CipherKey) -> Self {
        self.pipeline = self.pipeline.with_key(key);
        self
    }

    /// Override the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Override the link endpoints
    pub fn with_links(mut self, links: LinkBuilder) -> Self {
        self.links = links;
        self
    }

    /// Limits in use
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Pipeline in use
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn accountant(&self) -> SizeAccountant {
        SizeAccountant::new()
            .with_pipeline(self.pipeline.clone())
            .with_limits(self.limits)
    }

    /// Encode with the current method at the configured level
    pub fn encode(&self, code: &str) -> Result<EncodingResult> {
        self.encode_with(code, Method::Current)
    }

    /// Encode with the current method at `level`
    pub fn encode_with_level(&self, code: &str, level: CompressionLevel) -> Result<EncodingResult> {
        self.clone().with_level(level).encode(code)
    }

    /// Encode with the legacy method
    pub fn encode_legacy(&self, code: &str) -> Result<EncodingResult> {
        self.encode_with(code, Method::Legacy)
    }

    /// Encode with an explicit method
    pub fn encode_with(&self, code: &str, method: Method) -> Result<EncodingResult> {
        let output = self.pipeline.run(code, method)?;
        let size = SizeReport::from_output(&output, &self.limits);

        let game_url = self.links.game_url(&output.escaped, method);
        let qr_url = self.links.qr_url(&game_url);

        info!(
            %method,
            raw = size.raw,
            base64 = size.base64,
            total = size.total,
            remaining = size.remaining,
            "encoded game"
        );
        if let Some(warning) = size.warning() {
            warn!("{warning}");
        }

        Ok(EncodingResult {
            encoded: output.encoded,
            game_url,
            qr_url,
            size,
            metadata: EncodingMetadata {
                method,
                gzip_level: output.level,
                content_kind: ContentKind::detect(code),
                timestamp: Utc::now(),
            },
        })
    }

    /// Validate and encode an API request
    pub fn handle(&self, request: &EncodeRequest) -> Result<EncodingResult> {
        request.validate()?;
        match request.level {
            Some(level) if request.method == Method::Current => {
                self.encode_with_level(&request.code, CompressionLevel::new(level)?)
            },
            _ => self.encode_with(&request.code, request.method),
        }
    }

    /// Encode on tokio's blocking pool; output matches [`Encoder::encode_with`]
    pub async fn encode_async(&self, code: String, method: Method) -> Result<EncodingResult> {
        let encoder = self.clone();
        tokio::task::spawn_blocking(move || encoder.encode_with(&code, method))
            .await
            .map_err(join_error)?
    }

    /// Decode a base64 payload (already URL-unescaped) produced by `method`
    pub fn decode(&self, encoded: &str, method: Method) -> Result<String> {
        let decoded = self.pipeline.decode_payload(encoded, method)?;
        debug!(%method, bytes = decoded.len(), "decoded game");
        Ok(decoded)
    }

    /// Decode the payload of a game link
    pub fn decode_link(&self, link: &str) -> Result<String> {
        let (method, payload) = LinkBuilder::parse_game_url(link)?;
        self.decode(&payload, method)
    }

    /// Size report without building links
    pub fn measure(&self, code: &str, method: Method) -> Result<SizeReport> {
        self.accountant().measure(code, method)
    }

    /// Compare both methods on `code`
    pub fn compare(&self, code: &str) -> Result<ComparisonReport> {
        self.accountant().compare(code)
    }
}

fn join_error(err: tokio::task::JoinError) -> Qr3kError {
    if err.is_panic() {
        Qr3kError::Internal("encode task panicked".to_string())
    } else {
        Qr3kError::Internal(format!("encode task did not complete: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeErrorKind, ErrorCategory};

    const MINIMAL: &str =
        r#"c=document.createElement("canvas");c.width=300;c.height=200;document.body.appendChild(c);"#;

    #[test]
    fn test_encode_result_structure() {
        let result = Encoder::new().encode(MINIMAL).unwrap();

        assert!(!result.encoded.is_empty());
        assert!(result.game_url.starts_with("https://www.vincentbruijn.nl/qr3k/?z="));
        assert!(result
            .qr_url
            .starts_with("https://cdn.vincentbruijn.nl/qr/img.php?q=https%3A%2F%2F"));
        assert_eq!(result.metadata.method, Method::Current);
        assert_eq!(result.metadata.gzip_level, Some(CompressionLevel::DEFAULT));
        assert_eq!(result.metadata.content_kind, ContentKind::Script);
        assert_eq!(result.size.raw, MINIMAL.len());
        assert_eq!(result.size.base64, result.encoded.len());
        assert_eq!(result.size.total, result.size.base64 + result.size.decoder);
    }

    #[test]
    fn test_legacy_result_structure() {
        let result = Encoder::new().encode_legacy(MINIMAL).unwrap();
        assert!(result.game_url.contains("?x="));
        assert_eq!(result.metadata.gzip_level, None);
        assert_eq!(result.size.compressed, None);
    }

    #[test]
    fn test_encode_is_repeatable() {
        let encoder = Encoder::new();
        assert_eq!(encoder.encode(MINIMAL).unwrap(), encoder.encode(MINIMAL).unwrap());
    }

    #[test]
    fn test_decode_roundtrip() {
        let encoder = Encoder::new();
        for method in Method::all() {
            let result = encoder.encode_with(MINIMAL, *method).unwrap();
            assert_eq!(encoder.decode(&result.encoded, *method).unwrap(), MINIMAL);
            assert_eq!(encoder.decode_link(&result.game_url).unwrap(), MINIMAL);
        }
    }

    #[test]
    fn test_metadata_serializes_method_identifier() {
        let result = Encoder::new().encode(MINIMAL).unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["metadata"]["method"], "gzip+xor+base64");
        assert_eq!(json["size"]["method"], "gzip+xor+base64");
        assert_eq!(json["metadata"]["gzip_level"], 6);

        let legacy = Encoder::new().encode_legacy(MINIMAL).unwrap();
        let json: serde_json::Value = serde_json::from_str(&legacy.to_json().unwrap()).unwrap();
        assert_eq!(json["metadata"]["method"], "xor+base64");
    }

    #[test]
    fn test_request_accepts_short_method_names() {
        let request: EncodeRequest =
            serde_json::from_str(r#"{"code":"x=1","method":"legacy"}"#).unwrap();
        assert_eq!(request.method, Method::Legacy);
    }

    #[test]
    fn test_handle_rejects_empty_code() {
        let err = Encoder::new().handle(&EncodeRequest::new("   \n")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_handle_rejects_bad_level() {
        let request = EncodeRequest {
            level: Some(42),
            ..EncodeRequest::new(MINIMAL)
        };
        assert!(matches!(
            Encoder::new().handle(&request),
            Err(Qr3kError::Compression(_))
        ));
    }

    #[test]
    fn test_handle_from_json_body() {
        let request: EncodeRequest =
            serde_json::from_str(r#"{"code":"<canvas></canvas>","level":9}"#).unwrap();
        let result = Encoder::new().handle(&request).unwrap();
        assert_eq!(result.metadata.gzip_level, Some(CompressionLevel::MAX));
        assert_eq!(result.metadata.content_kind, ContentKind::Html);
    }

    #[test]
    fn test_decode_garbage_is_corrupted_data() {
        let err = Encoder::new().decode("!!!!", Method::Current).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CorruptedData);
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Base64));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.compression.level = CompressionLevel::MAX;
        config.links.game_base_url = "https://games.test/play".to_string();

        let encoder = Encoder::from_config(&config).unwrap();
        let result = encoder.encode("x=1").unwrap();
        assert!(result.game_url.starts_with("https://games.test/play?z="));
        assert_eq!(result.metadata.gzip_level, Some(CompressionLevel::MAX));
    }

    #[tokio::test]
    async fn test_panicked_task_is_internal_error() {
        let err = tokio::task::spawn_blocking(|| panic!("boom"))
            .await
            .map_err(join_error)
            .unwrap_err();
        assert!(matches!(err, Qr3kError::Internal(_)));
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("panicked"));
    }

    #[tokio::test]
    async fn test_encode_async_matches_sync() {
        let encoder = Encoder::new();
        let sync = encoder.encode_with(MINIMAL, Method::Current).unwrap();
        let async_result = encoder
            .encode_async(MINIMAL.to_string(), Method::Current)
            .await
            .unwrap();
        assert_eq!(sync.encoded, async_result.encoded);
        assert_eq!(sync, async_result);
    }
}
