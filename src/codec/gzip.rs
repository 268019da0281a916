//! Gzip compression codec (current method only).
//!
//! The gzip container carries a CRC-32 and length trailer, so a damaged or
//! truncated payload is rejected instead of decoding to garbage. The browser
//! runtime inflates it with `DecompressionStream("gzip")`.

use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::{DecodeErrorKind, Qr3kError, Result};

/// Magic bytes opening every gzip member
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Smallest possible gzip member: 10 byte header + 8 byte trailer
const GZIP_MIN_LEN: usize = 18;

/// Gzip effort level (1 = fastest, 9 = smallest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// Fastest level
    pub const MIN: CompressionLevel = CompressionLevel(1);
    /// Smallest-output level
    pub const MAX: CompressionLevel = CompressionLevel(9);
    /// Mid-range default used by every encoder
    pub const DEFAULT: CompressionLevel = CompressionLevel(6);

    /// Validate a level
    pub fn new(level: u32) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Qr3kError::Compression(format!(
                "compression level {level} out of range {}..={}",
                Self::MIN.0,
                Self::MAX.0
            )))
        }
    }

    /// Numeric level
    pub fn get(self) -> u32 {
        self.0
    }

    /// Every valid level, fastest first
    pub fn all() -> impl Iterator<Item = CompressionLevel> {
        (Self::MIN.0..=Self::MAX.0).map(CompressionLevel)
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for CompressionLevel {
    type Error = Qr3kError;

    fn try_from(level: u32) -> Result<Self> {
        Self::new(level)
    }
}

impl From<CompressionLevel> for u32 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gzip codec
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipCodec {
    /// Compression level
    pub level: CompressionLevel,
}

impl GzipCodec {
    /// Create codec with the default level
    pub fn new() -> Self {
        Self::default()
    }

    /// Create codec with a specific level
    pub fn with_level(level: CompressionLevel) -> Self {
        Self { level }
    }

    /// Compress bytes into a gzip member.
    ///
    /// The header MTIME is zero, so identical input and level always give
    /// identical output.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.level.get()));
        encoder
            .write_all(data)
            .map_err(|e| Qr3kError::Compression(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| Qr3kError::Compression(e.to_string()))
    }

    /// Decompress exactly one gzip member, verifying its checksum
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() < GZIP_MIN_LEN {
            return Err(Qr3kError::decode(
                DecodeErrorKind::Decompression,
                format!("gzip data truncated ({} bytes)", data.len()),
            ));
        }
        if data[..2] != GZIP_MAGIC {
            return Err(Qr3kError::decode(
                DecodeErrorKind::Decompression,
                "missing gzip header",
            ));
        }

        let mut decoder = GzDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| Qr3kError::decode(DecodeErrorKind::Decompression, e.to_string()))?;

        // The runtime's DecompressionStream rejects anything after the member
        let rest = decoder.into_inner();
        if !rest.is_empty() {
            return Err(Qr3kError::decode(
                DecodeErrorKind::Decompression,
                format!("{} bytes of trailing data after gzip member", rest.len()),
            ));
        }
        Ok(decompressed)
    }
}
