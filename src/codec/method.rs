//! Encoding methods and their stage order.

use serde::{Deserialize, Serialize};

/// A single reversible pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Gzip compression
    Compress,
    /// Repeating-key XOR
    Cipher,
    /// Base64 binary-to-text
    Base64,
    /// Percent escaping for the query string
    UrlEscape,
}

impl Stage {
    /// Short stage name
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Compress => "gzip",
            Stage::Cipher => "xor",
            Stage::Base64 => "base64",
            Stage::UrlEscape => "url",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Available encoding methods
///
/// Serialized as the method identifier (`"gzip+xor+base64"`, `"xor+base64"`);
/// `"current"` and `"legacy"` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Method {
    /// XOR + base64 (kept for links already in circulation)
    #[serde(rename = "xor+base64", alias = "legacy")]
    Legacy,
    /// Gzip + XOR + base64
    #[default]
    #[serde(rename = "gzip+xor+base64", alias = "current")]
    Current,
}

impl Method {
    /// Stages applied when encoding, in order.
    ///
    /// Decoding walks the same list backwards. Compression always comes before
    /// the cipher: XOR output is close to uniform noise and barely compresses.
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            Method::Legacy => &[Stage::Cipher, Stage::Base64, Stage::UrlEscape],
            Method::Current => &[
                Stage::Compress,
                Stage::Cipher,
                Stage::Base64,
                Stage::UrlEscape,
            ],
        }
    }

    /// Method identifier reported in metadata
    pub fn name(&self) -> &'static str {
        match self {
            Method::Legacy => "xor+base64",
            Method::Current => "gzip+xor+base64",
        }
    }

    /// Query parameter carrying the payload in game links
    pub fn query_param(&self) -> &'static str {
        match self {
            Method::Legacy => "x",
            Method::Current => "z",
        }
    }

    /// Method whose links use query parameter `param`
    pub fn from_query_param(param: &str) -> Option<Self> {
        match param {
            "x" => Some(Method::Legacy),
            "z" => Some(Method::Current),
            _ => None,
        }
    }

    /// Whether the method has a compression stage
    pub fn compresses(&self) -> bool {
        self.stages().contains(&Stage::Compress)
    }

    /// All methods
    pub fn all() -> &'static [Method] {
        &[Method::Current, Method::Legacy]
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "current" | "gzip" | "z" | "gzip+xor+base64" => Ok(Method::Current),
            "legacy" | "xor" | "x" | "xor+base64" => Ok(Method::Legacy),
            _ => Err(format!("Unknown method: {s}. Use: current, legacy")),
        }
    }
}
