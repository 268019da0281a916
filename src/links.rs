//! Game and QR-image link construction.
//!
//! Link layout is fixed by codes already printed:
//!
//! ```text
//! game: https://www.vincentbruijn.nl/qr3k/?z=<url-escaped base64>
//! qr:   https://cdn.vincentbruijn.nl/qr/img.php?q=<url-escaped game link>
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::codec::{url_escape, url_unescape, Method};
use crate::error::{Qr3kError, Result};

/// Runtime page that decodes and runs games
pub const DEFAULT_GAME_BASE_URL: &str = "https://www.vincentbruijn.nl/qr3k/";

/// Endpoint rendering a QR image for its `q` parameter
pub const DEFAULT_QR_BASE_URL: &str = "https://cdn.vincentbruijn.nl/qr/img.php";

/// Builds game and QR-image links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkBuilder {
    /// Base URL of the game runtime page
    pub game_base_url: String,
    /// Base URL of the QR rendering endpoint
    pub qr_base_url: String,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self {
            game_base_url: DEFAULT_GAME_BASE_URL.to_string(),
            qr_base_url: DEFAULT_QR_BASE_URL.to_string(),
        }
    }
}

impl LinkBuilder {
    /// Builder with the default endpoints
    pub fn new() -> Self {
        Self::default()
    }

    /// Game link for an already URL-escaped payload
    pub fn game_url(&self, escaped_payload: &str, method: Method) -> String {
        format!(
            "{}?{}={}",
            self.game_base_url,
            method.query_param(),
            escaped_payload
        )
    }

    /// QR-image link wrapping a game link
    pub fn qr_url(&self, game_url: &str) -> String {
        format!("{}?q={}", self.qr_base_url, url_escape(game_url))
    }

    /// Extract the method and base64 payload from a game link.
    ///
    /// The query parameter name is the only signal of which method produced
    /// the payload.
    pub fn parse_game_url(link: &str) -> Result<(Method, String)> {
        let url = Url::parse(link.trim())
            .map_err(|e| Qr3kError::InvalidInput(format!("not a valid link: {e}")))?;
        let query = url
            .query()
            .ok_or_else(|| Qr3kError::InvalidInput("link has no query string".to_string()))?;

        for pair in query.split('&') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if let Some(method) = Method::from_query_param(name) {
                return Ok((method, url_unescape(value)?));
            }
        }

        Err(Qr3kError::InvalidInput(
            "link carries no game payload (expected `z` or `x` parameter)".to_string(),
        ))
    }
}
