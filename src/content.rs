//! Payload kind detection.
//!
//! The runtime page injects HTML payloads into the DOM and evaluates anything
//! else as script. The pipeline never looks at content; this is reported in
//! metadata only.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Tags the runtime treats as a sign of markup
    static ref HTML_MARKER: Option<Regex> =
        Regex::new(r"(?i)<!DOCTYPE|<html|<head|<body|<script|<style|<div|<canvas").ok();
}

/// How the runtime will execute a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Injected as markup
    Html,
    /// Evaluated as JavaScript
    Script,
}

impl ContentKind {
    /// Classify source text the same way the runtime page does
    pub fn detect(content: &str) -> Self {
        let trimmed = content.trim();
        let has_marker = HTML_MARKER
            .as_ref()
            .is_some_and(|re| re.is_match(trimmed));
        if trimmed.starts_with('<') || has_marker {
            ContentKind::Html
        } else {
            ContentKind::Script
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Html => write!(f, "html"),
            ContentKind::Script => write!(f, "script"),
        }
    }
}
