//! Per-encoding size report.

use serde::Serialize;

use super::limits::{LimitStatus, Limits};
use crate::codec::{Method, PipelineOutput, Stage};

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Byte counts at every stage boundary plus the limit verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeReport {
    /// Method measured
    pub method: Method,
    /// UTF-8 input length
    pub raw: usize,
    /// Gzip output length (current method only)
    pub compressed: Option<usize>,
    /// Cipher output length
    pub encrypted: usize,
    /// Base64 length
    pub base64: usize,
    /// URL-escaped length
    pub url: usize,
    /// Decoder overhead counted against the capacity
    pub decoder: usize,
    /// `base64 + decoder`
    pub total: usize,
    /// QR capacity
    pub limit: usize,
    /// Soft warning threshold
    pub soft_limit: usize,
    /// `total > limit`
    pub is_over_limit: bool,
    /// `soft_limit < total <= limit`
    pub is_approaching_limit: bool,
    /// `limit - total`, negative when over
    pub remaining: i64,
    /// `(1 - compressed / raw) * 100`, one decimal (current method only)
    pub compression_ratio: Option<f64>,
    /// `raw - compressed` (current method only)
    pub savings: Option<i64>,
}

impl SizeReport {
    /// Build a report from a pipeline run
    pub fn from_output(output: &PipelineOutput, limits: &Limits) -> Self {
        let base64 = output.encoded.len();
        let total = limits.total(base64);
        let compressed = output.bytes_after(Stage::Compress);
        let raw = output.raw_bytes;

        let compression_ratio = compressed.map(|c| {
            if raw == 0 {
                0.0
            } else {
                round1((1.0 - c as f64 / raw as f64) * 100.0)
            }
        });

        Self {
            method: output.method,
            raw,
            compressed,
            encrypted: output.bytes_after(Stage::Cipher).unwrap_or(raw),
            base64,
            url: output.escaped.len(),
            decoder: limits.overhead,
            total,
            limit: limits.capacity,
            soft_limit: limits.soft_limit,
            is_over_limit: limits.is_over(total),
            is_approaching_limit: limits.is_approaching(total),
            remaining: limits.remaining(total),
            compression_ratio,
            savings: compressed.map(|c| raw as i64 - c as i64),
        }
    }

    /// Combined status for display
    pub fn status(&self) -> LimitStatus {
        if self.is_over_limit {
            LimitStatus::Over
        } else if self.is_approaching_limit {
            LimitStatus::Approaching
        } else {
            LimitStatus::Ok
        }
    }

    /// Named byte counts in stage order, skipping stages the method lacks
    pub fn checkpoints(&self) -> Vec<(&'static str, usize)> {
        let mut points = vec![("raw", self.raw)];
        if let Some(compressed) = self.compressed {
            points.push(("compressed", compressed));
        }
        points.extend([
            ("encrypted", self.encrypted),
            ("base64", self.base64),
            ("url", self.url),
        ]);
        points
    }

    /// Warning to show the user, if the payload is over or near the limit
    pub fn warning(&self) -> Option<String> {
        match self.status() {
            LimitStatus::Over => Some(format!(
                "Code size ({} bytes) exceeds QR code limit of {} bytes by {} bytes. \
                 QR code may not work.",
                self.total,
                self.limit,
                self.total - self.limit
            )),
            LimitStatus::Approaching => Some(format!(
                "Code size ({} bytes) is approaching the QR code limit. {} bytes remaining.",
                self.total, self.remaining
            )),
            LimitStatus::Ok => None,
        }
    }
}
