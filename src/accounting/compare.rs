//! Side-by-side comparison of the two methods.

use serde::Serialize;

use super::report::{round1, SizeReport};
use crate::codec::Method;
use crate::error::Result;

/// Legacy and current size reports for one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// UTF-8 input length
    pub raw: usize,
    /// Gzip + XOR + base64
    pub current: SizeReport,
    /// XOR + base64
    pub legacy: SizeReport,
    /// Method with the smaller total (ties go to current)
    pub recommended: Method,
    /// `legacy.total - current.total`
    pub savings: i64,
    /// `savings / legacy.total * 100`, one decimal; 0 for empty input
    pub improvement: f64,
}

impl ComparisonReport {
    /// Compare two reports measured against the same limits
    pub fn from_reports(current: SizeReport, legacy: SizeReport) -> Self {
        debug_assert_eq!(current.limit, legacy.limit);
        debug_assert_eq!(current.decoder, legacy.decoder);

        let savings = legacy.total as i64 - current.total as i64;
        let improvement = if legacy.base64 == 0 || legacy.total == 0 {
            0.0
        } else {
            round1(savings as f64 / legacy.total as f64 * 100.0)
        };
        let recommended = if current.total <= legacy.total {
            Method::Current
        } else {
            Method::Legacy
        };

        Self {
            raw: current.raw,
            current,
            legacy,
            recommended,
            savings,
            improvement,
        }
    }

    /// Report for `method`
    pub fn report(&self, method: Method) -> &SizeReport {
        match method {
            Method::Current => &self.current,
            Method::Legacy => &self.legacy,
        }
    }

    /// Report for the recommended method
    pub fn recommended_report(&self) -> &SizeReport {
        self.report(self.recommended)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Improvement formatted like `"42.5%"`
    pub fn improvement_display(&self) -> String {
        format!("{:.1}%", self.improvement)
    }
}
