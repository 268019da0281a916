//! Size accounting against the QR capacity.
//!
//! Every report counts the transport-encoded payload plus the runtime decoder
//! overhead against the capacity:
//!
//! ```text
//! total     = base64_len + 180
//! over      = total > 2953
//! near      = 2200 < total <= 2953
//! remaining = 2953 - total
//! ```
//!
//! Going over the limit is a flag on a complete report, never an error.

mod compare;
mod limits;
mod report;

pub use compare::ComparisonReport;
pub use limits::{LimitStatus, Limits, DECODER_OVERHEAD, QR_CAPACITY, SOFT_LIMIT};
pub use report::SizeReport;

use tracing::warn;

use crate::codec::{Method, Pipeline};
use crate::error::Result;

/// Runs the pipeline and measures the result against [`Limits`]
#[derive(Debug, Clone, Default)]
pub struct SizeAccountant {
    pipeline: Pipeline,
    limits: Limits,
}

impl SizeAccountant {
    /// Accountant with the default pipeline and limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a configured pipeline
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Override the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Limits in use
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Size report for `text` encoded with `method`
    pub fn measure(&self, text: &str, method: Method) -> Result<SizeReport> {
        let output = self.pipeline.run(text, method)?;
        let report = SizeReport::from_output(&output, &self.limits);
        if let Some(warning) = report.warning() {
            warn!(%method, total = report.total, "{warning}");
        }
        Ok(report)
    }

    /// Measure both methods with the same limits
    pub fn compare(&self, text: &str) -> Result<ComparisonReport> {
        let current = self.measure(text, Method::Current)?;
        let legacy = self.measure(text, Method::Legacy)?;
        Ok(ComparisonReport::from_reports(current, legacy))
    }
}
