//! QR capacity budget.

use serde::{Deserialize, Serialize};

use crate::error::{Qr3kError, Result};

/// Bytes a version 40-L QR code holds in byte mode
pub const QR_CAPACITY: usize = 2953;

/// Approximate size of the minified runtime decoder sharing the QR code
pub const DECODER_OVERHEAD: usize = 180;

/// Total above which the payload is reported as approaching the limit.
///
/// An absolute byte count, not a fraction of [`QR_CAPACITY`].
pub const SOFT_LIMIT: usize = 2200;

/// How close a payload is to the capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStatus {
    /// Comfortably under the soft limit
    Ok,
    /// Fits, but above the soft limit
    Approaching,
    /// Exceeds capacity
    Over,
}

/// Capacity, decoder overhead and soft limit used for size verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// QR capacity in bytes
    pub capacity: usize,
    /// Bytes reserved for the runtime decoder
    pub overhead: usize,
    /// Soft warning threshold in bytes
    pub soft_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            capacity: QR_CAPACITY,
            overhead: DECODER_OVERHEAD,
            soft_limit: SOFT_LIMIT,
        }
    }
}

impl Limits {
    /// Check that the soft limit sits at or below capacity
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Qr3kError::Config("capacity must be positive".to_string()));
        }
        if self.soft_limit > self.capacity {
            return Err(Qr3kError::Config(format!(
                "soft limit {} exceeds capacity {}",
                self.soft_limit, self.capacity
            )));
        }
        Ok(())
    }

    /// Transport-encoded length plus decoder overhead
    pub fn total(&self, encoded_len: usize) -> usize {
        encoded_len + self.overhead
    }

    /// `total > capacity`
    pub fn is_over(&self, total: usize) -> bool {
        total > self.capacity
    }

    /// `soft_limit < total <= capacity`
    pub fn is_approaching(&self, total: usize) -> bool {
        total > self.soft_limit && total <= self.capacity
    }

    /// Bytes left, negative when over capacity
    pub fn remaining(&self, total: usize) -> i64 {
        self.capacity as i64 - total as i64
    }

    /// Combined status for display
    pub fn status(&self, total: usize) -> LimitStatus {
        if self.is_over(total) {
            LimitStatus::Over
        } else if self.is_approaching(total) {
            LimitStatus::Approaching
        } else {
            LimitStatus::Ok
        }
    }
}
