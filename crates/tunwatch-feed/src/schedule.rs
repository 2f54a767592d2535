//! Retry delay schedule

use std::time::Duration;

use tunwatch_core::prelude::*;

/// Default delays applied after successive connection losses.
pub const DEFAULT_RETRY_DELAYS_SECS: [u64; 4] = [5, 5, 5, 10];

/// Ordered, non-empty sequence of retry delays.
///
/// Indexing past the end repeats the final delay forever, so retrying never
/// terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySchedule {
    delays: Vec<Duration>,
}

impl RetrySchedule {
    /// Build a schedule from delays in whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] if `secs` is empty.
    pub fn from_secs(secs: &[u64]) -> Result<Self> {
        Self::new(secs.iter().copied().map(Duration::from_secs).collect())
    }

    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] if `delays` is empty.
    pub fn new(delays: Vec<Duration>) -> Result<Self> {
        if delays.is_empty() {
            return Err(Error::config_invalid("retry schedule must not be empty"));
        }
        Ok(Self { delays })
    }

    /// Delay for `index`, clamped to the last element.
    pub fn delay(&self, index: usize) -> Duration {
        self.delays[self.clamp(index)]
    }

    /// Index following `index`, clamped to the last valid index.
    pub fn advance(&self, index: usize) -> usize {
        self.clamp(index.saturating_add(1))
    }

    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.delays.len() - 1)
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self {
            delays: DEFAULT_RETRY_DELAYS_SECS
                .iter()
                .copied()
                .map(Duration::from_secs)
                .collect(),
        }
    }
}
