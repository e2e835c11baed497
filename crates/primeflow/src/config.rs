//! Pool sizing for a [`Factorizer`](crate::Factorizer).
//!
//! Counts are kept signed on purpose: a value coming from a flag, an
//! environment variable or arithmetic can be zero or negative, and that is
//! reported as [`Error::InvalidWorkers`] when the factorizer is built rather
//! than being clamped or wrapped silently.

use crate::error::{Dimension, Error, Result};
use core::num::NonZeroUsize;

/// Requested worker counts for both pipeline stages.
///
/// Both default to the number of logical CPUs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub factorization_workers: isize,
    pub write_workers: isize,
}

impl Config {
    /// Sets the number of threads running trial division.
    #[must_use]
    pub const fn with_factorization_workers(mut self, workers: isize) -> Self {
        self.factorization_workers = workers;
        self
    }

    /// Sets the number of threads writing to the sink.
    #[must_use]
    pub const fn with_write_workers(mut self, workers: isize) -> Self {
        self.write_workers = workers;
        self
    }

    /// Checks both counts and returns them as non-zero sizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkers`] for the first count (factorization
    /// before write) that is zero or negative.
    pub fn validate(&self) -> Result<(NonZeroUsize, NonZeroUsize)> {
        let factorization = positive(Dimension::Factorization, self.factorization_workers)?;
        let write = positive(Dimension::Write, self.write_workers)?;
        Ok((factorization, write))
    }

    /// Validates the configuration and builds a [`Factorizer`](crate::Factorizer).
    pub fn build(self) -> Result<crate::Factorizer> {
        crate::Factorizer::new(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        let cpus = default_workers();
        Self {
            factorization_workers: cpus,
            write_workers: cpus,
        }
    }
}

fn default_workers() -> isize {
    isize::try_from(num_cpus::get()).unwrap_or(isize::MAX).max(1)
}

fn positive(dimension: Dimension, value: isize) -> Result<NonZeroUsize> {
    usize::try_from(value)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or(Error::InvalidWorkers { dimension, value })
}
