//! Error types for the factorization pipeline.
//!
//! This module defines the central `Error` enum, which captures every failure
//! a [`Factorizer`] can report. Exactly one variant is produced per failed
//! call, no matter how many workers observed a problem.
//!
//! ## Error Cases
//! - `InvalidWorkers`: A worker count was zero or negative. Raised only when
//!   the factorizer is constructed, never while it runs.
//! - `Cancelled`: The caller's [`Context`] was cancelled or hit its deadline
//!   before every number was written.
//! - `WriterInteraction`: The sink rejected a write. The underlying I/O error is
//!   kept as the error source.
//! - `Spawn`: The OS refused to start one of the pipeline threads. Threads
//!   that did start are stopped and joined before this is returned.
//!
//! [`Factorizer`]: crate::Factorizer
//! [`Context`]: crate::Context

use crate::context::Cause;
use core::fmt;
use std::io;

pub type Result<T> = core::result::Result<T, Error>;

/// Identifies which worker pool a configuration value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// The pool that runs trial division.
    Factorization,
    /// The pool that calls the sink.
    Write,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factorization => f.write_str("factorization"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Unified error type for the factorization pipeline.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A worker pool was configured with a non-positive size.
    #[error("invalid number of {dimension} workers: {value} (must be greater than 0)")]
    InvalidWorkers { dimension: Dimension, value: isize },

    /// The caller's context fired before the batch completed.
    ///
    /// `source` is the cause recorded on the context, or the context's own
    /// [`ContextError`](crate::ContextError) when no cause was recorded.
    #[error("factorization cancelled: {source}")]
    Cancelled {
        #[source]
        source: Cause,
    },

    /// The sink returned an error from a write call.
    #[error("writer interaction failed: {source}")]
    WriterInteraction {
        #[source]
        source: io::Error,
    },

    /// A worker or distributor thread could not be created.
    #[error("failed to spawn pipeline thread: {source}")]
    Spawn {
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Returns `true` if the call was stopped by its context.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` if the sink failed a write.
    pub const fn is_writer_interaction(&self) -> bool {
        matches!(self, Self::WriterInteraction { .. })
    }

    /// Returns `true` if a pipeline thread could not be started.
    pub const fn is_spawn(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}
