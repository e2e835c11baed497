//! The two-stage factorization pipeline.
//!
//! ```text
//!  numbers ─► distributor ─┬─► factor worker ─┬─► write worker ─► sink
//!                          ├─► factor worker ─┤
//!                          └─► ...            └─► ...
//!                    ▲                 ▲                 │
//!                    └──── shutdown ◄── coordinator ◄─────┘ write failure
//!                                          ▲
//!                                       context
//! ```
//!
//! ## Submodules
//!
//! - [`distributor`] - hands the input out in order.
//! - [`pool`] - the factorization and write worker loops.
//! - [`coordinator`] - picks the single outcome and broadcasts shutdown.
//! - [`shutdown`] - the close-once broadcast itself.
//! - [`spawn`] - thread creation that reports a refused thread as an error.
//!
//! Every stage boundary is a zero-capacity `crossbeam_channel` (a handoff
//! completes only when both sides meet), so at most one item per worker is in
//! flight and a fast stage cannot run ahead of a slow one.

mod coordinator;
mod distributor;
mod pool;
mod shutdown;
mod spawn;


use crate::{
    config::Config,
    context::Context,
    error::Result,
    line::ResultLine,
    sink::Sink,
};
use coordinator::Outcome;
use core::num::NonZeroUsize;
use pool::{factor_worker, write_worker};
use spawn::{OsThreads, Spawn};
use std::{io, thread};

/// Factorizes batches of numbers with a fixed-size pair of worker pools.
///
/// A `Factorizer` only holds its validated pool sizes; the threads, channels
/// and shutdown signal of a batch are created by [`Factorizer::factorize`]
/// and torn down before it returns.
///
/// ```
/// use primeflow::{Config, Context, Factorizer};
/// use std::sync::Mutex;
///
/// let factorizer = Factorizer::new(
///     Config::default()
///         .with_factorization_workers(2)
///         .with_write_workers(1),
/// )?;
///
/// let sink = Mutex::new(Vec::new());
/// factorizer.factorize(&Context::background(), &[12], &sink)?;
/// assert_eq!(sink.into_inner().unwrap(), b"12 = 2 * 2 * 3\n");
/// # Ok::<(), primeflow::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Factorizer {
    factorization_workers: NonZeroUsize,
    write_workers: NonZeroUsize,
}

impl Factorizer {
    /// Validates `config` and builds a factorizer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkers`](crate::Error::InvalidWorkers) if
    /// either worker count is zero or negative.
    pub fn new(config: Config) -> Result<Self> {
        let (factorization_workers, write_workers) = config.validate()?;
        Ok(Self {
            factorization_workers,
            write_workers,
        })
    }

    /// Builds a factorizer with one worker per logical CPU in each pool.
    pub fn try_default() -> Result<Self> {
        Self::new(Config::default())
    }

    /// Starts a [`Config`] for use with [`Config::build`].
    pub fn builder() -> Config {
        Config::default()
    }

    /// Number of threads running trial division per call.
    pub const fn factorization_workers(&self) -> usize {
        self.factorization_workers.get()
    }

    /// Number of threads writing to the sink per call.
    pub const fn write_workers(&self) -> usize {
        self.write_workers.get()
    }

    /// Factorizes every number in `numbers` and writes one line per number to
    /// `sink`, in no particular order.
    ///
    /// The call spawns one distributor thread plus the configured number of
    /// factorization and write workers, and coordinates them from the calling
    /// thread. It returns only after all of them have exited.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`](crate::Error::Cancelled) if `ctx` is cancelled
    ///   or reaches its deadline first. A context that is already done
    ///   produces this error without touching `sink`.
    /// - [`Error::WriterInteraction`](crate::Error::WriterInteraction) if a
    ///   sink write fails first.
    /// - [`Error::Spawn`](crate::Error::Spawn) if the OS refuses one of the
    ///   threads. Threads already started are shut down and joined first.
    ///
    /// Lines written before the failure stay in the sink.
    pub fn factorize<S>(&self, ctx: &Context, numbers: &[isize], sink: &S) -> Result<()>
    where
        S: Sink + ?Sized,
    {
        self.run(ctx, numbers, sink, &mut OsThreads)
    }

    pub(crate) fn run<S, Sp>(
        &self,
        ctx: &Context,
        numbers: &[isize],
        sink: &S,
        spawner: &mut Sp,
    ) -> Result<()>
    where
        S: Sink + ?Sized,
        Sp: Spawn,
    {
        if ctx.is_done() {
            return Outcome::cancelled(ctx).into_result();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Factorizing {} numbers with {} factorization and {} write workers",
            numbers.len(),
            self.factorization_workers,
            self.write_workers
        );

        let (trigger, shutdown) = shutdown::channel();
        let (number_tx, number_rx) = crossbeam_channel::bounded::<isize>(0);
        let (line_tx, line_rx) = crossbeam_channel::bounded::<ResultLine>(0);
        let (failure_tx, failure_rx) = crossbeam_channel::bounded::<io::Error>(0);

        let outcome = thread::scope(|s| {
            let start = || -> io::Result<()> {
                let observer = shutdown.clone();
                spawner.spawn(s, "primeflow-distributor".to_owned(), move || {
                    distributor::run(numbers, number_tx, &observer);
                })?;

                for id in 0..self.factorization_workers.get() {
                    let inbox = number_rx.clone();
                    let outbox = line_tx.clone();
                    let observer = shutdown.clone();
                    spawner.spawn(s, format!("primeflow-factor-{id}"), move || {
                        factor_worker::run(id, inbox, outbox, observer);
                    })?;
                }

                for id in 0..self.write_workers.get() {
                    let inbox = line_rx.clone();
                    let failures = failure_tx.clone();
                    let observer = shutdown.clone();
                    spawner.spawn(s, format!("primeflow-write-{id}"), move || {
                        write_worker::run(id, inbox, failures, sink, observer);
                    })?;
                }

                Ok(())
            };

            if let Err(err) = start() {
                #[cfg(feature = "tracing")]
                tracing::error!("Failed to spawn pipeline thread: {err}");

                // Whatever did start unwinds on the broadcast and is joined
                // when the scope ends.
                trigger.fire();
                return Outcome::SpawnFailed(err);
            }

            // From here on only workers hold channel ends, so disconnects
            // propagate stage by stage and reach the coordinator as completion.
            drop((number_rx, line_tx, line_rx, failure_tx, shutdown));

            coordinator::run(ctx, failure_rx, trigger)
        });

        outcome.into_result()
    }
}
