//! Caller-side cancellation for a single pipeline call.
//!
//! A [`Context`] carries three things across thread boundaries:
//!
//! - a **done signal**: a zero-capacity channel whose only sender lives in the
//!   paired [`CancelHandle`]. Cancelling drops the sender, which disconnects
//!   the channel and wakes every thread selecting on it at once;
//! - an optional **deadline**, observed by waiters with
//!   [`crossbeam_channel::at`];
//! - an optional **cause**, reported by [`Context::cause`] once the context
//!   is done.
//!
//! Contexts are cheap to clone; all clones observe the same cancellation.
//!
//! Dropping a [`CancelHandle`] cancels its context. Bind the handle to a named
//! variable for as long as the context should stay live:
//!
//! ```
//! use primeflow::Context;
//! use std::time::Duration;
//!
//! // `_` drops the handle immediately: this context is already cancelled.
//! let (ctx, _) = Context::with_timeout(Duration::from_secs(5));
//! assert!(ctx.is_done());
//!
//! // `_handle` keeps it alive until the end of the scope.
//! let (ctx, _handle) = Context::with_timeout(Duration::from_secs(5));
//! assert!(!ctx.is_done());
//! ```

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::{
    sync::{Arc, OnceLock},
    time::{Duration, Instant},
};

/// A shareable error value recorded as the reason a context was cancelled.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The generic reason a context is done when no cause was recorded.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Uninhabited message type: the done channel never carries a value, it is
/// only ever disconnected.
pub(crate) enum Closed {}

struct Inner {
    done: Receiver<Closed>,
    deadline: Option<Instant>,
    timeout_cause: Option<Cause>,
    cancel_cause: OnceLock<Cause>,
    state: OnceLock<ContextError>,
}

impl Inner {
    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Cancellation and deadline scope for a pipeline call.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    fn build(deadline: Option<Instant>, timeout_cause: Option<Cause>) -> (Self, CancelHandle) {
        let (tx, rx) = crossbeam_channel::bounded(0);
        let inner = Arc::new(Inner {
            done: rx,
            deadline,
            timeout_cause,
            cancel_cause: OnceLock::new(),
            state: OnceLock::new(),
        });
        let handle = CancelHandle {
            _tx: tx,
            inner: Arc::clone(&inner),
        };
        (Self { inner }, handle)
    }

    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            inner: Arc::new(Inner {
                done: crossbeam_channel::never(),
                deadline: None,
                timeout_cause: None,
                cancel_cause: OnceLock::new(),
                state: OnceLock::new(),
            }),
        }
    }

    /// A context cancelled through the returned handle.
    ///
    /// Dropping the handle cancels the context as well.
    #[must_use = "dropping the CancelHandle cancels the context"]
    pub fn with_cancel() -> (Self, CancelHandle) {
        Self::build(None, None)
    }

    /// A context that is done once `deadline` passes or the handle cancels it.
    #[must_use = "dropping the CancelHandle cancels the context"]
    pub fn with_deadline(deadline: Instant) -> (Self, CancelHandle) {
        Self::build(Some(deadline), None)
    }

    /// A context that is done `timeout` from now or when the handle cancels it.
    #[must_use = "dropping the CancelHandle cancels the context"]
    pub fn with_timeout(timeout: Duration) -> (Self, CancelHandle) {
        Self::build(Some(Instant::now() + timeout), None)
    }

    /// Like [`Context::with_timeout`], but reports `cause` instead of
    /// [`ContextError::DeadlineExceeded`] when the deadline is what fired.
    #[must_use = "dropping the CancelHandle cancels the context"]
    pub fn with_timeout_cause<E>(timeout: Duration, cause: E) -> (Self, CancelHandle)
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::build(Some(Instant::now() + timeout), Some(Arc::new(cause)))
    }

    /// The deadline, if one was set.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Returns why the context is done, or `None` while it is still live.
    ///
    /// The first observed reason sticks: a context whose deadline passed
    /// before it was cancelled keeps reporting
    /// [`ContextError::DeadlineExceeded`].
    pub fn err(&self) -> Option<ContextError> {
        if let Some(state) = self.inner.state.get() {
            return Some(*state);
        }

        if self.inner.deadline_passed() {
            return Some(*self.inner.state.get_or_init(|| ContextError::DeadlineExceeded));
        }

        match self.inner.done.try_recv() {
            Err(TryRecvError::Disconnected) => {
                Some(*self.inner.state.get_or_init(|| ContextError::Canceled))
            }
            _ => None,
        }
    }

    /// Returns `true` once the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Returns the reason the context is done.
    ///
    /// This is the cause passed to [`CancelHandle::cancel_with_cause`] or
    /// [`Context::with_timeout_cause`] when one applies, and the matching
    /// [`ContextError`] otherwise. `None` while the context is live.
    pub fn cause(&self) -> Option<Cause> {
        let err = self.err()?;
        let recorded = match err {
            ContextError::Canceled => self.inner.cancel_cause.get().cloned(),
            ContextError::DeadlineExceeded => self.inner.timeout_cause.clone(),
        };
        Some(recorded.unwrap_or_else(|| Arc::new(err) as Cause))
    }

    /// Blocks the current thread until the context is done.
    pub fn wait(&self) {
        let deadline = self.timer();
        crossbeam_channel::select! {
            recv(self.inner.done) -> _ => {}
            recv(deadline) -> _ => {}
        }
    }

    /// The done channel. It never yields a message; it disconnects on cancel.
    pub(crate) fn done_signal(&self) -> &Receiver<Closed> {
        &self.inner.done
    }

    /// A one-shot timer channel for the deadline, or a channel that never
    /// fires when there is none.
    pub(crate) fn timer(&self) -> Receiver<Instant> {
        self.inner
            .deadline
            .map_or_else(crossbeam_channel::never, crossbeam_channel::at)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

/// Cancels the [`Context`] it was created with.
///
/// The handle owns the only sender of the context's done channel, so
/// cancellation happens exactly once: on [`cancel`](Self::cancel),
/// [`cancel_with_cause`](Self::cancel_with_cause), or drop.
#[must_use = "dropping the CancelHandle cancels the context"]
pub struct CancelHandle {
    _tx: Sender<Closed>,
    inner: Arc<Inner>,
}

impl CancelHandle {
    /// Cancels the context.
    pub fn cancel(self) {
        drop(self);
    }

    /// Cancels the context and records `cause` as the reason.
    pub fn cancel_with_cause<E>(self, cause: E)
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let _ = self.inner.cancel_cause.set(Arc::new(cause));
        drop(self);
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        // Record the reason before `_tx` is dropped and waiters wake up.
        let passed = self.inner.deadline_passed();
        self.inner.state.get_or_init(|| {
            if passed {
                ContextError::DeadlineExceeded
            } else {
                ContextError::Canceled
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(thiserror::Error, Debug)]
    #[error("operator requested stop")]
    struct StopRequested;

    #[test]
    fn background_is_never_done() {
        let ctx = Context::background();
        assert!(!ctx.is_done());
        assert!(ctx.err().is_none());
        assert!(ctx.cause().is_none());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn cancel_marks_every_clone_done() {
        let (ctx, handle) = Context::with_cancel();
        let clone = ctx.clone();
        assert!(!ctx.is_done());

        handle.cancel();

        assert_eq!(ctx.err(), Some(ContextError::Canceled));
        assert_eq!(clone.err(), Some(ContextError::Canceled));
        let cause = clone.cause().unwrap();
        assert_eq!(
            cause.downcast_ref::<ContextError>(),
            Some(&ContextError::Canceled)
        );
    }

    #[test]
    fn dropping_the_handle_cancels() {
        let (ctx, handle) = Context::with_cancel();
        drop(handle);
        assert!(ctx.is_done());
    }

    #[test]
    fn discarded_handle_cancels_at_once() {
        let (ctx, _) = Context::with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.err(), Some(ContextError::Canceled));

        let (ctx, _handle) = Context::with_timeout(Duration::from_secs(60));
        assert!(!ctx.is_done());
        assert!(ctx.deadline().is_some());
    }

    #[test]
    fn cancel_with_cause_is_reported() {
        let (ctx, handle) = Context::with_cancel();
        handle.cancel_with_cause(StopRequested);

        assert_eq!(ctx.err(), Some(ContextError::Canceled));
        let cause = ctx.cause().unwrap();
        assert!(cause.downcast_ref::<StopRequested>().is_some());
    }

    #[test]
    fn deadline_fires_without_cancel() {
        let (ctx, _handle) = Context::with_timeout(Duration::from_millis(20));
        assert!(!ctx.is_done());

        ctx.wait();

        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
        let cause = ctx.cause().unwrap();
        assert_eq!(
            cause.downcast_ref::<ContextError>(),
            Some(&ContextError::DeadlineExceeded)
        );
    }

    #[test]
    fn timeout_cause_replaces_deadline_exceeded() {
        let (ctx, _handle) = Context::with_timeout_cause(Duration::from_millis(10), StopRequested);
        ctx.wait();

        let cause = ctx.cause().unwrap();
        assert!(cause.downcast_ref::<StopRequested>().is_some());
    }

    #[test]
    fn first_reason_sticks() {
        let (ctx, handle) = Context::with_timeout(Duration::from_secs(60));
        handle.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Canceled));

        let (ctx, handle) = Context::with_deadline(Instant::now());
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
        handle.cancel();
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[test]
    fn wait_wakes_on_cancel_from_another_thread() {
        let (ctx, handle) = Context::with_cancel();
        let waiter = {
            let ctx = ctx.clone();
            thread::spawn(move || ctx.wait())
        };

        thread::sleep(Duration::from_millis(10));
        handle.cancel();

        waiter.join().unwrap();
        assert!(ctx.is_done());
    }
}
