use super::shutdown::Trigger;
use crate::{
    context::{Cause, Context, ContextError},
    error::{Error, Result},
};
use crossbeam_channel::{Receiver, select};
use std::{io, sync::Arc};

/// How a call left the `Running` state. Exactly one is ever produced.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Every number was dispatched, factorized and written.
    Completed,
    /// The caller's context fired first.
    Cancelled(Cause),
    /// A sink write failed first.
    Failed(io::Error),
    /// A pipeline thread could not be started.
    SpawnFailed(io::Error),
}

impl Outcome {
    pub(crate) fn cancelled(ctx: &Context) -> Self {
        let cause = ctx
            .cause()
            .unwrap_or_else(|| Arc::new(ContextError::Canceled) as Cause);
        Self::Cancelled(cause)
    }

    pub(crate) fn into_result(self) -> Result<()> {
        match self {
            Self::Completed => Ok(()),
            Self::Cancelled(source) => Err(Error::Cancelled { source }),
            Self::Failed(source) => Err(Error::WriterInteraction { source }),
            Self::SpawnFailed(source) => Err(Error::Spawn { source }),
        }
    }
}

/// Waits for the first of: context cancellation, context deadline, a write
/// failure, or completion, then fires the shutdown broadcast.
///
/// Completion is observed as `failures` disconnecting, which only happens once
/// every write worker has returned and dropped its sender. Write workers in
/// turn only return cleanly after the factorization pool, and before it the
/// distributor, ran out of work.
///
/// Runs on the calling thread while the workers run in the surrounding scope.
pub(crate) fn run(ctx: &Context, failures: Receiver<io::Error>, trigger: Trigger) -> Outcome {
    let deadline = ctx.timer();

    let outcome = select! {
        recv(ctx.done_signal()) -> _ => Outcome::cancelled(ctx),
        recv(deadline) -> _ => Outcome::cancelled(ctx),
        recv(failures) -> msg => match msg {
            Ok(err) => Outcome::Failed(err),
            Err(_) => Outcome::Completed,
        },
    };

    #[cfg(feature = "tracing")]
    {
        match &outcome {
            Outcome::Completed => tracing::debug!("Pipeline completed"),
            Outcome::Cancelled(cause) => tracing::debug!("Pipeline cancelled: {cause}"),
            Outcome::Failed(err) => tracing::debug!("Pipeline failed on write: {err}"),
            Outcome::SpawnFailed(_) => {}
        }
    }

    trigger.fire();
    outcome
}
