use crate::{factor::factorize, line::ResultLine, pipeline::shutdown::Shutdown};
use crossbeam_channel::{Receiver, Sender, select};

/// Main loop of a factorization worker.
///
/// # Arguments
///
/// - `_worker_id`: Index of the worker in its pool, used in traces.
/// - `numbers`: Rendezvous channel fed by the distributor. Disconnects once
///   the input is exhausted.
/// - `lines`: Rendezvous channel read by the write pool.
/// - `shutdown`: Broadcast raced against every receive and handoff.
///
/// # Behavior
///
/// - Factorizes and formats exactly one number per iteration.
/// - Abandons a pending handoff as soon as shutdown is signalled; the line is
///   dropped, never retried.
/// - Exits when `numbers` disconnects, when `lines` has no receivers left, or
///   on shutdown. Dropping `lines` on exit is what lets the write pool see the
///   end of the input.
pub(crate) fn run(
    _worker_id: usize,
    numbers: Receiver<isize>,
    lines: Sender<ResultLine>,
    shutdown: Shutdown,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Factorization worker {_worker_id} started");

    loop {
        let n = select! {
            recv(numbers) -> msg => match msg {
                Ok(n) => n,
                Err(_) => break,
            },
            recv(shutdown.signal()) -> _ => break,
        };

        let line = ResultLine::new(n, &factorize(n));

        let handed_off = select! {
            send(lines, line) -> res => res.is_ok(),
            recv(shutdown.signal()) -> _ => false,
        };
        if !handed_off {
            #[cfg(feature = "tracing")]
            tracing::trace!("Factorization worker {_worker_id} dropped the line for {n}");
            break;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Factorization worker {_worker_id} stopped");
}
