use crate::{line::ResultLine, pipeline::shutdown::Shutdown, sink::Sink};
use crossbeam_channel::{Receiver, Sender, select};
use std::io;

/// Main loop of a write worker.
///
/// Receives lines until the factorization pool is done or shutdown fires, and
/// writes each one to `sink` with a single [`Sink::write`] call. A line taken
/// off the channel after shutdown has been signalled is dropped unwritten.
///
/// The first write error this worker hits is handed to the coordinator over
/// `failures` and the worker exits. If the coordinator already shut the call
/// down for another reason, the error is discarded instead: only one outcome
/// is ever reported.
pub(crate) fn run<S>(
    _worker_id: usize,
    lines: Receiver<ResultLine>,
    failures: Sender<io::Error>,
    sink: &S,
    shutdown: Shutdown,
) where
    S: Sink + ?Sized,
{
    #[cfg(feature = "tracing")]
    tracing::trace!("Write worker {_worker_id} started");

    loop {
        let line = select! {
            recv(lines) -> msg => match msg {
                Ok(line) => line,
                Err(_) => break,
            },
            recv(shutdown.signal()) -> _ => break,
        };

        if shutdown.is_signalled() {
            break;
        }

        if let Err(err) = sink.write(line.as_bytes()) {
            #[cfg(feature = "tracing")]
            tracing::warn!("Write worker {_worker_id} failed to write line: {err}");

            select! {
                send(failures, err) -> _ => {},
                recv(shutdown.signal()) -> _ => {},
            }
            break;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Write worker {_worker_id} stopped");
}
