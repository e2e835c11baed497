use super::shutdown::Shutdown;
use crossbeam_channel::{Sender, select};

/// Hands `numbers` to the factorization pool, one rendezvous per number, in
/// slice order.
///
/// Returns when the slice is exhausted, when shutdown is signalled, or when
/// every factorization worker is gone. Dropping `tx` on return is the "no more
/// work" signal for the pool. Numbers not yet handed off are never processed.
pub(crate) fn run(numbers: &[isize], tx: Sender<isize>, shutdown: &Shutdown) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Distributor started with {} numbers", numbers.len());

    for &n in numbers {
        if shutdown.is_signalled() {
            break;
        }

        let delivered = select! {
            send(tx, n) -> res => res.is_ok(),
            recv(shutdown.signal()) -> _ => false,
        };
        if !delivered {
            break;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Distributor stopped");
}
