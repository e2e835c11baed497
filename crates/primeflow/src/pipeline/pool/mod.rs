//! The two worker pools of the pipeline.
//!
//! Both pools are plain OS threads spawned into the call's
//! [`std::thread::scope`]. Each thread runs one of the loops below until its
//! input disconnects or the shutdown broadcast fires:
//!
//! - [`factor_worker`] - receives numbers, factorizes and formats them, and
//!   hands the resulting lines to the write pool.
//! - [`write_worker`] - receives lines and writes each one to the sink with a
//!   single call, reporting the first failure to the coordinator.
//!
//! Every receive and every handoff is a `select!` against the broadcast, so a
//! worker never stays blocked on a rendezvous that will not happen.

pub(crate) mod factor_worker;
pub(crate) mod write_worker;
