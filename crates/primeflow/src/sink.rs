//! The output side of the pipeline.
//!
//! A [`Sink`] is shared by every write worker of a call, so it must be
//! [`Sync`] and must serialize concurrent writes on its own. The pipeline
//! calls [`Sink::write`] exactly once per result line and never holds a lock
//! around it.
//!
//! Implementations are provided for the process-wide standard streams (which
//! lock internally), for any `Mutex<W>` wrapping a [`Write`] and through
//! references and [`Arc`].

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

/// A thread-safe byte consumer.
pub trait Sink: Sync {
    /// Writes the whole of `buf`.
    ///
    /// Any error aborts the batch the write belongs to.
    fn write(&self, buf: &[u8]) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for &S {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        (**self).write(buf)
    }
}

impl<S: Sink + Send + ?Sized> Sink for Arc<S> {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        (**self).write(buf)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        (**self).write(buf)
    }
}

impl Sink for io::Stdout {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        self.lock().write_all(buf)
    }
}

impl Sink for io::Stderr {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        self.lock().write_all(buf)
    }
}

impl<W: Write + Send> Sink for Mutex<W> {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        // A writer poisoned by a panicking thread can't be trusted to hold a
        // consistent prefix of the output.
        let mut writer = self
            .lock()
            .map_err(|_| io::Error::other("sink writer poisoned"))?;
        writer.write_all(buf)
    }
}
