//! Thread creation for a pipeline call.
//!
//! Spawning goes through [`Spawn`] so a refused thread surfaces as an
//! [`io::Error`] instead of a panic. The pipeline reacts by firing shutdown,
//! letting the scope join whatever already started, and reporting
//! [`Error::Spawn`](crate::Error::Spawn).

use std::{
    io,
    thread::{self, Scope},
};

pub(crate) trait Spawn {
    /// Starts `job` on a new thread inside `scope`.
    fn spawn<'scope, 'env, F>(
        &mut self,
        scope: &'scope Scope<'scope, 'env>,
        name: String,
        job: F,
    ) -> io::Result<()>
    where
        F: FnOnce() + Send + 'scope;
}

/// Named OS threads built with [`thread::Builder`].
pub(crate) struct OsThreads;

impl Spawn for OsThreads {
    fn spawn<'scope, 'env, F>(
        &mut self,
        scope: &'scope Scope<'scope, 'env>,
        name: String,
        job: F,
    ) -> io::Result<()>
    where
        F: FnOnce() + Send + 'scope,
    {
        thread::Builder::new()
            .name(name)
            .spawn_scoped(scope, job)
            .map(drop)
    }
}

#[cfg(test)]
pub(crate) use limited::Limited;
