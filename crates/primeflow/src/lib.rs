#![doc = include_str!("../README.md")]

mod config;
mod context;
mod error;
mod factor;
mod line;
mod pipeline;
mod sink;

pub use crate::config::*;
pub use crate::context::{CancelHandle, Cause, Context, ContextError};
pub use crate::error::*;
pub use crate::factor::*;
pub use crate::line::*;
pub use crate::pipeline::Factorizer;
pub use crate::sink::*;
