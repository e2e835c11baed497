#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use anyhow::Context as _;
use clap::Parser;
use config::{CliArgs, RunConfig, read_stdin_numbers};
use primeflow::Context;
use std::io;
use telemetry::init_telemetry;
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    init_telemetry()?;

    let factorizer = config.pipeline.build()?;
    let numbers = match config.numbers {
        Some(numbers) => numbers,
        None => tokio::task::spawn_blocking(read_stdin_numbers).await??,
    };

    let (ctx, cancel) = match config.timeout {
        Some(timeout) => Context::with_timeout(timeout),
        None => Context::with_cancel(),
    };

    tracing::debug!(
        numbers = numbers.len(),
        factorization_workers = factorizer.factorization_workers(),
        write_workers = factorizer.write_workers(),
        timeout = ?config.timeout,
        "Starting factorization"
    );

    let worker_ctx = ctx.clone();
    let mut task = tokio::task::spawn_blocking(move || {
        factorizer.factorize(&worker_ctx, &numbers, &io::stdout())
    });

    let result = tokio::select! {
        joined = &mut task => joined?,
        signal = signal::ctrl_c() => {
            signal.context("failed to install Ctrl+C handler")?;
            tracing::info!("Received Ctrl+C signal, cancelling");
            cancel.cancel();
            task.await?
        }
    };

    if let Err(ref e) = result {
        tracing::error!(cancelled = e.is_cancelled(), "Factorization failed: {e}");
    }
    result?;

    Ok(())
}
