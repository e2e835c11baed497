use anyhow::{Context as _, bail};
use clap::Parser;
use core::time::Duration;
use primeflow::Config;
use std::io::Read;

/// Command-line arguments for the `primeflow` binary.
///
/// Worker counts and the timeout can also come from the environment (or a
/// `.env` file); explicit flags win.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "primeflow",
    version,
    about = "Factorizes integers concurrently and prints one line per number",
    allow_negative_numbers = true
)]
pub struct CliArgs {
    /// Number of threads running trial division.
    ///
    /// Defaults to the number of logical CPUs.
    ///
    /// Environment variable: `FACTORIZATION_WORKERS`
    #[arg(long, env = "FACTORIZATION_WORKERS")]
    pub factorization_workers: Option<isize>,

    /// Number of threads writing result lines to stdout.
    ///
    /// Defaults to the number of logical CPUs.
    ///
    /// Environment variable: `WRITE_WORKERS`
    #[arg(long, env = "WRITE_WORKERS")]
    pub write_workers: Option<isize>,

    /// Abort the batch after this many milliseconds. `0` disables the timeout.
    ///
    /// Environment variable: `TIMEOUT_MS`
    #[arg(long, env = "TIMEOUT_MS", default_value_t = 0)]
    pub timeout_ms: u64,

    /// Numbers to factorize. When empty, whitespace-separated numbers are read
    /// from stdin.
    pub numbers: Vec<isize>,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub pipeline: Config,
    pub timeout: Option<Duration>,
    pub numbers: Option<Vec<isize>>,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let mut pipeline = Config::default();
        if let Some(workers) = args.factorization_workers {
            pipeline = pipeline.with_factorization_workers(workers);
        }
        if let Some(workers) = args.write_workers {
            pipeline = pipeline.with_write_workers(workers);
        }

        if let Err(e) = pipeline.validate() {
            bail!("{e}");
        }

        let timeout = (args.timeout_ms > 0).then(|| Duration::from_millis(args.timeout_ms));
        let numbers = (!args.numbers.is_empty()).then_some(args.numbers);

        Ok(Self {
            pipeline,
            timeout,
            numbers,
        })
    }
}

/// Parses whitespace-separated integers.
pub fn parse_numbers(input: &str) -> anyhow::Result<Vec<isize>> {
    input
        .split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token
                .parse::<isize>()
                .with_context(|| format!("invalid number #{} `{token}`", i + 1))
        })
        .collect()
}

/// Reads all of stdin and parses it with [`parse_numbers`].
pub fn read_stdin_numbers() -> anyhow::Result<Vec<isize>> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read numbers from stdin")?;
    parse_numbers(&input)
}
