//! CLI entry point for quotestat.

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use quotestat::config::JobConfig;
use quotestat::output::write_results;
use quotestat::preprocessor::Preprocessor;
use quotestat::{orchestrator, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();
    let config = JobConfig::default();

    let start = Instant::now();

    let path = args
        .path
        .to_str()
        .context("input path is not valid UTF-8")?
        .to_string();

    let preprocessor = Preprocessor::new(path.clone(), config.worker_count, config.bucket_length_ns)
        .context("failed to initialize preprocessor")?;
    let data = preprocessor.preprocess().context("failed to preprocess input file")?;

    tracing::info!(
        segments = data.segments.len(),
        intervals = data.intervals.len(),
        "starting map-reduce pass"
    );

    let results = orchestrator::run(&path, &data, &config).context("map-reduce pipeline failed")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_results(&mut handle, &results).context("failed to write results")?;

    let elapsed_ms = start.elapsed().as_millis();
    writeln!(handle, "{elapsed_ms}ms").context("failed to write duration line")?;

    Ok(())
}
