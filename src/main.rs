// src/main.rs

use anyhow::Context;
use clap::Parser;
use gitrot::cli::Args;
use gitrot::{analyzer, matcher, report};
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file could be analyzed
fn run(args: &Args) -> anyhow::Result<bool> {
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    let start_time = Instant::now();
    let results = analyzer::analyze(&args.files);

    let mut files = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(analysis) => {
                if let Some(e) = &analysis.truncated {
                    eprintln!(
                        "{}: {e}; analyzing the {} lines read before it",
                        path.display(),
                        analysis.file.stats.lines
                    );
                }
                files.push(analysis.file);
            }
            Err(e) => {
                eprintln!("{e}");
                failed += 1;
            }
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for file in &files {
        let pairs = matcher::find_stale_pairs(file, args.range);
        report::write_stale_pairs(&mut out, file, &pairs, args.range, args.dates)?;
    }

    if args.verbose {
        for file in &files {
            report::write_blocks(&mut out, file)?;
        }
    }

    if args.stats {
        report::write_stats(&mut out, args.files.len(), &files)?;
    }
    out.flush()?;

    tracing::info!(
        elapsed = ?start_time.elapsed(),
        analyzed = files.len(),
        failed,
        "analysis finished"
    );
    Ok(failed == 0)
}
