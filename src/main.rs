use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use app_store_static::config::{Cli, Config};
use app_store_static::error::StaticCopyError;
use app_store_static::publisher::{publish, PublishOutcome, Reporter};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_cli(cli)?;

    println!("Scanning: {}", config.source_root.display());
    println!("Output: {}", config.output_root.display());

    // Setup Ctrl+C handler
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    let reporter = Reporter::new(config.verbose, config.quiet);
    let start = Instant::now();

    let report = match publish(&config, &shutdown, &reporter) {
        Ok(PublishOutcome::Published(report)) => report,
        Ok(PublishOutcome::NoStaticFiles) => {
            println!("No static files found!");
            return Ok(ExitCode::SUCCESS);
        }
        Err(StaticCopyError::Cancelled) => {
            eprintln!("\nCopy cancelled");
            return Ok(ExitCode::from(130));
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "Failed to publish static files from {}",
                    config.source_root.display()
                )
            })
        }
    };

    println!("\nDone! Copied {} files.", report.files_copied);
    println!("SVG hashes written to {}", report.manifest_path.display());

    if config.verbose {
        for (app, hash) in report.hashes.iter() {
            eprintln!("  {app}: {hash}");
        }
        eprintln!(
            "{} icon hash(es), {} overwritten in this run, {} bytes written in {:.2}s",
            report.hashes.len(),
            report.overwritten,
            report.bytes_copied,
            start.elapsed().as_secs_f64()
        );
    }

    Ok(ExitCode::SUCCESS)
}
