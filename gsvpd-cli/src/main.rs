//! gsvpd CLI - Command-line interface
//!
//! Downloads every panorama listed in a JSON dataset and prints a summary.

mod args;
mod dataset;
mod error;
mod format;
mod runner;
mod settings;

use args::Args;
use clap::Parser;
use dataset::load_dataset;
use error::CliError;
use format::format_elapsed;
use gsvpd::coord::ZoomLevel;
use runner::CliRunner;
use settings::RunSettings;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let zoom = ZoomLevel::new(args.zoom)?;
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;

    let pano_ids = load_dataset(&args.dataset, args.limit)?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let settings = RunSettings::resolve(&args, runner.config(), cwd);

    runner.log_startup(pano_ids.len(), zoom, &settings);

    let start = Instant::now();
    let outcome = runner.run_batch(&pano_ids, zoom, &settings)?;
    let elapsed = start.elapsed();

    println!();
    println!("{}", "-".repeat(85));
    println!(
        "| Processed {}/{} panos in {}",
        outcome.succeeded,
        outcome.total,
        format_elapsed(elapsed)
    );
    println!("| Saved at {}", outcome.output_dir.display());
    println!();

    Ok(())
}
