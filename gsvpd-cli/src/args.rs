//! Command-line arguments.

use clap::Parser;
use gsvpd::config::DEFAULT_ZOOM;
use std::path::PathBuf;

/// Google Street View panorama downloader.
///
/// Limits left unset fall back to `~/.gsvpd/config.ini` (or `--config`),
/// then to the built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "gsvpd", version = gsvpd::VERSION)]
#[command(about = "Download and stitch Street View panoramas", long_about = None)]
pub struct Args {
    /// Zoom level (0-5)
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Path to a JSON array of panorama ids
    #[arg(long)]
    pub dataset: PathBuf,

    /// Only process the first N panorama ids (0 processes all)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Panoramas processed at once [default: 50]
    #[arg(long = "max-pano")]
    pub max_pano: Option<usize>,

    /// Tile requests in flight at once [default: connection limit]
    #[arg(long = "max-tile")]
    pub max_tile: Option<usize>,

    /// Worker threads for image analysis and stitching [default: 20]
    #[arg(long)]
    pub workers: Option<usize>,

    /// HTTP connections across all hosts [default: 100]
    #[arg(long = "conn-limit")]
    pub conn_limit: Option<usize>,

    /// HTTP connections per host [default: connection limit]
    #[arg(long = "conn-limit-per-host")]
    pub conn_limit_per_host: Option<usize>,

    /// Output directory [default: current directory]
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Configuration file [default: ~/.gsvpd/config.ini]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
