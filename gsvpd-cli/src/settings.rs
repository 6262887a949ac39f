//! Effective run settings: command-line flags layered over the config file.

use crate::args::Args;
use gsvpd::config::{ConcurrencyConfig, ConfigFile, DownloadConfig};
use std::path::PathBuf;

/// Everything the batch needs besides the identifiers and zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub concurrency: ConcurrencyConfig,
    pub download: DownloadConfig,
    pub output_dir: PathBuf,
    pub jpeg_quality: u8,
}

impl RunSettings {
    /// Layers `args` over `file`.
    ///
    /// `--max-tile` and `--conn-limit-per-host` follow `--conn-limit` when
    /// only the latter is given. `cwd` is the output directory when neither
    /// the flags nor the file name one.
    pub fn resolve(args: &Args, file: &ConfigFile, cwd: PathBuf) -> Self {
        let base = file.concurrency;

        let connections = args.conn_limit.unwrap_or(base.connections());
        let max_tiles = args
            .max_tile
            .or(args.conn_limit)
            .unwrap_or(base.max_tiles());
        let connections_per_host = args
            .conn_limit_per_host
            .or(args.conn_limit)
            .unwrap_or(base.connections_per_host());

        let concurrency = ConcurrencyConfig::new()
            .with_max_panoramas(args.max_pano.unwrap_or(base.max_panoramas()))
            .with_max_tiles(max_tiles)
            .with_workers(args.workers.unwrap_or(base.workers()))
            .with_connections(connections)
            .with_connections_per_host(connections_per_host);

        let output_dir = args
            .output
            .clone()
            .or_else(|| file.output_dir.clone())
            .unwrap_or(cwd);

        Self {
            concurrency,
            download: file.download,
            output_dir,
            jpeg_quality: file.jpeg_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gsvpd::config::{
        DEFAULT_CONNECTIONS, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_PANORAMAS, DEFAULT_MAX_TILES,
        DEFAULT_WORKERS,
    };

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["gsvpd", "--dataset", "ids.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn cwd() -> PathBuf {
        PathBuf::from("/work")
    }

    #[test]
    fn test_defaults_without_flags_or_file() {
        let settings = RunSettings::resolve(&args(&[]), &ConfigFile::default(), cwd());

        assert_eq!(settings.concurrency.max_panoramas(), DEFAULT_MAX_PANORAMAS);
        assert_eq!(settings.concurrency.max_tiles(), DEFAULT_MAX_TILES);
        assert_eq!(settings.concurrency.workers(), DEFAULT_WORKERS);
        assert_eq!(settings.concurrency.connections(), DEFAULT_CONNECTIONS);
        assert_eq!(settings.output_dir, cwd());
        assert_eq!(settings.download, DownloadConfig::default());
        assert_eq!(settings.jpeg_quality, DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn test_conn_limit_drives_tile_and_host_limits() {
        let settings = RunSettings::resolve(&args(&["--conn-limit", "40"]), &ConfigFile::default(), cwd());

        assert_eq!(settings.concurrency.connections(), 40);
        assert_eq!(settings.concurrency.max_tiles(), 40);
        assert_eq!(settings.concurrency.connections_per_host(), 40);
    }

    #[test]
    fn test_explicit_flags_win_over_conn_limit() {
        let settings = RunSettings::resolve(
            &args(&["--conn-limit", "40", "--max-tile", "12", "--conn-limit-per-host", "8"]),
            &ConfigFile::default(),
            cwd(),
        );

        assert_eq!(settings.concurrency.max_tiles(), 12);
        assert_eq!(settings.concurrency.connections_per_host(), 8);
    }

    #[test]
    fn test_file_values_used_when_flags_absent() {
        let mut file = ConfigFile::default();
        file.concurrency = ConcurrencyConfig::new().with_workers(3).with_max_panoramas(7);
        file.output_dir = Some(PathBuf::from("/data/panos"));
        file.jpeg_quality = 60;

        let settings = RunSettings::resolve(&args(&[]), &file, cwd());
        assert_eq!(settings.jpeg_quality, 60);
        assert_eq!(settings.concurrency.workers(), 3);
        assert_eq!(settings.concurrency.max_panoramas(), 7);
        assert_eq!(settings.output_dir, PathBuf::from("/data/panos"));

        let settings = RunSettings::resolve(&args(&["--workers", "9", "--output", "/x"]), &file, cwd());
        assert_eq!(settings.concurrency.workers(), 9);
        assert_eq!(settings.output_dir, PathBuf::from("/x"));
    }
}
