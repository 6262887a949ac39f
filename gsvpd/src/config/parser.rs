//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to settings.

use ini::Ini;
use std::str::FromStr;
use std::time::Duration;

use super::file::{expand_tilde, ConfigFile, ConfigFileError};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            let secs: u64 = parse_positive("download", "timeout", v, "seconds")?;
            config.download = config
                .download
                .with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(v) = section.get("max_retries") {
            let retries: u32 = parse_positive("download", "max_retries", v, "attempts")?;
            config.download = config.download.with_max_retries(retries);
        }
        if let Some(v) = section.get("retry_base_delay_ms") {
            let ms: u64 = parse_number("download", "retry_base_delay_ms", v, "milliseconds")?;
            config.download = config
                .download
                .with_retry_base_delay(Duration::from_millis(ms));
        }
    }

    // [concurrency] section
    if let Some(section) = ini.section(Some("concurrency")) {
        if let Some(v) = section.get("max_panoramas") {
            let n = parse_positive("concurrency", "max_panoramas", v, "panoramas")?;
            config.concurrency = config.concurrency.with_max_panoramas(n);
        }
        if let Some(v) = section.get("max_tiles") {
            let n = parse_positive("concurrency", "max_tiles", v, "requests")?;
            config.concurrency = config.concurrency.with_max_tiles(n);
        }
        if let Some(v) = section.get("workers") {
            let n = parse_positive("concurrency", "workers", v, "threads")?;
            config.concurrency = config.concurrency.with_workers(n);
        }
        if let Some(v) = section.get("connections") {
            let n = parse_positive("concurrency", "connections", v, "connections")?;
            config.concurrency = config.concurrency.with_connections(n);
        }
        if let Some(v) = section.get("connections_per_host") {
            let n = parse_positive("concurrency", "connections_per_host", v, "connections")?;
            config.concurrency = config.concurrency.with_connections_per_host(n);
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.output_dir = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("jpeg_quality") {
            let quality: u8 = parse_positive("output", "jpeg_quality", v, "1-100")?;
            if quality > 100 {
                return Err(ConfigFileError::InvalidValue {
                    section: "output".to_string(),
                    key: "jpeg_quality".to_string(),
                    value: v.to_string(),
                    reason: "must be between 1 and 100".to_string(),
                });
            }
            config.jpeg_quality = quality;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.log_file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    unit: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("must be a non-negative integer ({})", unit),
        })
}

fn parse_positive<T>(section: &str, key: &str, value: &str, unit: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialEq + Default,
{
    let parsed: T = parse_number(section, key, value, unit)?;
    if parsed == T::default() {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("must be a positive integer ({})", unit),
        });
    }
    Ok(parsed)
}
