//! gsvpd - concurrent Street View panorama downloader
//!
//! This library rebuilds full 360° panoramas from the 512 px tiles served
//! by the Street View tile endpoint, for any number of panorama identifiers,
//! under bounded network and CPU concurrency.
//!
//! # High-Level API
//!
//! For most use cases, [`pipeline::run_streetview_batch`] is all you need:
//!
//! ```ignore
//! use gsvpd::config::{ConcurrencyConfig, DownloadConfig};
//! use gsvpd::coord::ZoomLevel;
//! use gsvpd::pipeline::run_streetview_batch;
//! use gsvpd::store::JpegFileStore;
//!
//! let outcome = run_streetview_batch(
//!     &pano_ids,
//!     ZoomLevel::new(3)?,
//!     JpegFileStore::new("panoramas"),
//!     ConcurrencyConfig::default(),
//!     DownloadConfig::default(),
//! )
//! .await?;
//! ```
//!
//! Custom tile sources and destinations plug in through
//! [`provider::TileProvider`] and [`store::ArtifactStore`] with
//! [`pipeline::BatchRunner`].

pub mod config;
pub mod coord;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod store;

/// Version of the gsvpd library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
