//! Persistence of stitched panoramas.
//!
//! The pipeline hands every finished canvas to an [`ArtifactStore`]. The
//! store decides where the bytes go and reports how many were written.
//! [`JpegFileStore`] is the filesystem implementation used by the CLI:
//!
//! ```text
//! <root>/
//! ├── panos_z2/
//! │   ├── <pano id>.jpg
//! │   └── ...
//! └── panos_z3/
//!     └── ...
//! ```

mod jpeg;
mod size;

pub use jpeg::JpegFileStore;
pub use size::format_size;

use crate::coord::ZoomLevel;
use image::RgbImage;
use std::path::Path;
use thiserror::Error;

/// Errors raised while persisting a panorama.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure (directory creation, write, rename, stat)
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The identifier cannot be used as a file name
    #[error("Invalid panorama id for a file name: '{0}'")]
    InvalidId(String),

    /// The image could not be encoded
    #[error("Failed to encode panorama {pano_id}: {reason}")]
    Encode { pano_id: String, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Destination for stitched panoramas.
///
/// `save` is synchronous: the pipeline always calls it from a worker thread,
/// right after stitching, so it may block on encoding and disk I/O.
pub trait ArtifactStore: Send + Sync + 'static {
    /// Persists `image` for `pano_id` at `zoom` and returns the written size in bytes.
    fn save(&self, image: &RgbImage, pano_id: &str, zoom: ZoomLevel) -> Result<u64, StoreError>;

    /// Root location reported back to the user.
    fn location(&self) -> &Path;
}
