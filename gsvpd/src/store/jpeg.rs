//! JPEG files under a zoom-scoped directory.

use super::{ArtifactStore, StoreError};
use crate::config::DEFAULT_JPEG_QUALITY;
use crate::coord::ZoomLevel;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes each panorama to `<root>/panos_z{zoom}/{id}.jpg`.
///
/// The encoder writes to a uniquely named `{id}.*.jpg.part` file first and
/// the file is renamed into place once complete, so readers never observe a
/// truncated JPEG and two saves of the same identifier never share a
/// temporary file.
#[derive(Debug, Clone)]
pub struct JpegFileStore {
    root: PathBuf,
    quality: u8,
}

impl JpegFileStore {
    /// Create a store rooted at `root` with the default quality (90).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the JPEG quality, clamped to 1..=100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Directory holding every panorama of one zoom level.
    pub fn zoom_directory(&self, zoom: ZoomLevel) -> PathBuf {
        self.root.join(format!("panos_z{}", zoom))
    }

    /// Final path of a panorama.
    pub fn artifact_path(&self, pano_id: &str, zoom: ZoomLevel) -> PathBuf {
        self.zoom_directory(zoom).join(format!("{}.jpg", pano_id))
    }

    fn encode_to(
        &self,
        image: &RgbImage,
        pano_id: &str,
        temp: &mut NamedTempFile,
    ) -> Result<(), StoreError> {
        let temp_path = temp.path().to_path_buf();
        let mut writer = BufWriter::new(temp.as_file_mut());

        JpegEncoder::new_with_quality(&mut writer, self.quality)
            .encode_image(image)
            .map_err(|e| StoreError::Encode {
                pano_id: pano_id.to_string(),
                reason: e.to_string(),
            })?;

        writer.flush().map_err(|e| StoreError::io(&temp_path, e))
    }
}

impl ArtifactStore for JpegFileStore {
    fn save(&self, image: &RgbImage, pano_id: &str, zoom: ZoomLevel) -> Result<u64, StoreError> {
        if !is_valid_file_stem(pano_id) {
            return Err(StoreError::InvalidId(pano_id.to_string()));
        }

        let directory = self.zoom_directory(zoom);
        fs::create_dir_all(&directory).map_err(|e| StoreError::io(&directory, e))?;

        let path = self.artifact_path(pano_id, zoom);
        let mut temp = tempfile::Builder::new()
            .prefix(&format!("{}.", pano_id))
            .suffix(".jpg.part")
            .tempfile_in(&directory)
            .map_err(|e| StoreError::io(&directory, e))?;

        // The temporary file is removed on drop if anything below fails.
        self.encode_to(image, pano_id, &mut temp)?;
        temp.persist(&path).map_err(|e| StoreError::io(&path, e.error))?;

        let size = fs::metadata(&path)
            .map_err(|e| StoreError::io(&path, e))?
            .len();

        debug!(pano_id, path = %path.display(), size, "Panorama written");
        Ok(size)
    }

    fn location(&self) -> &Path {
        &self.root
    }
}

/// An identifier must map to exactly one file inside the zoom directory.
fn is_valid_file_stem(pano_id: &str) -> bool {
    !pano_id.is_empty()
        && pano_id != "."
        && pano_id != ".."
        && !pano_id.contains(['/', '\\', '\0'])
}
