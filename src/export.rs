//! Image export: fitting the drawing into a fixed-size image and writing
//! data-URL payloads to disk.

use crate::layout::Rect;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Not an image data URL: {0}")]
    InvalidDataUrl(String),
    #[error("Image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Cannot write image to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Target image size and zoom limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: f64,
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the bounds added as blank space
    pub padding: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 7680.0,
            height: 4320.0,
            min_zoom: 0.0,
            max_zoom: 2.0,
            padding: 0.0,
        }
    }
}

/// Translation and zoom that place the graph in the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

/// Largest zoom (within limits) at which `bounds` fits the image, centred.
pub fn viewport_for_bounds(
    bounds: &Rect,
    width: f64,
    height: f64,
    min_zoom: f64,
    max_zoom: f64,
    padding: f64,
) -> Viewport {
    let x_zoom = width / (bounds.width * (1.0 + padding));
    let y_zoom = height / (bounds.height * (1.0 + padding));
    let zoom = x_zoom.min(y_zoom);
    // empty bounds give an infinite or NaN zoom
    let zoom = if zoom.is_nan() {
        max_zoom
    } else {
        zoom.clamp(min_zoom, max_zoom)
    };

    let (cx, cy) = bounds.center();
    Viewport {
        x: width / 2.0 - cx * zoom,
        y: height / 2.0 - cy * zoom,
        zoom,
    }
}

impl ExportConfig {
    pub fn viewport(&self, bounds: &Rect) -> Viewport {
        viewport_for_bounds(
            bounds,
            self.width,
            self.height,
            self.min_zoom,
            self.max_zoom,
            self.padding,
        )
    }
}

/// Split `data:image/<format>;base64,<payload>` into the format and the decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), ExportError> {
    let invalid = || ExportError::InvalidDataUrl(truncate(url));
    let rest = url.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (format, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;
    if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid());
    }

    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
    Ok((format.to_string(), bytes))
}

/// Decode a data URL and write its bytes to `path`.
pub fn save_image(path: &Path, data_url: &str) -> Result<(), ExportError> {
    let (format, bytes) = decode_data_url(data_url)?;
    std::fs::write(path, &bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), %format, bytes = bytes.len(), "saved image");
    Ok(())
}

fn truncate(s: &str) -> String {
    s.chars().take(32).collect()
}
