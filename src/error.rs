//! Error type shared by the pipeline, the dispatcher and the image helper.
//!
//! Degenerate inputs inside the core (an absent source, a tile size below 1, an
//! empty region to average) are not errors; they produce an exhausted enumerator
//! or the zero color. Everything here is either a contract violation by a caller
//! or an I/O failure at the image boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixelateError {
    /// Source and destination canvases must have identical dimensions.
    #[error(
        "canvas dimensions differ: source is {source_width}x{source_height}, destination is {destination_width}x{destination_height}"
    )]
    DimensionMismatch {
        source_width: u32,
        source_height: u32,
        destination_width: u32,
        destination_height: u32,
    },

    /// A pixel buffer did not hold exactly `width * height` samples.
    #[error("expected {expected} pixels for a {width}x{height} canvas, got {actual}")]
    PixelCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// A tile reaches outside the canvas, or outside the row band it was cut from.
    #[error("tile at ({x}, {y}) of size {width}x{height} does not fit a {canvas_width}x{canvas_height} canvas")]
    TileOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    /// The enumerator was exhausted before yielding a single tile.
    #[error("nothing to tile: a {width}x{height} canvas with tile size {tile_size} yields no tiles")]
    NothingToTile {
        width: u32,
        height: u32,
        tile_size: u32,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task failed before producing its canvas.
    #[error("pixelation worker failed: {0}")]
    Worker(String),
}

impl From<tokio::task::JoinError> for PixelateError {
    fn from(error: tokio::task::JoinError) -> Self {
        PixelateError::Worker(error.to_string())
    }
}

pub type Result<T, E = PixelateError> = std::result::Result<T, E>;
