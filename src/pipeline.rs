// THEORY:
// The `pipeline` module is the top-level API of the pixelation engine. It owns the
// configuration, allocates the output canvas, checks that there is anything to tile,
// and hands the work to the `Dispatcher`.
//
// Callers that live on a tokio runtime use `pixelate_async`, which moves the blocking
// fan-out/join onto tokio's blocking pool so the reactor keeps running.

use crate::core_modules::canvas::Canvas;
use crate::core_modules::tile_enumerator::TileEnumerator;
use crate::dispatcher::Dispatcher;
use crate::error::{PixelateError, Result};
use tracing::{info, warn};

/// Tile size used when none is configured.
pub const DEFAULT_TILE_SIZE: u32 = 10;

/// Configuration for the PixelatePipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Edge length of a tile in pixels. Values below 1 leave nothing to tile.
    pub tile_size: u32,
    /// Worker threads used per image. 0 means one per logical CPU.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            workers: 0,
        }
    }
}

/// The main, top-level struct for the pixelation engine.
#[derive(Debug, Clone)]
pub struct PixelatePipeline {
    config: PipelineConfig,
    dispatcher: Dispatcher,
}

impl PixelatePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let dispatcher = Dispatcher::new(config.workers);
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Produces a pixelated copy of `source`.
    ///
    /// Fails with `NothingToTile` when the tile size or the canvas leaves the
    /// enumerator exhausted before its first tile.
    pub fn pixelate(&self, source: &Canvas) -> Result<Canvas> {
        let (width, height) = source.dimensions();
        let tile_size = self.config.tile_size;

        let enumerator = TileEnumerator::for_canvas(Some(source), tile_size);
        if enumerator.is_exhausted() {
            warn!(width, height, tile_size, "source yields no tiles");
            return Err(PixelateError::NothingToTile {
                width,
                height,
                tile_size,
            });
        }

        let mut output = Canvas::new(width, height);
        info!(
            width,
            height,
            tile_size,
            tiles = enumerator.tile_count(),
            "created output canvas"
        );

        let report = self.dispatcher.dispatch(source, &mut output, tile_size)?;
        info!(
            tiles = report.tiles,
            bands = report.bands,
            workers = report.workers,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "pixelation complete"
        );
        Ok(output)
    }

    /// Runs `pixelate` on tokio's blocking pool.
    pub async fn pixelate_async(&self, source: Canvas) -> Result<Canvas> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.pixelate(&source)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color::color::Color;

    fn stripes(width: u32, height: u32) -> Canvas {
        let pixels = (0..height)
            .flat_map(|_| {
                (0..width).map(|x| {
                    if x % 2 == 0 {
                        Color::new(0, 0, 0, 255)
                    } else {
                        Color::new(255, 255, 255, 255)
                    }
                })
            })
            .collect();
        Canvas::from_pixels(width, height, pixels).expect("pixel count matches")
    }

    #[test]
    fn default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.tile_size, 10);
        assert_eq!(config.workers, 0);
    }

    #[test]
    fn uniform_gray_survives_pixelation() {
        let gray = Color::new(127, 127, 127, 255);
        let source = Canvas::filled(10, 10, gray);
        let pipeline = PixelatePipeline::new(PipelineConfig {
            tile_size: 5,
            workers: 2,
        });
        let output = pipeline.pixelate(&source).expect("source tiles");
        assert_eq!(output, source);
    }

    #[test]
    fn stripes_collapse_to_truncated_gray() {
        let source = stripes(4, 2);
        let pipeline = PixelatePipeline::new(PipelineConfig {
            tile_size: 2,
            workers: 0,
        });
        let output = pipeline.pixelate(&source).expect("source tiles");
        // Each 2x2 tile holds two black and two white samples: 510 / 4 = 127.
        assert!(output.pixels().iter().all(|&p| p == Color::new(127, 127, 127, 255)));
    }

    #[test]
    fn zero_tile_size_is_nothing_to_tile() {
        let pipeline = PixelatePipeline::new(PipelineConfig {
            tile_size: 0,
            workers: 1,
        });
        let result = pipeline.pixelate(&Canvas::new(10, 10));
        assert!(matches!(
            result,
            Err(PixelateError::NothingToTile { tile_size: 0, .. })
        ));
    }

    #[test]
    fn empty_canvas_is_nothing_to_tile() {
        let pipeline = PixelatePipeline::new(PipelineConfig::default());
        let result = pipeline.pixelate(&Canvas::new(0, 0));
        assert!(matches!(result, Err(PixelateError::NothingToTile { .. })));
    }

    #[tokio::test]
    async fn async_entry_matches_blocking_entry() {
        let source = stripes(13, 9);
        let pipeline = PixelatePipeline::new(PipelineConfig {
            tile_size: 4,
            workers: 3,
        });
        let blocking = pipeline.pixelate(&source).expect("source tiles");
        let asynchronous = pipeline
            .pixelate_async(source)
            .await
            .expect("source tiles");
        assert_eq!(blocking, asynchronous);
    }
}
