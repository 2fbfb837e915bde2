// THEORY:
// The `Dispatcher` is the concurrent half of the pixelation engine. It drives the
// `TileEnumerator`, pairs every source tile with the identically placed destination
// tile, and fans the work out to a bounded pool of workers. It returns only once
// every pair has been processed.
//
// Key architectural principles:
// 1.  **One Unit Per Tile**: A unit of work is a `TilePair`: average the source view,
//     paint the result over the destination view. Units are independent; the order in
//     which they finish is unspecified and does not matter.
// 2.  **Ownership By Row Band**: The destination is cut into one band of whole rows per
//     enumerator row with `chunks_mut`. A worker owns its bands outright, so the
//     destination needs no lock. The source is shared read-only.
// 3.  **Bounded Pool, Round-Robin**: Bands are dealt to `min(workers, bands)` queues in
//     enumeration order, one queue per worker. Workers are scoped threads, so they can
//     borrow both canvases directly.
// 4.  **Lazy Units**: A worker walks each band's tiles one at a time and builds the
//     pair only when it is about to process it. Memory stays proportional to the
//     number of bands, never to the number of tiles.
// 5.  **Full Barrier**: The end of the thread scope is the only blocking point. There is
//     no early return, no partial result and no cancellation.

use crate::core_modules::canvas::{Canvas, CanvasBandMut, CanvasView, CanvasViewMut};
use crate::core_modules::color::color::Color;
use crate::core_modules::color_aggregator::color_aggregator::average_of;
use crate::core_modules::tile::tile::Tile;
use crate::core_modules::tile_enumerator::TileEnumerator;
use crate::error::{PixelateError, Result};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// A source tile and the destination tile at the same position.
#[derive(Debug)]
pub struct TilePair<'a> {
    pub source: CanvasView<'a>,
    pub destination: CanvasViewMut<'a>,
}

impl<'a> TilePair<'a> {
    /// Pairs `tile` in `source` with the same tile in a destination band.
    pub fn new(source: &'a Canvas, band: &'a mut CanvasBandMut<'_>, tile: Tile) -> Result<Self> {
        let out_of_bounds = || PixelateError::TileOutOfBounds {
            x: tile.x,
            y: tile.y,
            width: tile.width,
            height: tile.height,
            canvas_width: source.width(),
            canvas_height: source.height(),
        };
        let source_view = source.view(tile).ok_or_else(out_of_bounds)?;
        let destination = band.tile_mut(tile).ok_or_else(out_of_bounds)?;
        Ok(Self {
            source: source_view,
            destination,
        })
    }

    pub fn tile(&self) -> Tile {
        self.destination.tile()
    }

    /// Averages the source tile and paints the result over the destination tile.
    pub fn process(mut self) -> Color {
        let color = average_of(Some(&self.source));
        self.destination.fill(color);
        color
    }
}

/// What a single `dispatch` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of tile pairs processed.
    pub tiles: usize,
    /// Number of row bands dealt to workers.
    pub bands: usize,
    /// Number of worker threads that ran.
    pub workers: usize,
    pub elapsed: Duration,
}

/// Fans row bands out to a bounded pool of scoped worker threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    workers: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Dispatcher {
    /// A `workers` of 0 means one worker per logical CPU.
    pub fn new(workers: usize) -> Self {
        let workers = match workers {
            0 => num_cpus::get(),
            n => n,
        };
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Pixelates `source` into `destination` using square tiles of `tile_size`.
    ///
    /// Blocks until every tile has been written. A degenerate tile size processes
    /// nothing and reports zero tiles.
    pub fn dispatch(
        &self,
        source: &Canvas,
        destination: &mut Canvas,
        tile_size: u32,
    ) -> Result<DispatchReport> {
        let (source_width, source_height) = source.dimensions();
        let (destination_width, destination_height) = destination.dimensions();
        if (source_width, source_height) != (destination_width, destination_height) {
            return Err(PixelateError::DimensionMismatch {
                source_width,
                source_height,
                destination_width,
                destination_height,
            });
        }

        let started = Instant::now();
        let enumerator = TileEnumerator::for_canvas(Some(source), tile_size);
        if enumerator.tile_count() == 0 {
            debug!(
                width = source_width,
                height = source_height,
                tile_size,
                "enumerator yielded no tiles, nothing to dispatch"
            );
            return Ok(DispatchReport {
                tiles: 0,
                bands: 0,
                workers: 0,
                elapsed: started.elapsed(),
            });
        }

        let bands = destination.split_bands_mut(tile_size);
        let band_count = bands.len();
        let workers = self.workers.min(band_count);

        let mut queues: Vec<Vec<CanvasBandMut<'_>>> = (0..workers)
            .map(|_| Vec::with_capacity(band_count.div_ceil(workers)))
            .collect();
        for (index, band) in bands.into_iter().enumerate() {
            queues[index % workers].push(band);
        }

        debug!(
            tiles = enumerator.tile_count(),
            bands = band_count,
            workers,
            tile_size,
            "dispatching row bands"
        );
        let enumerator = &enumerator;
        let processed = std::thread::scope(|scope| {
            let handles: Vec<_> = queues
                .into_iter()
                .enumerate()
                .map(|(worker_id, queue)| {
                    scope.spawn(move || Self::drain(worker_id, source, enumerator, queue))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect::<Result<Vec<usize>>>()
        })?;

        let report = DispatchReport {
            tiles: processed.iter().sum(),
            bands: band_count,
            workers,
            elapsed: started.elapsed(),
        };
        debug!(
            tiles = report.tiles,
            workers = report.workers,
            elapsed_us = report.elapsed.as_micros() as u64,
            "all tile pairs processed"
        );
        Ok(report)
    }

    /// Processes every tile of every band in `queue`, one pair at a time.
    fn drain(
        worker_id: usize,
        source: &Canvas,
        enumerator: &TileEnumerator,
        queue: Vec<CanvasBandMut<'_>>,
    ) -> Result<usize> {
        let mut processed = 0;
        for mut band in queue {
            for tile in enumerator.band_tiles(band.index()) {
                TilePair::new(source, &mut band, tile)?.process();
                processed += 1;
            }
        }
        trace!(worker_id, processed, "worker drained its queue");
        Ok(processed)
    }
}
