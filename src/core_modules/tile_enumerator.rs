// THEORY:
// The `TileEnumerator` is the partitioning engine of the pixelation pipeline. It is a
// restartable cursor that walks a `width` x `height` grid and yields the ordered
// sequence of non-overlapping `Tile`s that covers it exactly once.
//
// Key architectural principles:
// 1.  **Row-Major Walk**: The cursor holds a horizontal and a vertical offset, both
//     starting at 0. Each step yields the tile at the current offsets, then moves
//     right by `tile_size`; past the right edge it wraps to column 0 and moves down
//     by `tile_size`. The walk ends the moment the vertical offset reaches the bottom.
// 2.  **Clipped Edges**: Tiles are `tile_size` square except in the last column and
//     last row, where they are clipped to the pixels that remain. Nothing is padded,
//     so no tile ever reaches outside the grid.
// 3.  **Soft Failure**: A tile size below 1, an absent source or an empty grid does not
//     raise an error. The enumerator is simply exhausted from the start and the first
//     `has_next` returns false. Callers treat that as their precondition check.
// 4.  **Load-Bearing Disjointness**: Because every tile starts where the previous one in
//     its row ended, and every row band starts where the previous band ended, no two
//     tiles share a pixel. The dispatcher's lock-free writes depend on this.

use crate::core_modules::canvas::Canvas;
use crate::core_modules::tile::tile::Tile;
use std::iter::FusedIterator;

/// A restartable, row-major cursor over the tiles of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEnumerator {
    // --- Grid ---
    width: u32,
    height: u32,
    tile_size: u32,

    // --- Cursor ---
    x_offset: u32,
    y_offset: u32,
    finished: bool,
}

impl TileEnumerator {
    /// Creates a cursor over a `width` x `height` grid.
    ///
    /// A `tile_size` of 0 or an empty grid gives an immediately exhausted enumerator.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        if tile_size < 1 || width == 0 || height == 0 {
            return Self::exhausted();
        }
        Self {
            width,
            height,
            tile_size,
            x_offset: 0,
            y_offset: 0,
            finished: false,
        }
    }

    /// Creates a cursor over the dimensions of `canvas`. An absent canvas gives an
    /// immediately exhausted enumerator.
    pub fn for_canvas(canvas: Option<&Canvas>, tile_size: u32) -> Self {
        match canvas {
            Some(canvas) => Self::new(canvas.width(), canvas.height(), tile_size),
            None => Self::exhausted(),
        }
    }

    fn exhausted() -> Self {
        Self {
            width: 0,
            height: 0,
            tile_size: 0,
            x_offset: 0,
            y_offset: 0,
            finished: true,
        }
    }

    /// True while at least one more tile remains. Marks the cursor finished once the
    /// vertical offset has passed the bottom of the grid.
    pub fn has_next(&mut self) -> bool {
        if self.finished {
            return false;
        }
        if self.y_offset >= self.height {
            self.finished = true;
            return false;
        }
        true
    }

    /// Yields the tile at the current offsets and advances the cursor.
    pub fn next_tile(&mut self) -> Option<Tile> {
        if !self.has_next() {
            return None;
        }

        let width = self.tile_size.min(self.width - self.x_offset);
        let height = self.tile_size.min(self.height - self.y_offset);
        let tile = Tile::new(self.x_offset, self.y_offset, width, height);

        self.x_offset = self.x_offset.saturating_add(self.tile_size);
        if self.x_offset >= self.width {
            self.x_offset = 0;
            self.y_offset = self.y_offset.saturating_add(self.tile_size);
            if self.y_offset >= self.height {
                self.finished = true;
            }
        }

        Some(tile)
    }

    /// Rewinds to the first tile. A degenerate enumerator stays exhausted.
    pub fn reset(&mut self) {
        self.x_offset = 0;
        self.y_offset = 0;
        self.finished = self.is_degenerate();
    }

    /// True when the enumerator was built from invalid input and can never yield.
    pub fn is_degenerate(&self) -> bool {
        self.tile_size == 0 || self.width == 0 || self.height == 0
    }

    pub fn is_exhausted(&self) -> bool {
        self.finished || self.y_offset >= self.height
    }

    /// Total number of tiles in one full pass: `ceil(W/S) * ceil(H/S)`.
    pub fn tile_count(&self) -> usize {
        if self.is_degenerate() {
            return 0;
        }
        self.columns() as usize * self.rows() as usize
    }

    /// Tiles per row band.
    pub fn columns(&self) -> u32 {
        if self.is_degenerate() {
            return 0;
        }
        self.width.div_ceil(self.tile_size)
    }

    /// Number of row bands.
    pub fn rows(&self) -> u32 {
        if self.is_degenerate() {
            return 0;
        }
        self.height.div_ceil(self.tile_size)
    }

    /// The tiles of row band `band`, left to right, clipped exactly as a full pass
    /// clips them. Independent of the cursor. A band past the last one is empty.
    pub fn band_tiles(&self, band: u32) -> impl Iterator<Item = Tile> + use<> {
        let (width, tile_size) = (self.width, self.tile_size);
        let (columns, y, band_height) = if band < self.rows() {
            let y = band * tile_size;
            (self.columns(), y, tile_size.min(self.height - y))
        } else {
            (0, 0, 0)
        };
        (0..columns).map(move |column| {
            let x = column * tile_size;
            Tile::new(x, y, tile_size.min(width - x), band_height)
        })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn remaining(&self) -> usize {
        if self.is_exhausted() {
            return 0;
        }
        let bands_done = (self.y_offset / self.tile_size) as usize;
        let columns_done = (self.x_offset / self.tile_size) as usize;
        self.tile_count() - bands_done * self.columns() as usize - columns_done
    }
}

impl Iterator for TileEnumerator {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        self.next_tile()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileEnumerator {}

impl FusedIterator for TileEnumerator {}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;
    use std::collections::HashSet;

    fn sizes(enumerator: TileEnumerator) -> Vec<(u32, u32)> {
        enumerator.map(|tile| (tile.width, tile.height)).collect()
    }

    #[test]
    fn zero_tile_size_is_exhausted() {
        let mut enumerator = TileEnumerator::new(10, 10, 0);
        assert!(!enumerator.has_next());
        assert!(enumerator.is_exhausted());
        assert_eq!(enumerator.tile_count(), 0);
        assert_eq!(enumerator.next(), None);
    }

    #[test]
    fn absent_canvas_is_exhausted() {
        let mut enumerator = TileEnumerator::for_canvas(None, 10);
        assert!(!enumerator.has_next());
        assert_eq!(enumerator.count(), 0);
    }

    #[test]
    fn empty_grid_is_exhausted() {
        assert_eq!(TileEnumerator::new(0, 10, 5).count(), 0);
        assert_eq!(TileEnumerator::new(10, 0, 5).count(), 0);
    }

    #[test]
    fn reset_keeps_degenerate_enumerator_exhausted() {
        let mut enumerator = TileEnumerator::new(10, 10, 0);
        enumerator.reset();
        assert!(!enumerator.has_next());
    }

    #[test]
    fn for_canvas_uses_canvas_dimensions() {
        let canvas = Canvas::new(15, 10);
        let enumerator = TileEnumerator::for_canvas(Some(&canvas), 5);
        assert_eq!(enumerator.dimensions(), (15, 10));
        assert_eq!(enumerator.tile_count(), 6);
    }

    #[test]
    fn has_next_does_not_advance() {
        let mut enumerator = TileEnumerator::new(10, 10, 5);
        assert!(enumerator.has_next());
        assert!(enumerator.has_next());
        assert_eq!(enumerator.next_tile(), Some(Tile::new(0, 0, 5, 5)));
    }

    #[test]
    fn even_window_on_square_grid() {
        let tiles: Vec<Tile> = TileEnumerator::new(10, 10, 5).collect();
        assert_eq!(
            tiles,
            vec![
                Tile::new(0, 0, 5, 5),
                Tile::new(5, 0, 5, 5),
                Tile::new(0, 5, 5, 5),
                Tile::new(5, 5, 5, 5),
            ]
        );
    }

    #[test]
    fn odd_window_on_square_grid_clips_edges() {
        let enumerator = TileEnumerator::new(10, 10, 3);
        assert_eq!(enumerator.tile_count(), 16);
        let sizes = sizes(enumerator);
        assert_eq!(sizes.len(), 16);
        assert_eq!(&sizes[..4], &[(3, 3), (3, 3), (3, 3), (1, 3)]);
        assert_eq!(&sizes[12..], &[(3, 1), (3, 1), (3, 1), (1, 1)]);
    }

    #[test]
    fn even_window_on_wide_grid() {
        let sizes = sizes(TileEnumerator::new(15, 10, 5));
        assert_eq!(sizes.len(), 6);
        assert!(sizes.iter().all(|&size| size == (5, 5)));
    }

    #[test]
    fn odd_window_on_wide_grid() {
        let sizes = sizes(TileEnumerator::new(15, 10, 6));
        assert_eq!(
            sizes,
            vec![(6, 6), (6, 6), (3, 6), (6, 4), (6, 4), (3, 4)]
        );
    }

    #[test]
    fn window_larger_than_grid_yields_one_clipped_tile() {
        let tiles: Vec<Tile> = TileEnumerator::new(4, 3, 100).collect();
        assert_eq!(tiles, vec![Tile::new(0, 0, 4, 3)]);
    }

    #[test]
    fn size_hint_tracks_progress() {
        let mut enumerator = TileEnumerator::new(10, 10, 3);
        assert_eq!(enumerator.len(), 16);
        for _ in 0..5 {
            enumerator.next();
        }
        assert_eq!(enumerator.len(), 11);
        enumerator.by_ref().for_each(drop);
        assert_eq!(enumerator.len(), 0);
    }

    #[test]
    fn reset_replays_identical_sequence() {
        let mut enumerator = TileEnumerator::new(15, 10, 6);
        let first: Vec<Tile> = enumerator.by_ref().collect();
        assert!(enumerator.is_exhausted());
        enumerator.reset();
        assert!(enumerator.has_next());
        let second: Vec<Tile> = enumerator.by_ref().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_mid_pass_restarts_from_origin() {
        let mut enumerator = TileEnumerator::new(10, 10, 5);
        enumerator.next();
        enumerator.next();
        enumerator.reset();
        assert_eq!(enumerator.next(), Some(Tile::new(0, 0, 5, 5)));
    }

    #[quickcheck]
    fn tiles_partition_the_grid(width: u8, height: u8, tile_size: u8) -> TestResult {
        if width == 0 || height == 0 || tile_size == 0 {
            return TestResult::discard();
        }
        let (width, height, tile_size) = (width as u32, height as u32, tile_size as u32);
        let enumerator = TileEnumerator::new(width, height, tile_size);
        let expected = (width.div_ceil(tile_size) * height.div_ceil(tile_size)) as usize;
        let tiles: Vec<Tile> = enumerator.collect();

        let mut covered = HashSet::new();
        let mut disjoint = true;
        for tile in &tiles {
            if tile.is_empty() || !tile.fits_within(width, height) {
                return TestResult::failed();
            }
            for y in tile.y..tile.y + tile.height {
                for x in tile.x..tile.x + tile.width {
                    disjoint &= covered.insert((x, y));
                }
            }
        }

        TestResult::from_bool(
            tiles.len() == expected
                && disjoint
                && covered.len() == (width * height) as usize,
        )
    }

    #[quickcheck]
    fn only_last_column_and_row_are_clipped(width: u8, height: u8, tile_size: u8) -> TestResult {
        if width == 0 || height == 0 || tile_size == 0 {
            return TestResult::discard();
        }
        let (width, height, tile_size) = (width as u32, height as u32, tile_size as u32);
        let last_width = match width % tile_size {
            0 => tile_size,
            rest => rest,
        }
        .min(width);
        let last_height = match height % tile_size {
            0 => tile_size,
            rest => rest,
        }
        .min(height);

        let ok = TileEnumerator::new(width, height, tile_size).all(|tile| {
            let expected_width = if tile.right() == width as u64 { last_width } else { tile_size };
            let expected_height = if tile.bottom() == height as u64 { last_height } else { tile_size };
            tile.width == expected_width && tile.height == expected_height
        });
        TestResult::from_bool(ok)
    }

    #[quickcheck]
    fn no_two_tiles_intersect(width: u8, height: u8, tile_size: u8) -> TestResult {
        // Pairwise check, so keep the grid small.
        let (width, height, tile_size) = (width as u32 % 40, height as u32 % 40, tile_size as u32 % 12);
        if width == 0 || height == 0 || tile_size == 0 {
            return TestResult::discard();
        }
        let tiles: Vec<Tile> = TileEnumerator::new(width, height, tile_size).collect();
        let ok = tiles.iter().enumerate().all(|(i, tile)| {
            tiles[i + 1..].iter().all(|other| !tile.intersects(other))
        });
        TestResult::from_bool(ok)
    }

    #[quickcheck]
    fn bands_concatenate_to_a_full_pass(width: u8, height: u8, tile_size: u8) -> TestResult {
        if width == 0 || height == 0 || tile_size == 0 {
            return TestResult::discard();
        }
        let enumerator = TileEnumerator::new(width as u32, height as u32, tile_size as u32);
        let banded: Vec<Tile> = (0..enumerator.rows())
            .flat_map(|band| enumerator.band_tiles(band))
            .collect();
        let full: Vec<Tile> = enumerator.collect();
        TestResult::from_bool(banded == full)
    }

    #[test]
    fn band_tiles_share_one_row_band() {
        let enumerator = TileEnumerator::new(15, 10, 6);
        let band: Vec<Tile> = enumerator.band_tiles(1).collect();
        assert_eq!(band, vec![Tile::new(0, 6, 6, 4), Tile::new(6, 6, 6, 4), Tile::new(12, 6, 3, 4)]);
    }

    #[test]
    fn band_tiles_past_the_grid_are_empty() {
        assert_eq!(TileEnumerator::new(10, 10, 5).band_tiles(2).count(), 0);
        assert_eq!(TileEnumerator::new(10, 10, 0).band_tiles(0).count(), 0);
    }
}
