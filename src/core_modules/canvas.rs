// THEORY:
// The `Canvas` is a plain mutable pixel grid. It is not a component of computation by
// itself; it owns the samples and hands out windows onto them.
//
// Key architectural principles:
// 1.  **Row-Major Storage**: All samples live in one flat `Vec<Color>`, row after row.
//     A tile's region is therefore `height` separate runs of `width` samples.
// 2.  **Read-Only Views**: `CanvasView` borrows the canvas immutably and describes one
//     tile. Any number of them can coexist and be shared across threads.
// 3.  **Exclusive Row Bands**: `split_bands_mut` cuts the sample buffer into runs of
//     whole rows with `chunks_mut`, so no two bands can ever alias a sample. A worker
//     that holds a band writes into it without any locking.
// 4.  **Borrowed Tile Views**: `CanvasViewMut` is carved out of a band one tile at a
//     time and borrows the band while it lives. It allocates nothing, so walking a
//     band costs the same whatever the tile size.

use crate::core_modules::color::color::Color;
use crate::core_modules::tile::tile::Tile;
use crate::error::{PixelateError, Result};

/// A 2-D grid of RGBA samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a canvas filled with the zero color.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::default())
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wraps an existing row-major sample buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(PixelateError::PixelCountMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes one sample. Returns false when (x, y) is outside the canvas.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn row(&self, y: u32) -> Option<&[Color]> {
        let start = self.index(0, y)?;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// A read-only view over `tile`, or `None` when the tile does not fit.
    pub fn view(&self, tile: Tile) -> Option<CanvasView<'_>> {
        tile.fits_within(self.width, self.height)
            .then_some(CanvasView { canvas: self, tile })
    }

    /// Splits the canvas into horizontal bands of `band_height` rows, top to bottom.
    ///
    /// The last band is shorter when the height is not a multiple of `band_height`.
    /// A zero band height or an empty canvas gives no bands.
    pub fn split_bands_mut(&mut self, band_height: u32) -> Vec<CanvasBandMut<'_>> {
        let width = self.width;
        if width == 0 || self.height == 0 || band_height == 0 {
            return Vec::new();
        }
        let stride = width as usize;
        self.pixels
            .chunks_mut(stride.saturating_mul(band_height as usize))
            .enumerate()
            .map(|(index, pixels)| CanvasBandMut {
                index: index as u32,
                y: index as u32 * band_height,
                width,
                height: (pixels.len() / stride) as u32,
                pixels,
            })
            .collect()
    }
}

/// A read-only window onto one tile of a canvas.
#[derive(Debug, Clone, Copy)]
pub struct CanvasView<'a> {
    canvas: &'a Canvas,
    tile: Tile,
}

impl<'a> CanvasView<'a> {
    pub fn tile(&self) -> Tile {
        self.tile
    }

    pub fn area(&self) -> u64 {
        self.tile.area()
    }

    /// The tile's rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Color]> + use<'a> {
        let canvas = self.canvas;
        let tile = self.tile;
        let stride = canvas.width as usize;
        (tile.y..tile.y + tile.height).map(move |y| {
            let start = y as usize * stride + tile.x as usize;
            &canvas.pixels[start..start + tile.width as usize]
        })
    }

    /// Every sample in the tile, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + use<'a> {
        self.rows().flat_map(|row| row.iter().copied())
    }
}

/// An exclusively owned run of whole canvas rows.
#[derive(Debug)]
pub struct CanvasBandMut<'a> {
    index: u32,
    y: u32,
    width: u32,
    height: u32,
    pixels: &'a mut [Color],
}

impl CanvasBandMut<'_> {
    /// Position of the band counted from the top, starting at 0.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Canvas row of the band's first row.
    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// A mutable view over `tile`, or `None` when the tile is not entirely inside
    /// this band. Tile coordinates are canvas coordinates.
    pub fn tile_mut(&mut self, tile: Tile) -> Option<CanvasViewMut<'_>> {
        let inside = tile.y >= self.y
            && tile.bottom() <= self.y as u64 + self.height as u64
            && tile.right() <= self.width as u64;
        if !inside {
            return None;
        }
        let stride = self.width as usize;
        let first = (tile.y - self.y) as usize;
        let last = first + tile.height as usize;
        Some(CanvasViewMut {
            tile,
            stride,
            pixels: &mut self.pixels[first * stride..last * stride],
        })
    }
}

/// A mutable window onto one tile, borrowed from the band that holds it.
#[derive(Debug)]
pub struct CanvasViewMut<'a> {
    tile: Tile,
    stride: usize,
    // Whole rows; the tile's columns are cut out on access.
    pixels: &'a mut [Color],
}

impl CanvasViewMut<'_> {
    pub fn tile(&self) -> Tile {
        self.tile
    }

    /// Overwrites every sample in the tile with `color`.
    pub fn fill(&mut self, color: Color) {
        for row in self.rows_mut() {
            row.fill(color);
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        let (x, width) = (self.tile.x as usize, self.tile.width as usize);
        self.pixels
            .chunks_exact(self.stride)
            .map(move |row| &row[x..x + width])
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Color]> {
        let (x, width) = (self.tile.x as usize, self.tile.width as usize);
        self.pixels
            .chunks_exact_mut(self.stride)
            .map(move |row| &mut row[x..x + width])
    }
}
