// THEORY:
// A `Tile` is a rectangular region descriptor: an origin and a size, in pixels. It
// carries no pixels and no behavior beyond geometry. Every tile the enumerator
// yields has a positive width and height; the helpers here never produce a tile,
// they only answer questions about one.

pub mod tile {
    /// A rectangular sub-region of a canvas.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Tile {
        /// Column of the top-left pixel.
        pub x: u32,
        /// Row of the top-left pixel.
        pub y: u32,
        /// Width in pixels.
        pub width: u32,
        /// Height in pixels.
        pub height: u32,
    }

    impl Tile {
        pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
            Self {
                x,
                y,
                width,
                height,
            }
        }

        /// Number of pixels covered by the tile.
        pub const fn area(&self) -> u64 {
            self.width as u64 * self.height as u64
        }

        pub const fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        /// One past the last column. Computed in `u64` so it never overflows.
        pub const fn right(&self) -> u64 {
            self.x as u64 + self.width as u64
        }

        /// One past the last row.
        pub const fn bottom(&self) -> u64 {
            self.y as u64 + self.height as u64
        }

        /// True when the tile lies entirely inside a `width` x `height` grid.
        pub const fn fits_within(&self, width: u32, height: u32) -> bool {
            self.right() <= width as u64 && self.bottom() <= height as u64
        }

        pub const fn intersects(&self, other: &Tile) -> bool {
            !self.is_empty()
                && !other.is_empty()
                && (self.x as u64) < other.right()
                && (other.x as u64) < self.right()
                && (self.y as u64) < other.bottom()
                && (other.y as u64) < self.bottom()
        }
    }
}
