// THEORY:
// The `ColorAggregator` turns a region of pixels into the single color that will be
// painted over that region in the output. It is the per-tile "summary" step of the
// pipeline and the only place where samples are combined.
//
// Key architectural principles:
// 1.  **Spatial Pooling**: Every sample of a tile contributes equally. There is no
//     weighting, no gamma correction and no cross-channel mixing; red is averaged with
//     red, alpha with alpha.
// 2.  **Truncating Average**: Each channel sum is divided by the pixel count with
//     integer division. {1, 2} averages to 1, not 2. Output pixel values depend on this
//     bias, so it is kept exactly.
// 3.  **Wide Accumulators**: Sums are `u64`, which cannot overflow for any tile a `u32`
//     canvas can hold.
// 4.  **Neutral Default**: An absent or empty region averages to the zero color rather
//     than failing.

pub mod color_aggregator {
    use crate::core_modules::canvas::CanvasView;
    use crate::core_modules::color::color::Color;

    /// Running per-channel sums over a set of samples.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct ColorSum {
        pub red: u64,
        pub green: u64,
        pub blue: u64,
        pub alpha: u64,
        pub count: u64,
    }

    impl ColorSum {
        #[inline]
        pub fn add(&mut self, color: Color) {
            self.red += color.red as u64;
            self.green += color.green as u64;
            self.blue += color.blue as u64;
            self.alpha += color.alpha as u64;
            self.count += 1;
        }

        /// The truncated per-channel mean, or the zero color when nothing was added.
        pub fn average(&self) -> Color {
            if self.count == 0 {
                return Color::default();
            }
            Color {
                red: (self.red / self.count) as u8,
                green: (self.green / self.count) as u8,
                blue: (self.blue / self.count) as u8,
                alpha: (self.alpha / self.count) as u8,
            }
        }
    }

    impl Extend<Color> for ColorSum {
        fn extend<I: IntoIterator<Item = Color>>(&mut self, colors: I) {
            for color in colors {
                self.add(color);
            }
        }
    }

    /// Averages an arbitrary run of samples.
    pub fn average_pixels<I>(pixels: I) -> Color
    where
        I: IntoIterator<Item = Color>,
    {
        let mut sum = ColorSum::default();
        sum.extend(pixels);
        sum.average()
    }

    /// Averages the samples under a canvas view.
    pub fn average_of(view: Option<&CanvasView<'_>>) -> Color {
        let Some(view) = view else {
            return Color::default();
        };
        if view.area() == 0 {
            return Color::default();
        }

        let mut sum = ColorSum::default();
        for row in view.rows() {
            for &pixel in row {
                sum.add(pixel);
            }
        }
        sum.average()
    }
}
