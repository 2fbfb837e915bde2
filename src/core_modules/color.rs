// THEORY:
// The `Color` module is the most fundamental unit of the pixelation engine. It is a
// "dumb" data container for a single RGBA sample and nothing else.
//
// Key principles:
// 1) Four independent channels: red, green, blue and alpha are never combined with
//    each other. Averaging, filling and conversion all treat them separately.
// 2) Neutral default: `Color::default()` is the zero color (all channels 0). It is
//    the value returned when there is nothing to average.
// 3) Boundary conversions only: raw RGBA byte slices and `image::Rgba<u8>` convert
//    into `Color` here, so nothing else in the core needs to know how the decoder
//    lays out its samples.

pub mod color {
    pub type Channel = u8;

    /// Number of channels in a single sample.
    pub const CHANNELS: usize = 4;

    /// A single RGBA sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Color {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Color {
        pub const fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Color {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// The channels in RGBA order.
        pub const fn channels(&self) -> [Channel; CHANNELS] {
            [self.red, self.green, self.blue, self.alpha]
        }
    }

    impl From<[Channel; CHANNELS]> for Color {
        fn from(channels: [Channel; CHANNELS]) -> Self {
            let [red, green, blue, alpha] = channels;
            Color::new(red, green, blue, alpha)
        }
    }

    /// Reads the first four bytes as RGBA. Missing trailing channels read as 0.
    impl From<&[u8]> for Color {
        fn from(bytes: &[u8]) -> Self {
            let channel = |i: usize| bytes.get(i).copied().unwrap_or_default();
            Color::new(channel(0), channel(1), channel(2), channel(3))
        }
    }

    impl From<image::Rgba<u8>> for Color {
        fn from(pixel: image::Rgba<u8>) -> Self {
            Color::from(pixel.0)
        }
    }

    impl From<Color> for image::Rgba<u8> {
        fn from(color: Color) -> Self {
            image::Rgba(color.channels())
        }
    }
}
