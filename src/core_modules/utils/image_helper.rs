pub mod image_helper {
    use crate::core_modules::canvas::Canvas;
    use crate::core_modules::color::color::Color;
    use crate::error::Result;
    use image::codecs::jpeg::JpegEncoder;
    use image::{DynamicImage, ImageEncoder, RgbaImage};
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::Path;

    /// JPEG quality used when the caller has no preference.
    pub const DEFAULT_JPEG_QUALITY: u8 = 80;

    pub fn canvas_from_rgba(image: &RgbaImage) -> Result<Canvas> {
        let pixels = image.pixels().map(|&pixel| Color::from(pixel)).collect();
        Canvas::from_pixels(image.width(), image.height(), pixels)
    }

    /// Converts any decoded image to RGBA8 and wraps it as a canvas.
    pub fn canvas_from_image(image: &DynamicImage) -> Result<Canvas> {
        canvas_from_rgba(&image.to_rgba8())
    }

    pub fn canvas_to_rgba(canvas: &Canvas) -> RgbaImage {
        RgbaImage::from_fn(canvas.width(), canvas.height(), |x, y| {
            canvas.get(x, y).unwrap_or_default().into()
        })
    }

    /// Decodes the image at `path`, format detected from its contents.
    pub fn load(path: impl AsRef<Path>) -> Result<Canvas> {
        let image = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        canvas_from_image(&image)
    }

    /// Encodes `canvas` as JPEG. Alpha is dropped; `quality` is clamped to 1..=100.
    pub fn save_jpeg<W: Write>(canvas: &Canvas, writer: W, quality: u8) -> Result<()> {
        let rgb = DynamicImage::ImageRgba8(canvas_to_rgba(canvas)).to_rgb8();
        let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
        encoder.write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(())
    }

    /// Writes `canvas` to `path`. `.jpg`/`.jpeg` go through `save_jpeg` with the
    /// given quality; any other extension uses the `image` crate's own detection.
    pub fn save(canvas: &Canvas, path: impl AsRef<Path>, quality: u8) -> Result<()> {
        let path = path.as_ref();
        let is_jpeg = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| {
                extension.eq_ignore_ascii_case("jpg") || extension.eq_ignore_ascii_case("jpeg")
            });

        if is_jpeg {
            let mut writer = BufWriter::new(File::create(path)?);
            save_jpeg(canvas, &mut writer, quality)?;
            writer.flush()?;
        } else {
            canvas_to_rgba(canvas).save(path)?;
        }
        Ok(())
    }
}
