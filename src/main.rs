use anyhow::Context;
use clap::Parser;
use pixelate::core_modules::utils::image_helper::image_helper;
use pixelate::logging::init_logging;
use pixelate::{PipelineConfig, PixelatePipeline};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pixelate", version)]
#[command(about = "Pixelate an image by averaging fixed-size tiles", long_about = None)]
struct Args {
    /// Input image (any format the decoder recognises)
    #[arg(short, long, env = "PIXELATE_INPUT", default_value = "pixel.jpg")]
    input: PathBuf,

    /// Output pixel size, i.e. the tile edge length in pixels
    #[arg(
        short,
        long,
        env = "PIXELATE_WINDOW",
        default_value_t = 10,
        allow_negative_numbers = true
    )]
    window: i64,

    /// Output image (.jpg/.jpeg is JPEG-encoded, other extensions pick their own format)
    #[arg(short, long, env = "PIXELATE_OUTPUT", default_value = "output.jpg")]
    output: PathBuf,

    /// JPEG quality, 1-100
    #[arg(
        short,
        long,
        env = "PIXELATE_QUALITY",
        default_value_t = image_helper::DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    quality: u8,

    /// Worker threads (0 = one per logical CPU)
    #[arg(short = 'j', long, env = "PIXELATE_WORKERS", default_value_t = 0)]
    workers: usize,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(if args.verbose { "debug" } else { "info" })
        .context("failed to initialise logging")?;

    // Negative windows fall through as 0 and surface as "nothing to tile".
    let tile_size = u32::try_from(args.window).unwrap_or(0);
    info!(window = args.window, "window is {}", args.window);

    let source = image_helper::load(&args.input)
        .with_context(|| format!("cannot open image {}", args.input.display()))?;
    info!(
        width = source.width(),
        height = source.height(),
        input = %args.input.display(),
        "decoded source image"
    );

    let pipeline = PixelatePipeline::new(PipelineConfig {
        tile_size,
        workers: args.workers,
    });
    let output = pipeline
        .pixelate_async(source)
        .await
        .context("pixelation failed")?;

    image_helper::save(&output, &args.output, args.quality)
        .with_context(|| format!("cannot save output image to {}", args.output.display()))?;
    info!(output = %args.output.display(), quality = args.quality, "saved pixelated image");

    Ok(())
}
