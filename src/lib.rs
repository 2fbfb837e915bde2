// THEORY:
// This file is the main entry point for the `pixelate` library crate. It exposes the
// `PixelatePipeline` and its configuration as the high-level interface, plus the core
// modules for callers that want to drive tiling or dispatch themselves.
//
// Layering, leaf-first:
// - `core_modules`: the data types (`Color`, `Tile`, `Canvas`), the `TileEnumerator`,
//   the color aggregator and the image conversion helpers.
// - `dispatcher`: the concurrent fan-out/join over disjoint row bands of the output.
// - `pipeline`: configuration, precondition checks and the blocking/async entry points.

pub mod core_modules;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use core_modules::canvas::{Canvas, CanvasBandMut, CanvasView, CanvasViewMut};
pub use core_modules::color::color::Color;
pub use core_modules::tile::tile::Tile;
pub use core_modules::tile_enumerator::TileEnumerator;
pub use dispatcher::{DispatchReport, Dispatcher, TilePair};
pub use error::PixelateError;
pub use pipeline::{PipelineConfig, PixelatePipeline};
