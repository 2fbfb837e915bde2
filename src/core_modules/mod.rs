pub mod canvas;
pub mod color;
pub mod color_aggregator;
pub mod tile;
pub mod tile_enumerator;
pub mod utils;
