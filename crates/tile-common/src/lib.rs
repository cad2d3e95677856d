//! Tile geometry types shared between the tile cache and its sources.

pub mod bbox;
pub mod tile;

pub use bbox::{BboxParseError, BoundingBox};
pub use tile::{Metatile, TileCoord, Tileset};
