//! Tile addressing and the per-render metatile request.

use std::collections::TryReserveError;
use std::sync::Arc;

use crate::BoundingBox;
use serde::{Deserialize, Serialize};

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

/// A named collection of tiles sharing a spatial reference and a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tileset {
    pub name: String,
    /// Spatial reference identifier, e.g. "EPSG:3857".
    pub srs: String,
}

impl Tileset {
    pub fn new(name: impl Into<String>, srs: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            srs: srs.into(),
        }
    }
}

/// One upstream render request covering one or more output tiles.
///
/// Owned by the dispatcher for the duration of a single render. Sources only
/// write into `data` and never keep a reference to the metatile.
#[derive(Debug, Clone)]
pub struct Metatile {
    /// Tileset the metatile belongs to.
    pub tileset: Arc<Tileset>,
    /// Address of the metatile's anchor tile.
    pub coord: TileCoord,
    /// Geographic extent in the tileset's SRS.
    pub bbox: BoundingBox,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Encoded image bytes, filled in by the source.
    pub data: Vec<u8>,
}

impl Metatile {
    pub fn new(
        tileset: Arc<Tileset>,
        coord: TileCoord,
        bbox: BoundingBox,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            tileset,
            coord,
            bbox,
            width,
            height,
            data: Vec::new(),
        }
    }

    /// Spatial reference the metatile's bbox is expressed in.
    pub fn srs(&self) -> &str {
        &self.tileset.srs
    }

    /// Replace the image buffer with an empty one able to hold at least
    /// `capacity` bytes. The buffer still grows past the hint on demand.
    pub fn reset_data(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        let mut data = Vec::new();
        data.try_reserve(capacity)?;
        self.data = data;
        Ok(())
    }
}
