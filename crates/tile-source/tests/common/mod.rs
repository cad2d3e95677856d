//! Shared helpers for tile-source integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tile_common::{BoundingBox, Metatile, TileCoord, Tileset};
use tile_source::{HttpFetcher, ParamTable, SourceError, SourceResult};

/// One request seen by [`MockFetcher`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub params: ParamTable,
}

/// Fetcher that answers every request with a canned response.
pub struct MockFetcher {
    response: Result<Bytes, String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockFetcher {
    pub fn responding(body: impl Into<Bytes>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_params(&self) -> ParamTable {
        self.requests()
            .last()
            .expect("no request was issued")
            .params
            .clone()
    }
}

#[async_trait]
impl HttpFetcher for MockFetcher {
    async fn fetch(&self, url: &str, params: &ParamTable) -> SourceResult<Bytes> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            params: params.clone(),
        });
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err(message) => Err(SourceError::Transport {
                url: url.to_string(),
                message: message.clone(),
            }),
        }
    }
}

/// A metatile in the given tileset.
pub fn metatile(
    tileset: &str,
    srs: &str,
    coord: (u32, u32, u32),
    bbox: (f64, f64, f64, f64),
    size: (u32, u32),
) -> Metatile {
    Metatile::new(
        Arc::new(Tileset::new(tileset, srs)),
        TileCoord::new(coord.2, coord.0, coord.1),
        BoundingBox::new(bbox.0, bbox.1, bbox.2, bbox.3),
        size.0,
        size.1,
    )
}
