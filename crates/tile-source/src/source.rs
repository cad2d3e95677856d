//! The capability interface every source kind implements.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tile_common::Metatile;

use crate::config::ConfigNode;
use crate::error::{ConfigErrors, SourceError, SourceResult};
use crate::http::HttpFetcher;
use crate::wms::WmsSource;

/// Kinds of upstream source the cache can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    Wms,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Wms => "wms",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wms" => Ok(SourceType::Wms),
            other => Err(SourceError::InvalidConfig(format!(
                "unknown source type: {}",
                other
            ))),
        }
    }
}

/// Collaborators shared by every render call.
#[derive(Clone)]
pub struct RenderContext {
    pub fetcher: Arc<dyn HttpFetcher>,
}

impl RenderContext {
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self { fetcher }
    }
}

/// An upstream the cache fetches missing tiles from.
///
/// Configuration methods run once at load time. After that a source is
/// read-only and `render_metatile` may be called concurrently.
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &str;

    fn source_type(&self) -> SourceType;

    /// Whether one request may cover several tiles at once.
    fn supports_metatiling(&self) -> bool;

    /// Populate the source from its configuration element.
    ///
    /// Missing or unknown elements are ignored here; `configuration_check`
    /// reports what is still missing.
    fn configuration_parse(&mut self, node: &ConfigNode);

    /// Report every problem with the loaded configuration.
    fn configuration_check(&self) -> Result<(), ConfigErrors>;

    /// Fetch the image for `tile` into `tile.data`.
    async fn render_metatile(&self, ctx: &RenderContext, tile: &mut Metatile) -> SourceResult<()>;
}

/// Create an unconfigured source of the given kind.
pub fn create_source(source_type: SourceType, name: impl Into<String>) -> Box<dyn Source> {
    match source_type {
        SourceType::Wms => Box::new(WmsSource::new(name)),
    }
}
