//! Upstream tile sources for the tile cache.
//!
//! A source turns a metatile request into an upstream call and hands the
//! resulting image bytes back to the cache. The WMS source builds a GetMap
//! request from the metatile geometry, fetches it over HTTP, and checks that
//! the response is an image before the cache stores it.

pub mod config;
pub mod error;
pub mod http;
pub mod imageio;
pub mod params;
pub mod registry;
pub mod source;
pub mod wms;

pub use config::ConfigNode;
pub use error::{ConfigErrors, SourceError, SourceResult};
pub use http::{HttpConfig, HttpFetcher, ReqwestFetcher};
pub use params::ParamTable;
pub use registry::SourceRegistry;
pub use source::{create_source, RenderContext, Source, SourceType};
pub use wms::WmsSource;
