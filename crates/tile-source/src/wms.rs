//! OGC WMS source.
//!
//! Each metatile becomes one GetMap request. The request is assembled in
//! three layers, later layers winning on key collisions:
//!
//! 1. protocol defaults (`VERSION`, `REQUEST`, `SERVICE`, `STYLES`)
//! 2. parameters computed from the metatile (`BBOX`, `WIDTH`, `HEIGHT`,
//!    `FORMAT`, `SRS`)
//! 3. parameters declared under `<wmsparams>` in the source configuration
//!
//! Configured parameters therefore override computed ones, `SRS` and
//! `FORMAT` included.

use async_trait::async_trait;
use metrics::{counter, histogram};
use tile_common::Metatile;
use tracing::{debug, instrument, warn};

use crate::config::ConfigNode;
use crate::error::{ConfigErrors, SourceError, SourceResult};
use crate::imageio;
use crate::params::ParamTable;
use crate::source::{RenderContext, Source, SourceType};

/// Initial capacity of a metatile's image buffer. Larger responses still fit.
pub const DEFAULT_BUFFER_CAPACITY: usize = 30_000;

/// Image format requested from the upstream server.
pub const REQUEST_FORMAT: &str = "image/png";

/// A WMS server used as a tile source.
#[derive(Debug, Clone)]
pub struct WmsSource {
    name: String,
    url: String,
    default_params: ParamTable,
    override_params: ParamTable,
}

impl WmsSource {
    /// Create a source with protocol defaults and no url or layers yet.
    pub fn new(name: impl Into<String>) -> Self {
        let default_params = ParamTable::new()
            .with("VERSION", "1.1.1")
            .with("REQUEST", "GetMap")
            .with("SERVICE", "WMS")
            .with("STYLES", "");

        Self {
            name: name.into(),
            url: String::new(),
            default_params,
            override_params: ParamTable::new(),
        }
    }

    /// Builder: set the upstream endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Builder: declare a parameter that overrides anything computed.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.override_params.set(key, value);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn default_params(&self) -> &ParamTable {
        &self.default_params
    }

    pub fn override_params(&self) -> &ParamTable {
        &self.override_params
    }

    /// Build the GetMap parameters for `tile`.
    ///
    /// Always returns a fresh table; the source itself is never modified.
    pub fn request_params(&self, tile: &Metatile) -> ParamTable {
        self.default_params
            .clone()
            .with("BBOX", tile.bbox.to_wms_string())
            .with("WIDTH", tile.width.to_string())
            .with("HEIGHT", tile.height.to_string())
            .with("FORMAT", REQUEST_FORMAT)
            .with("SRS", tile.srs())
            .overlaid(&self.override_params)
    }

    async fn fetch_into(
        &self,
        ctx: &RenderContext,
        tile: &mut Metatile,
        params: &ParamTable,
    ) -> SourceResult<()> {
        tile.reset_data(DEFAULT_BUFFER_CAPACITY)
            .map_err(|_| buffer_alloc_error())?;

        let body = ctx.fetcher.fetch(&self.url, params).await?;
        histogram!("tile_source_response_bytes").record(body.len() as f64);

        tile.data
            .try_reserve(body.len())
            .map_err(|_| buffer_alloc_error())?;
        tile.data.extend_from_slice(&body);

        check_response(tile)
    }
}

/// Confirm the fetched bytes are an image; otherwise surface them as text.
///
/// WMS servers report failures as XML or plain-text documents, so the body is
/// embedded in the error verbatim. The tile's buffer is emptied on failure.
fn check_response(tile: &mut Metatile) -> SourceResult<()> {
    if imageio::is_valid_image_format(&tile.data) {
        return Ok(());
    }

    let raw = std::mem::take(&mut tile.data);
    let body = String::from_utf8(raw)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

    warn!(
        tileset = %tile.tileset.name,
        bytes = body.len(),
        "Upstream returned an unsupported format"
    );

    Err(SourceError::UnsupportedFormat {
        tileset: tile.tileset.name.clone(),
        x: tile.coord.x,
        y: tile.coord.y,
        z: tile.coord.z,
        body,
    })
}

fn buffer_alloc_error() -> SourceError {
    SourceError::Allocation {
        what: "tile image buffer".to_string(),
    }
}

#[async_trait]
impl Source for WmsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_type(&self) -> SourceType {
        SourceType::Wms
    }

    fn supports_metatiling(&self) -> bool {
        true
    }

    fn configuration_parse(&mut self, node: &ConfigNode) {
        for child in node.children() {
            match child.name() {
                "url" => self.url = child.text_content(),
                "wmsparams" => {
                    for param in child.children() {
                        self.override_params.set(param.name(), param.text_content());
                    }
                }
                _ => {}
            }
        }
    }

    fn configuration_check(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();

        if self.url.is_empty() {
            errors.push(SourceError::MissingUrl {
                source_name: self.name.clone(),
            });
        }
        if !self.override_params.contains_key("LAYERS") {
            errors.push(SourceError::MissingLayers {
                source_name: self.name.clone(),
            });
        }

        for err in errors.iter() {
            warn!(source = %self.name, error = %err, "Invalid source configuration");
        }
        errors.into_result()
    }

    #[instrument(
        skip_all,
        fields(
            source = %self.name,
            tileset = %tile.tileset.name,
            x = tile.coord.x,
            y = tile.coord.y,
            z = tile.coord.z
        )
    )]
    async fn render_metatile(&self, ctx: &RenderContext, tile: &mut Metatile) -> SourceResult<()> {
        let params = self.request_params(tile);
        debug!(params = ?params, "Rendering metatile from WMS");
        counter!("tile_source_requests_total", "source" => self.name.clone()).increment(1);

        let result = self.fetch_into(ctx, tile, &params).await;
        if let Err(err) = &result {
            counter!("tile_source_errors_total", "category" => err.category()).increment(1);
        }
        result
    }
}
