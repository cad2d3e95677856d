//! Operator tool for tile sources.
//!
//! - `check`: load every source from a configuration file and report all
//!   configuration problems at once
//! - `render`: fetch a single metatile through a configured source and write
//!   the image to disk, surfacing upstream exception reports verbatim

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tile_common::{BoundingBox, Metatile, TileCoord, Tileset};
use tile_source::{HttpConfig, RenderContext, ReqwestFetcher, SourceRegistry};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tile-fetch")]
#[command(about = "Check and exercise configured tile sources")]
struct Cli {
    /// Source configuration file
    #[arg(
        short,
        long,
        env = "TILE_SOURCES_CONFIG",
        default_value = "/etc/tilecache/sources.xml",
        global = true
    )]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate every configured source
    Check,

    /// Fetch one metatile through a source
    Render {
        /// Source name as declared in the configuration
        #[arg(long)]
        source: String,

        /// Tileset the metatile belongs to
        #[arg(long, default_value = "default")]
        tileset: String,

        /// Spatial reference of the bbox
        #[arg(long, default_value = "EPSG:3857")]
        srs: String,

        /// Extent as minx,miny,maxx,maxy
        #[arg(long, allow_hyphen_values = true, value_parser = parse_bbox)]
        bbox: BoundingBox,

        /// Image width in pixels
        #[arg(long, default_value_t = 256)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = 256)]
        height: u32,

        /// Tile column, used in error reports
        #[arg(short, default_value_t = 0)]
        x: u32,

        /// Tile row, used in error reports
        #[arg(short, default_value_t = 0)]
        y: u32,

        /// Zoom level, used in error reports
        #[arg(short, default_value_t = 0)]
        z: u32,

        /// Where to write the image
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    BoundingBox::from_wms_string(s).map_err(|e| e.to_string())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs)?;

    match cli.command {
        Commands::Check => check(&cli.config),
        Commands::Render {
            source,
            tileset,
            srs,
            bbox,
            width,
            height,
            x,
            y,
            z,
            output,
        } => {
            let mut tile = Metatile::new(
                Arc::new(Tileset::new(tileset, srs)),
                TileCoord::new(z, x, y),
                bbox,
                width,
                height,
            );
            render(&cli.config, &source, &mut tile).await?;

            tokio::fs::write(&output, &tile.data)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(path = %output.display(), bytes = tile.data.len(), "Wrote metatile");
            Ok(())
        }
    }
}

fn check(config: &Path) -> Result<()> {
    match SourceRegistry::from_file(config) {
        Ok(registry) => {
            for name in registry.names() {
                if let Some(source) = registry.get(name) {
                    println!("{}: {} ok", name, source.source_type());
                }
            }
            Ok(())
        }
        Err(errors) => {
            for err in errors.iter() {
                eprintln!("  - {}", err);
            }
            bail!("{} configuration problem(s) in {}", errors.len(), config.display())
        }
    }
}

async fn render(config: &Path, source_name: &str, tile: &mut Metatile) -> Result<()> {
    let registry = SourceRegistry::from_file(config)?;
    let source = registry
        .get(source_name)
        .ok_or_else(|| anyhow!("no source named {} in {}", source_name, config.display()))?;

    let fetcher = ReqwestFetcher::new(&HttpConfig::from_env())?;
    let ctx = RenderContext::new(Arc::new(fetcher));

    source.render_metatile(&ctx, tile).await?;
    Ok(())
}
