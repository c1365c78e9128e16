//! Runic Babble - Madouji relay bot
//!
//! Loads layered configuration, wires the relay core to Discord and the
//! image backend, then runs the gateway session until it ends.

mod config;
mod renderer;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config::BotConfig;
use renderer::HttpImageRenderer;
use runic::{RelayDispatcher, RelayOptions, RenderPipeline};
use runic_integration_discord::{run, DiscordClient};

#[derive(Parser)]
#[command(name = "runicbabble")]
#[command(about = "Relays Madouji glyphs through per-channel persona webhooks", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the `*.toml` config layers
    #[arg(short, long, default_value = "config")]
    config_dir: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_pipeline(config: &BotConfig) -> Result<RenderPipeline> {
    let pipeline = RenderPipeline::new().with_glyph_size(config.render.glyph_size);

    match &config.render.url {
        Some(url) => {
            let renderer =
                HttpImageRenderer::new(url).context("Failed to build image backend client")?;
            tracing::info!(url = %url, "🖼️  Image backend configured");
            Ok(pipeline.with_renderer(Arc::new(renderer)))
        }
        None => {
            tracing::warn!("⚠️  No RENDER_URL set - /mdj will report an error");
            Ok(pipeline)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env never overrides variables that are already set
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    tracing::info!("🔮 Runic Babble initializing...");

    let config = BotConfig::load(&cli.config_dir)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load configuration"))?;

    if config.discord.home_guild.is_none() {
        tracing::warn!("⚠️  No HOME_GUILD set - inline relay disabled");
    }

    let pipeline = build_pipeline(&config)?;
    let platform = Arc::new(DiscordClient::new(&config.discord));
    let dispatcher = Arc::new(RelayDispatcher::new(
        platform,
        pipeline,
        RelayOptions {
            attribute_fallback: config.relay.attribute_fallback,
        },
    ));

    run(config.discord, dispatcher)
        .await
        .context("Discord session ended with an error")?;

    tracing::info!("👋 Runic Babble stopped");
    Ok(())
}
