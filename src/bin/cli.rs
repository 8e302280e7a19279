use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use steam_library_stats::{
    config::{DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER},
    HowLongToBeatSearch, LibraryEngine, Settings, SteamProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load(DEFAULT_CONFIG_PATH)
        .with_context(|| format!("loading {}", DEFAULT_CONFIG_PATH))?;

    tracing::info!("🎮 Exporting library of {}", settings.user_id);
    tracing::info!("📄 Output: {}", settings.output_path.display());

    let engine = LibraryEngine::new(
        Arc::new(SteamProvider::from_settings(&settings)?),
        Arc::new(HowLongToBeatSearch::from_settings(&settings)?),
    );

    let report = engine
        .run(&settings.user_id, &settings.output_path)
        .await
        .context("library export failed")?;

    println!(
        "✅ {} titles exported, {} skipped",
        report.records().count(),
        report.skipped()
    );

    Ok(())
}
