// Entrypoint for the sync CLI.
// - Keeps `main` small: load configuration, build the API client, run one
//   sync pass over the data directory.
// - Returns `anyhow::Result` so setup errors print with their context.

use labelsync::{api::ApiClient, config::SyncConfig, progress::ConsoleProgress, sync::sync_folders};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("labelsync=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Settings come from config.env / the environment; see
    // `SyncConfig::from_env` for the keys.
    let config = SyncConfig::from_env()?;
    let api = ApiClient::new(&config)?;
    let mut progress = ConsoleProgress::new();

    sync_folders(&config, &api, &mut progress)
}
