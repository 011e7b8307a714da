// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, resolve the config and hand an API
//   client to the UI loop.
// - Returns `anyhow::Result` so setup failures are printed with context.

use gyazo_cli::{api::ApiClient, ui};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Quiet by default so log lines don't interleave with the prompts.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Token from GYAZO_ACCESS_TOKEN or ~/.gyazo_token, asking once if neither exists.
    let config = ui::resolve_config()?;
    let api = ApiClient::new(config)?;

    ui::main_menu(api).await?;
    Ok(())
}
