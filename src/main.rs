use anyhow::Result;
use clap::Parser;
use superior_chat::{ApiClient, Config, TerminalUI};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    // Logs go to stderr and stay quiet unless RUST_LOG asks for more.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::parse();
    config.validate()?;
    info!(
        server = %config.server_url,
        endpoint = %config.endpoint,
        timeout_secs = config.timeout_secs,
        "configuration loaded"
    );

    let client = ApiClient::new(&config.server_url, config.timeouts())?;

    if let Some(message) = config.one_shot_message() {
        if !TerminalUI::send_once(client, config.endpoint, &message).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut ui = TerminalUI::new(client, &config)?;
    ui.run().await?;

    Ok(())
}
