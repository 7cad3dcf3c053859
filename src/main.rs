use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use botdeck::api::BotClient;
use botdeck::tui::runner::run_tui;

#[derive(Parser)]
#[command(name = "botdeck", about = "Terminal control panel for a social-posting bot.")]
struct Cli {
    /// Base URL of the bot's control API
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    url: String,

    /// Polling interval in seconds (stats + page-1 feed refresh)
    #[arg(long, default_value_t = 30)]
    poll_secs: u64,

    /// Diagnostics log file (the alternate screen owns stderr)
    #[arg(long, default_value = "botdeck.log")]
    log_file: String,

    /// Verbose diagnostics
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    let log_file = File::create(&cli.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("botdeck={level}").parse()?),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    info!("botdeck starting against {}", cli.url);

    let client = BotClient::new(cli.url);
    run_tui(client, Duration::from_secs(cli.poll_secs)).await
}
