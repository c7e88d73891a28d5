use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use teloxide::prelude::*;
use tune_bot::{
    handlers, tracing::init_tracing_subscriber, transport::telegram::TelegramTransport,
    OrchestratorBuilder,
};
use yt_source::YtDlp;

#[derive(Parser)]
#[command(name = "tune-bot", about = "Telegram bot that answers song searches with YouTube audio")]
struct Cli {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Path to the yt-dlp executable
    #[arg(long, env = "YTDLP_PATH", default_value = "yt-dlp")]
    ytdlp_path: PathBuf,

    /// Path to yt-dlp cookies file
    #[arg(long, env = "YTDLP_COOKIES_PATH")]
    cookies_path: Option<PathBuf>,

    /// Socket timeout handed to yt-dlp, in seconds
    #[arg(long, env = "YTDLP_SOCKET_TIMEOUT", default_value = "30")]
    socket_timeout: u32,

    /// Directory for temporary audio files
    #[arg(long, env = "WORKDIR")]
    workdir: Option<PathBuf>,

    /// Maximum requests processed at once; unbounded when unset
    #[arg(long, env = "MAX_CONCURRENT_REQUESTS")]
    max_concurrent_requests: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Send the audio of the top search result right away (default)
    Auto,
    /// Offer the top results as buttons and send the one picked
    Choose {
        /// Number of results to offer
        #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(1..=5))]
        choices: u8,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let workdir = cli
        .workdir
        .unwrap_or_else(|| std::env::temp_dir().join("tune-bot"));
    std::fs::create_dir_all(&workdir)
        .with_context(|| format!("Failed to create workdir {}", workdir.display()))?;

    //XXX: yt-dlp handles both lookup and extraction; hence the clone
    let yt_dlp = YtDlp::new(cli.ytdlp_path)
        .with_cookies(cli.cookies_path)
        .with_socket_timeout(cli.socket_timeout);

    let bot = Bot::new(cli.bot_token);

    let builder = OrchestratorBuilder::new(&workdir)
        .lookup(yt_dlp.clone())
        .extractor(yt_dlp)
        .transport(TelegramTransport(bot.clone()))
        .max_concurrent_requests(cli.max_concurrent_requests);

    let builder = match cli.command.unwrap_or(Command::Auto) {
        Command::Auto => builder.auto_pick(),
        Command::Choose { choices } => builder.choose(choices.into()),
    };
    let orchestrator = Arc::new(builder.build());

    tracing::info!(
        mode = ?orchestrator.mode(),
        workdir = %workdir.display(),
        max_concurrent_requests = ?cli.max_concurrent_requests,
        "Bot is starting..."
    );

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![orchestrator])
        .default_handler(|update| async move {
            tracing::debug!(update_id = ?update.id, "Ignoring unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Bot stopped");

    Ok(())
}
