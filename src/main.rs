use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use allo_bot::application::errors::BotError;
use allo_bot::application::messaging::MessageDispatcher;
use allo_bot::application::services::{CommandProcessor, GroupService, MessageService};
use allo_bot::domain::entities::COMMANDS;
use allo_bot::domain::traits::{Bot, GroupStore};
use allo_bot::infrastructure::adapters::console::{ConsoleAdapter, CONSOLE_CHAT_ID};
use allo_bot::infrastructure::adapters::telegram::TelegramAdapter;
use allo_bot::infrastructure::config::Config;
use allo_bot::infrastructure::storage::{JsonFileStore, MemoryStore};

/// Pause before polling again after a failed getUpdates
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "allo-bot")]
#[command(about = "Per-chat mention groups for Telegram", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and ALLO_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// Data directory (overrides config and ALLO_DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run {
        /// Keep groups in memory only
        #[arg(long)]
        ephemeral: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { ephemeral } => {
            if let Err(e) = run_bot(&cli.config, cli.token, cli.data_dir, ephemeral) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("allo-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(&cli.config);
        }
    }
}

fn load_config(config_path: &str) -> Config {
    let config = if Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };

    config.with_env()
}

fn run_bot(
    config_path: &str,
    token_override: Option<String>,
    data_dir_override: Option<PathBuf>,
    ephemeral: bool,
) -> Result<(), BotError> {
    let mut config = load_config(config_path);
    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }
    if let Some(dir) = data_dir_override {
        config.storage.data_dir = Some(dir);
    }

    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    if ephemeral {
        tracing::info!("Keeping mention groups in memory only");
        return rt.block_on(run_with_store(&config, MemoryStore::new()));
    }

    let store = JsonFileStore::new(config.data_file());
    store.init()?;
    tracing::info!("Mention groups stored at {:?}", store.path());

    rt.block_on(run_with_store(&config, store))
}

async fn run_with_store<S: GroupStore>(config: &Config, store: S) -> Result<(), BotError> {
    let processor = CommandProcessor::new(GroupService::open(store));
    let dispatcher = MessageDispatcher::new(processor);

    match config.telegram_token() {
        Ok(token) => run_telegram_bot(token, config.telegram.poll_timeout, dispatcher).await,
        Err(e) => {
            tracing::info!("{}, running console bot", e);
            run_console_bot(dispatcher).await
        }
    }
}

async fn run_telegram_bot<S: GroupStore>(
    token: &str,
    poll_timeout: u64,
    dispatcher: MessageDispatcher<S>,
) -> Result<(), BotError> {
    let mut bot = TelegramAdapter::new(token);
    bot.fetch_bot_info().await?;
    bot.start().await?;

    if let Err(e) = bot.register_commands(&COMMANDS).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let parser = bot.parser();
    let service = MessageService::new(bot, dispatcher.with_parser(parser));
    let mut offset = 0;

    // Updates are handled one at a time, in order
    loop {
        let updates = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                return Ok(());
            }
            result = service.bot().get_updates(offset, poll_timeout) => result,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!("Failed to get updates: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };

        offset = TelegramAdapter::get_next_offset(&updates, offset);

        for update in &updates {
            let Some(message) = TelegramAdapter::to_message(service.dispatcher().parser(), update) else {
                continue;
            };
            if let Err(e) = service.process(message).await {
                tracing::error!("Failed to handle update {}: {}", update.update_id, e);
            }
        }
    }
}

async fn run_console_bot<S: GroupStore>(dispatcher: MessageDispatcher<S>) -> Result<(), BotError> {
    let bot = ConsoleAdapter::new();
    bot.start().await?;
    bot.register_commands(&COMMANDS).await?;

    println!("Type commands (e.g. /g + @alice), /quit to exit");

    let service = MessageService::new(bot, dispatcher);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }

        let message = service.dispatcher().parser().parse(CONSOLE_CHAT_ID, line);
        if let Err(e) = service.process(message).await {
            tracing::error!("Failed to handle message: {}", e);
        }
    }

    Ok(())
}

fn init_config(path: &str) {
    if Path::new(path).exists() {
        println!("{} already exists, not overwriting", path);
        return;
    }

    let yaml = match Config::default().to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match std::fs::write(path, yaml) {
        Ok(()) => println!("Wrote default config to {}", path),
        Err(e) => {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        }
    }
}
