use clap::{Parser, Subcommand};
use std::sync::Arc;

use chaser_shop_bot::application::errors::BotError;
use chaser_shop_bot::application::messaging::{Caller, ShopDispatcher};
use chaser_shop_bot::application::services::ShopService;
use chaser_shop_bot::domain::traits::Bot;
use chaser_shop_bot::infrastructure::adapters::telegram::{TelegramAdapter, Update};
use chaser_shop_bot::infrastructure::config::Config;
use chaser_shop_bot::infrastructure::database::SqliteStore;
use chaser_shop_bot::infrastructure::http;

#[derive(Parser)]
#[command(name = "chaser-shop-bot")]
#[command(about = "Telegram storefront for Chaser 30 ml flavors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
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
        Commands::Run => run_bot(&cli.config),
        Commands::Version => {
            println!("chaser-shop-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => init_config(&cli.config),
    }
}

fn init_config(path: &str) {
    if std::path::Path::new(path).exists() {
        tracing::warn!("{} already exists, not overwriting", path);
        return;
    }
    match Config::default().save(path) {
        Ok(()) => tracing::info!("Wrote default config to {}", path),
        Err(e) => tracing::error!("Failed to write config: {}", e),
    }
}

fn run_bot(config_path: &str) {
    // Load config: optional file, environment on top, then validate
    let mut config = if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };
    if let Err(e) = config.apply_env() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    let config = match config.validate() {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting chaser-shop-bot (admin: {})", config.admin_chat_id);

    // Open storage once; every operation borrows this handle
    let store = match SqliteStore::open(&config.db_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open database {:?}: {}", config.db_path, e);
            std::process::exit(1);
        }
    };

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let mut adapter = TelegramAdapter::new(config.token.clone());
        if let Err(e) = adapter.fetch_bot_info().await {
            tracing::error!("Failed to fetch bot info: {}", e);
            std::process::exit(1);
        }
        tracing::info!("Bot started: @{}", adapter.bot_info().username);

        if let Err(e) = adapter.register_commands().await {
            tracing::warn!("Failed to register commands: {}", e);
        }

        if let Some(port) = config.port {
            tokio::spawn(async move {
                if let Err(e) = http::serve(port).await {
                    tracing::error!("Liveness endpoint failed: {}", e);
                }
            });
        }

        let adapter = Arc::new(adapter);
        let bot: Arc<dyn Bot> = adapter.clone();
        let service = ShopService::new(store, config.photo_url.clone());
        let dispatcher = Arc::new(ShopDispatcher::new(
            bot,
            service,
            config.admin_chat_id,
        ));

        run_polling_loop(adapter, dispatcher).await;
    });
}

async fn run_polling_loop(poller: Arc<TelegramAdapter>, dispatcher: Arc<ShopDispatcher>) {
    let mut offset: i64 = 0;
    let timeout_seconds = 30;

    tracing::info!("Starting update loop...");

    loop {
        match poller.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                offset = TelegramAdapter::get_next_offset(&updates, offset);
                for update in updates {
                    let dispatcher = dispatcher.clone();
                    // One task per update: conversations proceed concurrently,
                    // the store serializes the critical sections itself
                    tokio::spawn(async move {
                        if let Err(e) = dispatch_update(&dispatcher, update).await {
                            tracing::error!("Failed to handle update: {}", e);
                        }
                    });
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}

/// Map a raw Telegram update onto the dispatcher's entry points
async fn dispatch_update(dispatcher: &ShopDispatcher, update: Update) -> Result<(), BotError> {
    if let Some(msg) = &update.message {
        let Some(from) = &msg.from else {
            return Ok(());
        };
        let Some(text) = &msg.text else {
            return Ok(());
        };
        let caller = Caller {
            user_id: from.id,
            chat_id: msg.chat.id,
            username: from.username.clone(),
        };
        let reply_photo = msg
            .reply_to_message
            .as_deref()
            .and_then(|reply| reply.largest_photo());
        dispatcher.handle_text(&caller, text, reply_photo).await?;
    }

    if let Some(cb) = &update.callback_query {
        let Some(message) = &cb.message else {
            // Callback from a message too old for Telegram to reference
            return Ok(());
        };
        let caller = Caller {
            user_id: cb.from.id,
            chat_id: message.chat.id,
            username: cb.from.username.clone(),
        };
        let data = cb.data.as_deref().unwrap_or("");
        dispatcher
            .handle_callback(&caller, message.message_id, &cb.id, data)
            .await?;
    }

    Ok(())
}
