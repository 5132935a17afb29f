use std::sync::Arc;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    orion_bridge::{CurrentExeHost, MethodRegistry},
    orion_chat::{ChatStore, MessageCreated, Sender},
    orion_protocol::MethodCall,
    orion_responder::Responder,
};

#[derive(Parser)]
#[command(name = "orion", about = "Orion chat companion gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    // Gateway arguments (used when no subcommand is provided, or with `serve`)
    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Custom config directory (overrides default ~/.config/orion/).
    #[arg(long, global = true, env = "ORION_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,
    /// Custom data directory (overrides default data dir).
    #[arg(long, global = true, env = "ORION_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server (default when no subcommand is provided).
    Serve,
    /// Chat management.
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// Invoke a bridge method locally and print the outcome.
    Call {
        /// Method name (e.g. getApkPath).
        method: String,
        /// Optional JSON params.
        #[arg(long)]
        params: Option<String>,
    },
}

#[derive(Subcommand)]
enum ChatAction {
    /// Send a user message and print the agent's reply.
    Send {
        /// Chat id to post into.
        #[arg(long, default_value = "main")]
        chat: String,
        #[arg(short, long)]
        message: String,
    },
    /// Print a chat's history.
    History { chat: String },
    /// Delete a chat.
    Clear { chat: String },
    /// List all chats.
    List,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    // Apply directory overrides before anything loads config or opens the store.
    if let Some(ref dir) = cli.config_dir {
        orion_config::set_config_dir(dir.clone());
    }
    if let Some(ref dir) = cli.data_dir {
        orion_config::set_data_dir(dir.clone());
    }

    match cli.command {
        // Default: start the gateway when no subcommand is provided.
        None | Some(Commands::Serve) => {
            info!(version = env!("CARGO_PKG_VERSION"), "orion starting");

            let config = orion_config::discover_and_load();
            let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
            let port = cli.port.unwrap_or(config.server.port);

            orion_gateway::start_gateway(config, &bind, port).await
        },
        Some(Commands::Chat { action }) => handle_chat(action).await,
        Some(Commands::Call { method, params }) => handle_call(&method, params.as_deref()).await,
    }
}

fn open_store() -> Arc<ChatStore> {
    Arc::new(ChatStore::new(orion_config::data_dir()))
}

async fn handle_chat(action: ChatAction) -> anyhow::Result<()> {
    let store = open_store();

    match action {
        ChatAction::Send { chat, message } => {
            let config = orion_config::discover_and_load();
            let responder = match config.responder.ack_text {
                Some(text) => Responder::new(Arc::clone(&store)).with_ack_text(text),
                None => Responder::new(Arc::clone(&store)),
            };

            let stored = store.append(&chat, Sender::User, message).await?;
            let event = MessageCreated {
                chat_id: chat.clone(),
                message: stored,
            };
            if let Some(pending) = responder.handle_created(&event) {
                let reply = pending.await??;
                println!("{}: {}", reply.sender, reply.text);
            }
        },
        ChatAction::History { chat } => {
            let msgs = store.history(&chat).await?;
            if msgs.is_empty() {
                println!("No messages in '{chat}'.");
            } else {
                for msg in &msgs {
                    println!("[{}] {}: {}", msg.timestamp, msg.sender, msg.text);
                }
            }
        },
        ChatAction::Clear { chat } => {
            store.clear(&chat).await?;
            println!("Cleared chat '{chat}'.");
        },
        ChatAction::List => {
            let chats = store.list_chats();
            if chats.is_empty() {
                println!("No chats found.");
            } else {
                for id in &chats {
                    println!("  {id}");
                }
            }
        },
    }

    Ok(())
}

async fn handle_call(method: &str, params: Option<&str>) -> anyhow::Result<()> {
    let registry = MethodRegistry::new(Arc::new(CurrentExeHost));

    let mut call = MethodCall::new("cli", method);
    if let Some(raw) = params {
        call.params = Some(serde_json::from_str(raw)?);
    }

    let outcome = registry.dispatch(call).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
