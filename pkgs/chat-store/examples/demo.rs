use std::path::PathBuf;

use chat_store::screens::{ChatDetailScreen, ChatListScreen, Sender};
use chat_store::seed::seed_sample_data;
use chat_store::settings_manager::{SettingsManager, CURRENT_USER_ID_KEY};
use chat_store::{StoreConfig, StoreProvider};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Seed a chat store and drive both screens", long_about = None)]
struct Args {
    /// Database file (a temporary file when omitted)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// Id of the local user
    #[arg(short, long, default_value = "me")]
    user: String,

    /// Session to open
    #[arg(short, long, default_value = "1")]
    chat: String,

    /// Text to send
    #[arg(short, long, default_value = "到时候见！")]
    message: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();

    let temp_dir = tempfile::tempdir()?;
    let db_path = args
        .db
        .unwrap_or_else(|| temp_dir.path().join("chat-demo.db"));

    let provider = StoreProvider::new();
    let store = provider.init(StoreConfig::new(&db_path)).await?;

    SettingsManager::new(store.clone())
        .set(None, CURRENT_USER_ID_KEY, &args.user)
        .await?;
    if seed_sample_data(&store, &args.user).await? {
        info!("Seeded sample data into {}", db_path.display());
    }

    let list = ChatListScreen::mount(&provider).await;
    println!("Chats:");
    for row in list.rows() {
        println!(
            "  [{}] {:<8} {:>5}  {}  ({} unread)",
            row.id,
            row.name,
            row.time,
            row.last_message.as_deref().unwrap_or("Loading..."),
            row.unread_count
        );
    }

    let mut chat = ChatDetailScreen::mount(&provider, &args.chat, &args.user).await;
    chat.set_input(args.message);
    if chat.send().await {
        chat.next_frame().await;
    }

    println!("\nChat {} (newest first):", chat.chat_id());
    for row in chat.rows() {
        let who = match row.sender {
            Sender::Me => "me",
            Sender::Other => "them",
        };
        println!("  {} {:<4} {}", row.time, who, row.text);
    }

    chat.unmount();
    list.unmount();
    Ok(())
}
