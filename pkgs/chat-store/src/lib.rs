//! Chat Store - local storage with live queries for a chat client
//!
//! This crate keeps users, chat sessions, messages, session participants and
//! user settings in a local SQLite database through Sea-ORM, and lets screens
//! subscribe to live query results that are re-delivered after every commit
//! that changes them.
//!
//! # Architecture
//!
//! - **Store**: typed create/find/update/query, scoped write transactions and
//!   live subscriptions ([`Store::observe`])
//! - **ChatSessionStore**: session list, last message pointer, unread counter
//! - **MessageStore**: message threads and the send flow
//! - **UserManager**: user records and presence flag
//! - **ParticipantManager**: session membership
//! - **SettingsManager**: key/value settings, global or per user
//! - **screens**: view-models for the session list and chat detail screens
//!
//! # Database Schema
//!
//! - `users`: name, email, avatar, online flag
//! - `chat_sessions`: direct/group sessions with unread count and last message id
//! - `messages`: text, sender, session, status, timestamp, reply/media fields
//! - `chat_participants`: membership rows with role and join/leave times
//! - `user_settings`: key/value pairs with optional user scope
//!
//! All rows carry a string id and `created_at`/`updated_at` in epoch
//! milliseconds. Cross-table ids are not enforced as foreign keys.
//!
//! # Concurrency
//!
//! Write transactions are serialized per store; reads see the most recently
//! committed state. Snapshots for one subscription arrive in commit order.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use chat_store::{MessageStore, Store, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::open(StoreConfig {
//!     db_path: "chat.db".into(),
//!     ..Default::default()
//! })
//! .await?;
//!
//! let messages = MessageStore::new(store.clone());
//! let mut thread = messages.observe_session("1").await?;
//! messages.send("1", "me", "Hello!").await?;
//!
//! while let Some(snapshot) = thread.recv().await {
//!     println!("{} messages", snapshot.records.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat_session_store;
pub mod entities;
pub mod error;
pub mod live;
pub mod message_store;
pub mod migration;
pub mod models;
pub mod participant_manager;
pub mod query;
pub mod record;
pub mod screens;
pub mod seed;
pub mod settings_manager;
pub mod store;
pub mod user_manager;

pub use chat_session_store::ChatSessionStore;
pub use error::{Result, StoreError};
pub use live::{Snapshot, Subscription, SubscriptionId};
pub use message_store::MessageStore;
pub use models::{
    ChatParticipant, ChatSession, MediaType, Message, MessageStatus, ParticipantRole,
    SessionType, User, UserSetting,
};
pub use participant_manager::ParticipantManager;
pub use query::{Query, SortOrder};
pub use record::{Record, Table};
pub use settings_manager::SettingsManager;
pub use store::{Store, StoreProvider, WriteTxn};
pub use user_manager::UserManager;

/// Configuration for the local store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file (created if missing)
    pub db_path: std::path::PathBuf,

    /// Connection pool size (default: 4)
    pub max_connections: u32,

    /// Log every SQL statement through sqlx (default: false)
    pub sqlx_logging: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::path::PathBuf::from("chat-store.db"),
            max_connections: 4,
            sqlx_logging: false,
        }
    }
}

impl StoreConfig {
    pub fn new(db_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }

    /// SQLite connection URL, opening read-write and creating the file
    pub fn database_url(&self) -> Result<String> {
        let db_path_str = self
            .db_path
            .to_str()
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "Invalid database path: {}",
                    self.db_path.display()
                ))
            })?
            .replace('\\', "/");

        Ok(format!("sqlite:{}?mode=rwc", db_path_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_normalizes_separators() {
        let config = StoreConfig::new(r"C:\data\chat.db");
        assert_eq!(config.database_url().unwrap(), "sqlite:C:/data/chat.db?mode=rwc");
        assert_eq!(config.max_connections, 4);
    }
}
