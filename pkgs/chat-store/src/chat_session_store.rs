//! Chat session store - session list metadata, last message pointer and unread counter

use tracing::{debug, info};

use crate::entities::chat_sessions;
use crate::error::Result;
use crate::live::Subscription;
use crate::models::ChatSession;
use crate::query::{Query, SortOrder};
use crate::store::Store;

/// Chat session store
#[derive(Clone)]
pub struct ChatSessionStore {
    store: Store,
}

impl ChatSessionStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The query behind the session list screen
    pub fn all_sessions_query() -> Query<ChatSession> {
        Query::all()
    }

    /// Create a session
    pub async fn create_session<F>(&self, init: F) -> Result<ChatSession>
    where
        F: FnOnce(&mut ChatSession) + Send,
    {
        let session = self.store.create(init).await?;
        info!("Created chat session '{}' ({})", session.name, session.id);
        Ok(session)
    }

    /// Get all chat sessions
    pub async fn get_sessions(&self) -> Result<Vec<ChatSession>> {
        self.store.query(&Self::all_sessions_query()).await
    }

    /// Sessions that are not archived, most recently updated first
    pub async fn get_active_sessions(&self) -> Result<Vec<ChatSession>> {
        let query = Query::all()
            .filter(chat_sessions::Column::IsArchived, false)
            .sort_by(chat_sessions::Column::UpdatedAt, SortOrder::Desc);
        self.store.query(&query).await
    }

    /// Get a single session by id
    pub async fn get_session(&self, id: &str) -> Result<ChatSession> {
        self.store.find(id).await
    }

    /// Live list of all sessions
    pub async fn observe_sessions(&self) -> Result<Subscription<ChatSession>> {
        self.store.observe(Self::all_sessions_query()).await
    }

    /// Point the session at its newest message.
    ///
    /// The message id is stored as given; it is not checked against the
    /// messages table.
    pub async fn update_last_message(&self, id: &str, message_id: &str) -> Result<ChatSession> {
        let session = self
            .store
            .update_by_id(id, |session: &mut ChatSession| {
                session.last_message_id = Some(message_id.to_string());
            })
            .await?;

        debug!("Session {} last message -> {}", id, message_id);
        Ok(session)
    }

    /// Increment the unread counter by one, saturating at `u32::MAX`
    pub async fn increment_unread(&self, id: &str) -> Result<ChatSession> {
        let session = self
            .store
            .update_by_id(id, |session: &mut ChatSession| {
                session.unread_count = session.unread_count.saturating_add(1);
            })
            .await?;

        debug!("Session {} unread count -> {}", id, session.unread_count);
        Ok(session)
    }

    /// Reset the unread counter to zero
    pub async fn reset_unread(&self, id: &str) -> Result<ChatSession> {
        let session = self
            .store
            .update_by_id(id, |session: &mut ChatSession| {
                session.unread_count = 0;
            })
            .await?;

        debug!("Session {} marked as read", id);
        Ok(session)
    }

    pub async fn set_archived(&self, id: &str, archived: bool) -> Result<ChatSession> {
        self.store
            .update_by_id(id, |session: &mut ChatSession| {
                session.is_archived = archived;
            })
            .await
    }

    pub async fn set_muted(&self, id: &str, muted: bool) -> Result<ChatSession> {
        self.store
            .update_by_id(id, |session: &mut ChatSession| {
                session.is_muted = muted;
            })
            .await
    }
}
