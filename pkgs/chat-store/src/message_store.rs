//! Message store - message threads and the send flow

use tracing::debug;

use crate::entities::messages;
use crate::error::{Result, StoreError};
use crate::live::Subscription;
use crate::models::{Message, MessageStatus};
use crate::query::{Query, SortOrder};
use crate::record::now_millis;
use crate::store::Store;

/// Message store
#[derive(Clone)]
pub struct MessageStore {
    store: Store,
}

impl MessageStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Messages of one session, newest first
    pub fn session_query(chat_session_id: &str) -> Query<Message> {
        Query::all()
            .filter(messages::Column::ChatSessionId, chat_session_id)
            .sort_by(messages::Column::Timestamp, SortOrder::Desc)
    }

    /// Send a text message from `sender_id` into a session.
    ///
    /// Whitespace-only text is rejected with [`StoreError::Validation`] and
    /// nothing is written. The session's `last_message_id` and
    /// `unread_count` are left untouched.
    pub async fn send(
        &self,
        chat_session_id: &str,
        sender_id: &str,
        text: &str,
    ) -> Result<Message> {
        if text.trim().is_empty() {
            return Err(StoreError::Validation(
                "message text must not be empty".to_string(),
            ));
        }

        let mut txn = self.store.begin_write().await?;
        let message = txn
            .create(|message: &mut Message| {
                message.text = text.to_string();
                message.sender_id = sender_id.to_string();
                message.chat_session_id = chat_session_id.to_string();
                message.status = MessageStatus::Sent;
                message.timestamp = now_millis();
            })
            .await?;
        txn.commit().await?;

        debug!("Sent message {} to session {}", message.id, chat_session_id);
        Ok(message)
    }

    /// Store an arbitrary message, e.g. one with media or a reply reference
    pub async fn create_message<F>(&self, init: F) -> Result<Message>
    where
        F: FnOnce(&mut Message) + Send,
    {
        self.store.create(init).await
    }

    /// Get message by ID
    pub async fn get_message(&self, id: &str) -> Result<Message> {
        self.store.find(id).await
    }

    /// Messages of one session, newest first
    pub async fn get_session_messages(&self, chat_session_id: &str) -> Result<Vec<Message>> {
        let messages = self
            .store
            .query(&Self::session_query(chat_session_id))
            .await?;

        debug!(
            "Retrieved {} messages from session {}",
            messages.len(),
            chat_session_id
        );
        Ok(messages)
    }

    /// Live thread of one session, newest first
    pub async fn observe_session(&self, chat_session_id: &str) -> Result<Subscription<Message>> {
        self.store
            .observe(Self::session_query(chat_session_id))
            .await
    }

    /// Replies to a message
    pub async fn get_replies(&self, message_id: &str) -> Result<Vec<Message>> {
        let query = Query::all()
            .filter(messages::Column::ReplyToMessageId, message_id)
            .sort_by(messages::Column::Timestamp, SortOrder::Asc);
        self.store.query(&query).await
    }
}
