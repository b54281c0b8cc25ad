use std::collections::HashMap;

use tracing::{debug, error};

use crate::chat_session_store::ChatSessionStore;
use crate::error::Result;
use crate::live::{Snapshot, Subscription};
use crate::models::{ChatSession, Message, SessionType};
use crate::query::Query;
use crate::store::{Store, StoreProvider};

use super::format_time;

/// One row of the session list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatListRow {
    pub id: String,
    pub name: String,
    pub session_type: SessionType,
    /// Text of the session's last message, if it can be found
    pub last_message: Option<String>,
    /// `HH:MM` of the session's last update
    pub time: String,
    pub unread_count: u32,
    pub avatar_url: Option<String>,
    pub is_online: bool,
}

enum Update {
    Sessions(Snapshot<ChatSession>),
    Messages(Snapshot<Message>),
}

/// Session list screen.
///
/// Follows both the sessions and the messages table, so a preview changes
/// when the message it points at is created or edited.
pub struct ChatListScreen {
    sessions: Option<Subscription<ChatSession>>,
    messages: Option<Subscription<Message>>,
    latest: Vec<ChatSession>,
    previews: HashMap<String, String>,
    rows: Vec<ChatListRow>,
    version: Option<u64>,
}

impl ChatListScreen {
    /// Subscribe to all sessions and messages and render the first snapshot.
    ///
    /// If the store is not available the screen stays loading.
    pub async fn mount(provider: &StoreProvider) -> Self {
        let mut screen = Self {
            sessions: None,
            messages: None,
            latest: Vec::new(),
            previews: HashMap::new(),
            rows: Vec::new(),
            version: None,
        };

        let store = match provider.get() {
            Ok(store) => store,
            Err(e) => {
                error!("Failed to mount chat list: {}", e);
                return screen;
            }
        };

        let (mut sessions, mut messages) = match subscribe(&store).await {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                error!("Failed to load chat sessions: {}", e);
                return screen;
            }
        };

        if let Some(snapshot) = messages.try_recv() {
            screen.apply(Update::Messages(snapshot));
        }
        if let Some(snapshot) = sessions.try_recv() {
            screen.apply(Update::Sessions(snapshot));
        }
        screen.sessions = Some(sessions);
        screen.messages = Some(messages);

        screen
    }

    /// True until the first sessions snapshot has been rendered
    pub fn is_loading(&self) -> bool {
        self.version.is_none()
    }

    pub fn rows(&self) -> &[ChatListRow] {
        &self.rows
    }

    /// Newest commit version the rows reflect
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Wait for the next snapshot of either table and re-render.
    ///
    /// Returns `false` when there is nothing left to wait for.
    pub async fn next_frame(&mut self) -> bool {
        let (Some(sessions), Some(messages)) = (self.sessions.as_mut(), self.messages.as_mut())
        else {
            return false;
        };

        let update = tokio::select! {
            Some(snapshot) = sessions.recv() => Update::Sessions(snapshot),
            Some(snapshot) = messages.recv() => Update::Messages(snapshot),
            else => return false,
        };

        self.apply(update);
        true
    }

    /// Stop listening for changes
    pub fn unmount(mut self) {
        if let Some(subscription) = self.sessions.take() {
            subscription.unsubscribe();
        }
        if let Some(subscription) = self.messages.take() {
            subscription.unsubscribe();
        }
        debug!("Chat list unmounted");
    }

    fn apply(&mut self, update: Update) {
        let version = match update {
            Update::Sessions(snapshot) => {
                self.latest = snapshot.records;
                snapshot.version
            }
            Update::Messages(snapshot) => {
                self.previews = snapshot
                    .records
                    .into_iter()
                    .map(|message| (message.id, message.text))
                    .collect();
                // Nothing to show before the first sessions snapshot
                if self.version.is_none() {
                    return;
                }
                snapshot.version
            }
        };

        self.rows = self
            .latest
            .iter()
            .map(|session| ChatListRow {
                id: session.id.clone(),
                name: session.name.clone(),
                session_type: session.session_type,
                last_message: session
                    .last_message_id
                    .as_ref()
                    .and_then(|id| self.previews.get(id).cloned()),
                time: format_time(session.updated_at),
                unread_count: session.unread_count,
                avatar_url: session.avatar_url.clone(),
                is_online: session.is_online,
            })
            .collect();
        self.version = Some(self.version.map_or(version, |v| v.max(version)));

        debug!(
            "Chat list rendered {} rows at version {}",
            self.rows.len(),
            version
        );
    }
}

async fn subscribe(
    store: &Store,
) -> Result<(Subscription<ChatSession>, Subscription<Message>)> {
    let sessions = ChatSessionStore::new(store.clone()).observe_sessions().await?;
    let messages = store.observe(Query::<Message>::all()).await?;
    Ok((sessions, messages))
}
