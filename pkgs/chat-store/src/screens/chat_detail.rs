use tracing::{debug, error};

use crate::live::{Snapshot, Subscription};
use crate::message_store::MessageStore;
use crate::models::{Message, MessageStatus};
use crate::store::StoreProvider;

use super::format_time;

/// Who wrote a message, relative to the local user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Me,
    Other,
}

/// One bubble of the message thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub status: MessageStatus,
    /// `HH:MM` of the message timestamp
    pub time: String,
}

impl MessageRow {
    fn from_message(message: Message, current_user_id: &str) -> Self {
        let sender = if message.is_from(current_user_id) {
            Sender::Me
        } else {
            Sender::Other
        };

        Self {
            time: format_time(message.timestamp),
            id: message.id,
            text: message.text,
            sender,
            status: message.status,
        }
    }
}

/// Message thread of one chat session, newest first
pub struct ChatDetailScreen {
    chat_id: String,
    current_user_id: String,
    messages: Option<MessageStore>,
    subscription: Option<Subscription<Message>>,
    rows: Vec<MessageRow>,
    version: Option<u64>,
    input: String,
}

impl ChatDetailScreen {
    /// Subscribe to the thread of `chat_id`, attributing messages sent by
    /// `current_user_id` to [`Sender::Me`].
    pub async fn mount(provider: &StoreProvider, chat_id: &str, current_user_id: &str) -> Self {
        let mut screen = Self {
            chat_id: chat_id.to_string(),
            current_user_id: current_user_id.to_string(),
            messages: None,
            subscription: None,
            rows: Vec::new(),
            version: None,
            input: String::new(),
        };

        let store = match provider.get() {
            Ok(store) => store,
            Err(e) => {
                error!("Failed to mount chat {}: {}", chat_id, e);
                return screen;
            }
        };

        let messages = MessageStore::new(store);
        match messages.observe_session(chat_id).await {
            Ok(mut subscription) => {
                if let Some(snapshot) = subscription.try_recv() {
                    screen.apply(snapshot);
                }
                screen.messages = Some(messages);
                screen.subscription = Some(subscription);
            }
            Err(e) => error!("Failed to load messages of chat {}: {}", chat_id, e),
        }

        screen
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn is_loading(&self) -> bool {
        self.version.is_none()
    }

    pub fn rows(&self) -> &[MessageRow] {
        &self.rows
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send the input buffer as a message.
    ///
    /// The buffer is cleared only when the message was stored. Returns
    /// whether it was.
    pub async fn send(&mut self) -> bool {
        let Some(messages) = self.messages.as_ref() else {
            error!("Cannot send to chat {}: store not available", self.chat_id);
            return false;
        };

        match messages
            .send(&self.chat_id, &self.current_user_id, &self.input)
            .await
        {
            Ok(message) => {
                debug!("Sent message {} from chat screen", message.id);
                self.input.clear();
                true
            }
            Err(e) => {
                error!("Failed to send message to chat {}: {}", self.chat_id, e);
                false
            }
        }
    }

    /// Wait for the next snapshot and re-render.
    ///
    /// Returns `false` when there is nothing left to wait for.
    pub async fn next_frame(&mut self) -> bool {
        let snapshot = match self.subscription.as_mut() {
            Some(subscription) => subscription.recv().await,
            None => return false,
        };

        match snapshot {
            Some(snapshot) => {
                self.apply(snapshot);
                true
            }
            None => false,
        }
    }

    /// Stop listening for changes
    pub fn unmount(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        debug!("Chat {} unmounted", self.chat_id);
    }

    fn apply(&mut self, snapshot: Snapshot<Message>) {
        let current_user_id = &self.current_user_id;
        self.rows = snapshot
            .records
            .into_iter()
            .map(|message| MessageRow::from_message(message, current_user_id))
            .collect();
        self.version = Some(snapshot.version);
    }
}
