//! Messages

use std::fmt;
use std::str::FromStr;

use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::entities::messages;
use crate::error::{Result, StoreError};
use crate::record::{ColumnOf, Record, Table};

/// Delivery status. Only `Sent` is ever assigned by this crate's send flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sent" => Ok(MessageStatus::Sent),
            "delivered" => Ok(MessageStatus::Delivered),
            "read" => Ok(MessageStatus::Read),
            other => Err(other.to_string()),
        }
    }
}

/// Attached media kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Document => "document",
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            "document" => Ok(MediaType::Document),
            other => Err(other.to_string()),
        }
    }
}

/// A message in a chat session.
///
/// `sender_id`, `chat_session_id` and `reply_to_message_id` are references by
/// convention only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender_id: String,
    pub chat_session_id: String,
    pub status: MessageStatus,
    pub timestamp: i64,
    pub reply_to_message_id: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<MediaType>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Message {
    /// Whether `user_id` wrote this message
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender_id == user_id
    }
}

impl Record for Message {
    type Entity = messages::Entity;
    type Model = messages::Model;
    type ActiveModel = messages::ActiveModel;

    const TABLE: Table = Table::Messages;

    fn id_column() -> ColumnOf<Self> {
        messages::Column::Id
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn stamp(&mut self, created_at: i64, updated_at: i64) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }

    fn from_model(model: messages::Model) -> Result<Self> {
        let status = model.status.parse().map_err(|value| StoreError::Decode {
            table: Table::Messages,
            column: "status",
            value,
        })?;
        let media_type = model
            .media_type
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|value| StoreError::Decode {
                table: Table::Messages,
                column: "media_type",
                value,
            })?;

        Ok(Self {
            id: model.id,
            text: model.text,
            sender_id: model.sender_id,
            chat_session_id: model.chat_session_id,
            status,
            timestamp: model.timestamp,
            reply_to_message_id: model.reply_to_message_id,
            media_url: model.media_url,
            media_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn into_active(self) -> messages::ActiveModel {
        messages::ActiveModel {
            id: Set(self.id),
            text: Set(self.text),
            sender_id: Set(self.sender_id),
            chat_session_id: Set(self.chat_session_id),
            status: Set(self.status.as_str().to_string()),
            timestamp: Set(self.timestamp),
            reply_to_message_id: Set(self.reply_to_message_id),
            media_url: Set(self.media_url),
            media_type: Set(self.media_type.map(|m| m.as_str().to_string())),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_a_decode_error() {
        let model = messages::Model {
            id: "m1".to_string(),
            text: "hi".to_string(),
            sender_id: "u1".to_string(),
            chat_session_id: "1".to_string(),
            status: "bounced".to_string(),
            timestamp: 0,
            reply_to_message_id: None,
            media_url: None,
            media_type: None,
            created_at: 0,
            updated_at: 0,
        };

        match Message::from_model(model) {
            Err(StoreError::Decode { column, value, .. }) => {
                assert_eq!(column, "status");
                assert_eq!(value, "bounced");
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_media_type_column_text() {
        assert_eq!("video".parse::<MediaType>(), Ok(MediaType::Video));
        assert_eq!(MediaType::Document.as_str(), "document");
    }
}
