//! Chat sessions (one row per conversation in the session list)

use std::fmt;
use std::str::FromStr;

use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::entities::chat_sessions;
use crate::error::{Result, StoreError};
use crate::record::{ColumnOf, Record, Table};

/// Session type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Direct,
    Group,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Direct => "direct",
            SessionType::Group => "group",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "direct" => Ok(SessionType::Direct),
            "group" => Ok(SessionType::Group),
            other => Err(other.to_string()),
        }
    }
}

/// Chat session.
///
/// `last_message_id` is a weak reference: nothing checks that the message
/// exists or belongs to this session. `unread_count` is a counter maintained
/// only through explicit increment/reset calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub name: String,
    pub session_type: SessionType,
    pub last_message_id: Option<String>,
    pub unread_count: u32,
    pub is_archived: bool,
    pub is_muted: bool,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record for ChatSession {
    type Entity = chat_sessions::Entity;
    type Model = chat_sessions::Model;
    type ActiveModel = chat_sessions::ActiveModel;

    const TABLE: Table = Table::ChatSessions;

    fn id_column() -> ColumnOf<Self> {
        chat_sessions::Column::Id
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

    fn from_model(model: chat_sessions::Model) -> Result<Self> {
        let session_type =
            model
                .session_type
                .parse()
                .map_err(|value| StoreError::Decode {
                    table: Table::ChatSessions,
                    column: "type",
                    value,
                })?;

        Ok(Self {
            id: model.id,
            name: model.name,
            session_type,
            last_message_id: model.last_message_id,
            // Out-of-range counts can only come from outside writers
            unread_count: u32::try_from(model.unread_count.max(0)).unwrap_or(u32::MAX),
            is_archived: model.is_archived,
            is_muted: model.is_muted,
            avatar_url: model.avatar_url,
            is_online: model.is_online,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn into_active(self) -> chat_sessions::ActiveModel {
        chat_sessions::ActiveModel {
            id: Set(self.id),
            name: Set(self.name),
            session_type: Set(self.session_type.as_str().to_string()),
            last_message_id: Set(self.last_message_id),
            unread_count: Set(i64::from(self.unread_count)),
            is_archived: Set(self.is_archived),
            is_muted: Set(self.is_muted),
            avatar_url: Set(self.avatar_url),
            is_online: Set(self.is_online),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_type_round_trips_through_column_text() {
        for ty in [SessionType::Direct, SessionType::Group] {
            assert_eq!(ty.as_str().parse::<SessionType>().unwrap(), ty);
        }
        assert_eq!("channel".parse::<SessionType>(), Err("channel".to_string()));
    }

    #[test]
    fn test_negative_unread_count_decodes_as_zero() {
        let model = chat_sessions::Model {
            id: "s".to_string(),
            name: "S".to_string(),
            session_type: "group".to_string(),
            last_message_id: None,
            unread_count: -4,
            is_archived: false,
            is_muted: false,
            avatar_url: None,
            is_online: false,
            created_at: 1,
            updated_at: 2,
        };

        let session = ChatSession::from_model(model).unwrap();
        assert_eq!(session.unread_count, 0);
        assert_eq!(session.session_type, SessionType::Group);
    }

    #[test]
    fn test_unread_count_keeps_full_u32_range() {
        let session = ChatSession {
            unread_count: u32::MAX,
            ..Default::default()
        };
        let model = chat_sessions::Model {
            id: "s".to_string(),
            name: String::new(),
            session_type: "direct".to_string(),
            last_message_id: None,
            unread_count: i64::from(u32::MAX) + 10,
            is_archived: false,
            is_muted: false,
            avatar_url: None,
            is_online: false,
            created_at: 0,
            updated_at: 0,
        };

        assert_eq!(session.into_active().unread_count.unwrap(), i64::from(u32::MAX));
        assert_eq!(ChatSession::from_model(model).unwrap().unread_count, u32::MAX);
    }
}
