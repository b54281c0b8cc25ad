//! Session membership

use std::fmt;
use std::str::FromStr;

use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::entities::chat_participants;
use crate::error::Result;
use crate::record::{ColumnOf, Record, Table};

/// Role of a participant. Unknown roles are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Admin,
    #[default]
    Member,
    Other(String),
}

impl ParticipantRole {
    pub fn as_str(&self) -> &str {
        match self {
            ParticipantRole::Admin => "admin",
            ParticipantRole::Member => "member",
            ParticipantRole::Other(role) => role,
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipantRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "admin" => ParticipantRole::Admin,
            "member" => ParticipantRole::Member,
            other => ParticipantRole::Other(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatParticipant {
    pub id: String,
    pub chat_session_id: String,
    pub user_id: String,
    pub role: ParticipantRole,
    pub joined_at: i64,
    pub left_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ChatParticipant {
    pub fn is_active(&self) -> bool {
        self.left_at.is_none()
    }
}

impl Record for ChatParticipant {
    type Entity = chat_participants::Entity;
    type Model = chat_participants::Model;
    type ActiveModel = chat_participants::ActiveModel;

    const TABLE: Table = Table::ChatParticipants;

    fn id_column() -> ColumnOf<Self> {
        chat_participants::Column::Id
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

    fn from_model(model: chat_participants::Model) -> Result<Self> {
        let role = match model.role.as_deref() {
            Some(role) => role.parse().unwrap_or_default(),
            None => ParticipantRole::Member,
        };

        Ok(Self {
            id: model.id,
            chat_session_id: model.chat_session_id,
            user_id: model.user_id,
            role,
            joined_at: model.joined_at,
            left_at: model.left_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn into_active(self) -> chat_participants::ActiveModel {
        chat_participants::ActiveModel {
            id: Set(self.id),
            chat_session_id: Set(self.chat_session_id),
            user_id: Set(self.user_id),
            role: Set(Some(self.role.as_str().to_string())),
            joined_at: Set(self.joined_at),
            left_at: Set(self.left_at),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_roles_are_preserved() {
        let role: ParticipantRole = "moderator".parse().unwrap();
        assert_eq!(role, ParticipantRole::Other("moderator".to_string()));
        assert_eq!(role.as_str(), "moderator");
        assert_eq!("admin".parse::<ParticipantRole>().unwrap(), ParticipantRole::Admin);
    }
}
