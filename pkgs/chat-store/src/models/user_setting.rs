//! Per-user key/value settings

use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::entities::user_settings;
use crate::error::Result;
use crate::record::{ColumnOf, Record, Table};

/// A setting row. `user_id == None` marks an application-wide setting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSetting {
    pub id: String,
    pub key: String,
    pub value: String,
    pub user_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record for UserSetting {
    type Entity = user_settings::Entity;
    type Model = user_settings::Model;
    type ActiveModel = user_settings::ActiveModel;

    const TABLE: Table = Table::UserSettings;

    fn id_column() -> ColumnOf<Self> {
        user_settings::Column::Id
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

    fn from_model(model: user_settings::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            key: model.key,
            value: model.value,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn into_active(self) -> user_settings::ActiveModel {
        user_settings::ActiveModel {
            id: Set(self.id),
            key: Set(self.key),
            value: Set(self.value),
            user_id: Set(self.user_id),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}
