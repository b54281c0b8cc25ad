//! Users

use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::entities::users;
use crate::error::Result;
use crate::record::{ColumnOf, Record, Table};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record for User {
    type Entity = users::Entity;
    type Model = users::Model;
    type ActiveModel = users::ActiveModel;

    const TABLE: Table = Table::Users;

    fn id_column() -> ColumnOf<Self> {
        users::Column::Id
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

    fn from_model(model: users::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            avatar_url: model.avatar_url,
            is_online: model.is_online,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn into_active(self) -> users::ActiveModel {
        users::ActiveModel {
            id: Set(self.id),
            name: Set(self.name),
            email: Set(self.email),
            avatar_url: Set(self.avatar_url),
            is_online: Set(self.is_online),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}
