//! The typed table abstraction shared by every record kind

use std::fmt;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, FromQueryResult, IntoActiveModel,
    ModelTrait,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The five tables of the local store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    Users,
    ChatSessions,
    Messages,
    ChatParticipants,
    UserSettings,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Users,
        Table::ChatSessions,
        Table::Messages,
        Table::ChatParticipants,
        Table::UserSettings,
    ];

    /// SQL table name
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::ChatSessions => "chat_sessions",
            Table::Messages => "messages",
            Table::ChatParticipants => "chat_participants",
            Table::UserSettings => "user_settings",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column type of a record's entity
pub type ColumnOf<R> = <<R as Record>::Entity as EntityTrait>::Column;

/// A domain value stored as one row of a [`Table`].
///
/// Every record carries a string id and client-assigned `created_at` /
/// `updated_at` millisecond timestamps. The store owns both timestamps:
/// `stamp` is called on create and on every update, with `created_at`
/// carried over from the stored version.
pub trait Record: Clone + PartialEq + fmt::Debug + Default + Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, ActiveModel = Self::ActiveModel>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + 'static;

    const TABLE: Table;

    fn id_column() -> ColumnOf<Self>;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn created_at(&self) -> i64;

    fn stamp(&mut self, created_at: i64, updated_at: i64);

    fn from_model(model: Self::Model) -> Result<Self>;

    fn into_active(self) -> Self::ActiveModel;
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
