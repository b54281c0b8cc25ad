//! Chat session entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub session_type: String, // "direct" or "group"
    pub last_message_id: Option<String>, // not a foreign key, may point at nothing
    pub unread_count: i64, // holds every u32
    pub is_archived: bool,
    pub is_muted: bool,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
