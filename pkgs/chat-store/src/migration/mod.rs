//! Sea-ORM migrations for the chat-store schema

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_chat_sessions_table;
mod m20250301_000003_create_messages_table;
mod m20250301_000004_create_chat_participants_table;
mod m20250301_000005_create_user_settings_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_chat_sessions_table::Migration),
            Box::new(m20250301_000003_create_messages_table::Migration),
            Box::new(m20250301_000004_create_chat_participants_table::Migration),
            Box::new(m20250301_000005_create_user_settings_table::Migration),
        ]
    }
}
