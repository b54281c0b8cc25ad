//! Sea-ORM entities for chat-store

pub mod chat_participants;
pub mod chat_sessions;
pub mod messages;
pub mod user_settings;
pub mod users;

pub use chat_participants::Entity as ChatParticipants;
pub use chat_sessions::Entity as ChatSessions;
pub use messages::Entity as Messages;
pub use user_settings::Entity as UserSettings;
pub use users::Entity as Users;
