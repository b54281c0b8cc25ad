//! Domain records stored in the five tables

mod chat_participant;
mod chat_session;
mod message;
mod user;
mod user_setting;

pub use chat_participant::{ChatParticipant, ParticipantRole};
pub use chat_session::{ChatSession, SessionType};
pub use message::{MediaType, Message, MessageStatus};
pub use user::User;
pub use user_setting::UserSetting;
