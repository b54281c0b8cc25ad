//! Sample data for a fresh database: six users, six sessions and the
//! conversation history shown on first launch.

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{ChatSession, Message, MessageStatus, SessionType, User};
use crate::query::Query;
use crate::record::now_millis;
use crate::store::Store;

const MINUTE: i64 = 60 * 1000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

struct SeedUser {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    online: bool,
}

#[rustfmt::skip]
const USERS: &[SeedUser] = &[
    SeedUser { id: "user1", name: "张三", email: "zhangsan@example.com", online: true },
    SeedUser { id: "user2", name: "李四", email: "lisi@example.com", online: false },
    SeedUser { id: "user3", name: "王五", email: "wangwu@example.com", online: true },
    SeedUser { id: "user4", name: "赵六", email: "zhaoliu@example.com", online: false },
    SeedUser { id: "user5", name: "微信群聊", email: "groupchat@example.com", online: true },
    SeedUser { id: "user6", name: "工作群", email: "workgroup@example.com", online: true },
];

struct SeedSession {
    id: &'static str,
    name: &'static str,
    session_type: SessionType,
    last_message_id: &'static str,
    unread_count: u32,
    online: bool,
}

#[rustfmt::skip]
const SESSIONS: &[SeedSession] = &[
    SeedSession { id: "1", name: "张三", session_type: SessionType::Direct, last_message_id: "11", unread_count: 3, online: true },
    SeedSession { id: "2", name: "李四", session_type: SessionType::Direct, last_message_id: "2", unread_count: 0, online: false },
    SeedSession { id: "3", name: "王五", session_type: SessionType::Direct, last_message_id: "3", unread_count: 1, online: true },
    SeedSession { id: "4", name: "赵六", session_type: SessionType::Direct, last_message_id: "4", unread_count: 0, online: false },
    SeedSession { id: "5", name: "微信群聊", session_type: SessionType::Group, last_message_id: "5", unread_count: 5, online: true },
    SeedSession { id: "6", name: "工作群", session_type: SessionType::Group, last_message_id: "6", unread_count: 0, online: true },
];

/// Sender placeholder replaced by the current user's id
const ME: &str = "";

struct SeedMessage {
    id: &'static str,
    text: &'static str,
    sender: &'static str,
    session: &'static str,
    status: MessageStatus,
    age: i64,
}

#[rustfmt::skip]
const MESSAGES: &[SeedMessage] = &[
    SeedMessage { id: "1", text: "今天晚上一起吃饭吗？", sender: "user1", session: "1", status: MessageStatus::Read, age: HOUR },
    SeedMessage { id: "2", text: "好的，收到", sender: "user2", session: "2", status: MessageStatus::Read, age: 2 * HOUR },
    SeedMessage { id: "3", text: "会议纪要已发送", sender: "user3", session: "3", status: MessageStatus::Read, age: 3 * HOUR },
    SeedMessage { id: "4", text: "周末有空吗？", sender: "user4", session: "4", status: MessageStatus::Delivered, age: DAY },
    SeedMessage { id: "5", text: "小明: 大家注意看这个...", sender: "user5", session: "5", status: MessageStatus::Read, age: DAY },
    SeedMessage { id: "6", text: "老板: 明天会议时间调整", sender: "user6", session: "6", status: MessageStatus::Read, age: 2 * DAY },
    SeedMessage { id: "7", text: "还不错，谢谢！你在忙什么？", sender: ME, session: "1", status: MessageStatus::Read, age: 58 * MINUTE + 20 * 1000 },
    SeedMessage { id: "8", text: "在计划周末的活动，你想一起去爬山吗？", sender: "user1", session: "1", status: MessageStatus::Read, age: 56 * MINUTE + 40 * 1000 },
    SeedMessage { id: "9", text: "听起来不错！几点出发？", sender: ME, session: "1", status: MessageStatus::Read, age: 55 * MINUTE },
    SeedMessage { id: "10", text: "早上8点，在市中心集合怎么样？", sender: "user1", session: "1", status: MessageStatus::Read, age: 53 * MINUTE + 20 * 1000 },
    SeedMessage { id: "11", text: "好的，没问题！到时候见", sender: ME, session: "1", status: MessageStatus::Read, age: 51 * MINUTE + 40 * 1000 },
];

/// Populate an empty store with sample users, sessions and messages.
///
/// Messages marked as sent by the local user get `current_user_id` as
/// sender. Does nothing and returns `false` when any chat session already
/// exists; otherwise everything is written in a single transaction.
pub async fn seed_sample_data(store: &Store, current_user_id: &str) -> Result<bool> {
    let mut txn = store.begin_write().await?;

    let existing = txn.query(&Query::<ChatSession>::all().limit(1)).await?;
    if !existing.is_empty() {
        debug!("Store already has chat sessions, skipping sample data");
        txn.rollback().await?;
        return Ok(false);
    }

    for seed in USERS {
        txn.create(|user: &mut User| {
            user.id = seed.id.to_string();
            user.name = seed.name.to_string();
            user.email = Some(seed.email.to_string());
            user.is_online = seed.online;
        })
        .await?;
    }

    for seed in SESSIONS {
        txn.create(|session: &mut ChatSession| {
            session.id = seed.id.to_string();
            session.name = seed.name.to_string();
            session.session_type = seed.session_type;
            session.last_message_id = Some(seed.last_message_id.to_string());
            session.unread_count = seed.unread_count;
            session.is_online = seed.online;
        })
        .await?;
    }

    let now = now_millis();
    for seed in MESSAGES {
        let sender = if seed.sender == ME {
            current_user_id
        } else {
            seed.sender
        };

        txn.create(|message: &mut Message| {
            message.id = seed.id.to_string();
            message.text = seed.text.to_string();
            message.sender_id = sender.to_string();
            message.chat_session_id = seed.session.to_string();
            message.status = seed.status;
            message.timestamp = now - seed.age;
        })
        .await?;
    }

    txn.commit().await?;

    info!(
        "Seeded {} users, {} sessions and {} messages",
        USERS.len(),
        SESSIONS.len(),
        MESSAGES.len()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_one_thread_is_newest_last() {
        let mut thread: Vec<&SeedMessage> =
            MESSAGES.iter().filter(|m| m.session == "1").collect();
        thread.sort_by_key(|m| m.age);

        assert_eq!(thread.len(), 6);
        assert_eq!(thread[0].id, "11");
        assert_eq!(thread[5].id, "1");
    }

    #[test]
    fn test_sessions_point_at_seeded_messages() {
        for session in SESSIONS {
            let message = MESSAGES
                .iter()
                .find(|m| m.id == session.last_message_id)
                .unwrap();
            assert_eq!(message.session, session.id);
        }
    }
}
