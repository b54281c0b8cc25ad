// Tests for ParticipantManager and UserManager

use chat_store::{
    ChatSession, ChatSessionStore, ParticipantManager, ParticipantRole, Store, StoreConfig,
    UserManager,
};
use tempfile::NamedTempFile;

async fn open_store(path: &NamedTempFile) -> Store {
    Store::open(StoreConfig::new(path.path()))
        .await
        .expect("Failed to open store")
}

#[tokio::test]
async fn test_join_and_list_participants() {
    let temp_file = NamedTempFile::new().unwrap();
    let manager = ParticipantManager::new(open_store(&temp_file).await);

    let admin = manager
        .join("s1", "user1", ParticipantRole::Admin)
        .await
        .unwrap();
    assert!(admin.is_active());
    assert!(admin.joined_at > 0);

    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    manager
        .join("s1", "user2", ParticipantRole::Member)
        .await
        .unwrap();
    manager
        .join("s2", "user3", ParticipantRole::Member)
        .await
        .unwrap();

    let participants = manager.get_participants("s1").await.unwrap();
    let users: Vec<&str> = participants.iter().map(|p| p.user_id.as_str()).collect();
    assert_eq!(users, vec!["user1", "user2"]);
    assert_eq!(participants[0].role, ParticipantRole::Admin);
}

#[tokio::test]
async fn test_join_twice_returns_existing_membership() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let manager = ParticipantManager::new(store.clone());

    let first = manager
        .join("s1", "user1", ParticipantRole::Member)
        .await
        .unwrap();
    let second = manager
        .join("s1", "user1", ParticipantRole::Admin)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(manager.get_participants("s1").await.unwrap().len(), 1);
    assert_eq!(store.version().await, 1);
}

#[tokio::test]
async fn test_leave_and_rejoin() {
    let temp_file = NamedTempFile::new().unwrap();
    let manager = ParticipantManager::new(open_store(&temp_file).await);

    let joined = manager
        .join("s1", "user1", ParticipantRole::Member)
        .await
        .unwrap();

    let left = manager.leave("s1", "user1").await.unwrap();
    assert_eq!(left.id, joined.id);
    assert!(left.left_at.is_some());
    assert!(manager.get_participants("s1").await.unwrap().is_empty());

    assert!(manager.leave("s1", "user1").await.unwrap_err().is_not_found());

    let rejoined = manager
        .join("s1", "user1", ParticipantRole::Other("moderator".to_string()))
        .await
        .unwrap();
    assert_eq!(rejoined.id, joined.id);
    assert!(rejoined.is_active());
    assert_eq!(rejoined.role.as_str(), "moderator");
}

#[tokio::test]
async fn test_sessions_for_user() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let sessions = ChatSessionStore::new(store.clone());
    let manager = ParticipantManager::new(store.clone());

    for (id, name) in [("s1", "Family"), ("s2", "Work"), ("s3", "Club")] {
        sessions
            .create_session(|s: &mut ChatSession| {
                s.id = id.to_string();
                s.name = name.to_string();
            })
            .await
            .unwrap();
    }

    manager.join("s1", "user1", ParticipantRole::Member).await.unwrap();
    manager.join("s2", "user1", ParticipantRole::Member).await.unwrap();
    manager.join("s3", "user2", ParticipantRole::Member).await.unwrap();
    // Membership of a session that does not exist
    manager.join("ghost", "user1", ParticipantRole::Member).await.unwrap();
    manager.leave("s2", "user1").await.unwrap();

    let found = manager.get_sessions_for_user("user1").await.unwrap();
    let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Family"]);
}

#[tokio::test]
async fn test_user_presence_and_rename() {
    let temp_file = NamedTempFile::new().unwrap();
    let users = UserManager::new(open_store(&temp_file).await);

    let bob = users.add("Bob", None).await.unwrap();
    let alice = users.add("Alice", Some("alice@example.com")).await.unwrap();
    assert!(!alice.is_online);

    users.set_online(&alice.id, true).await.unwrap();
    let online = users.get_online().await.unwrap();
    assert_eq!(online.len(), 1);
    assert_eq!(online[0].id, alice.id);

    users.update_name(&bob.id, "Robert").await.unwrap();
    let names: Vec<String> = users
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["Alice", "Robert"]);

    assert!(users.set_online("nobody", true).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_unread_counter_and_last_message() {
    let temp_file = NamedTempFile::new().unwrap();
    let sessions = ChatSessionStore::new(open_store(&temp_file).await);

    let session = sessions
        .create_session(|s: &mut ChatSession| s.name = "Alice".to_string())
        .await
        .unwrap();

    sessions.increment_unread(&session.id).await.unwrap();
    let bumped = sessions.increment_unread(&session.id).await.unwrap();
    assert_eq!(bumped.unread_count, 2);

    let read = sessions.reset_unread(&session.id).await.unwrap();
    assert_eq!(read.unread_count, 0);

    let pointed = sessions.update_last_message(&session.id, "m42").await.unwrap();
    assert_eq!(pointed.last_message_id.as_deref(), Some("m42"));

    sessions.set_archived(&session.id, true).await.unwrap();
    assert!(sessions.get_active_sessions().await.unwrap().is_empty());
    assert!(sessions.get_session(&session.id).await.unwrap().is_archived);

    assert!(sessions.reset_unread("missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_unread_counter_stores_full_u32_range() {
    let temp_file = NamedTempFile::new().unwrap();
    let sessions = ChatSessionStore::new(open_store(&temp_file).await);

    let session = sessions
        .create_session(|s: &mut ChatSession| s.unread_count = u32::MAX - 1)
        .await
        .unwrap();
    assert_eq!(
        sessions.get_session(&session.id).await.unwrap().unread_count,
        u32::MAX - 1
    );

    let bumped = sessions.increment_unread(&session.id).await.unwrap();
    assert_eq!(bumped.unread_count, u32::MAX);

    let saturated = sessions.increment_unread(&session.id).await.unwrap();
    assert_eq!(saturated.unread_count, u32::MAX);
}
