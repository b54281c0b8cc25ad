// Tests for the chat list and chat detail view-models

use chat_store::screens::{ChatDetailScreen, ChatListScreen, Sender};
use chat_store::seed::seed_sample_data;
use chat_store::{ChatSessionStore, Message, MessageStore, Store, StoreConfig, StoreProvider};
use tempfile::NamedTempFile;

async fn seeded_provider(path: &NamedTempFile) -> StoreProvider {
    let provider = StoreProvider::new();
    let store: Store = provider
        .init(StoreConfig::new(path.path()))
        .await
        .expect("Failed to open store");
    seed_sample_data(&store, "me").await.unwrap();
    provider
}

#[tokio::test]
async fn test_screens_stay_loading_without_store() {
    let provider = StoreProvider::new();

    let list = ChatListScreen::mount(&provider).await;
    assert!(list.is_loading());
    assert!(list.rows().is_empty());

    let mut detail = ChatDetailScreen::mount(&provider, "1", "me").await;
    assert!(detail.is_loading());

    detail.set_input("hello");
    assert!(!detail.send().await);
    assert_eq!(detail.input(), "hello");
    assert!(!detail.next_frame().await);
}

#[tokio::test]
async fn test_chat_list_renders_sessions() {
    let temp_file = NamedTempFile::new().unwrap();
    let provider = seeded_provider(&temp_file).await;

    let list = ChatListScreen::mount(&provider).await;
    assert!(!list.is_loading());
    assert_eq!(list.rows().len(), 6);

    let first = list.rows().iter().find(|row| row.id == "1").unwrap();
    assert_eq!(first.name, "张三");
    assert_eq!(first.unread_count, 3);
    assert!(first.is_online);
    assert_eq!(first.last_message.as_deref(), Some("好的，没问题！到时候见"));
    assert_eq!(first.time.len(), 5);

    list.unmount();
}

#[tokio::test]
async fn test_chat_list_follows_session_changes() {
    let temp_file = NamedTempFile::new().unwrap();
    let provider = seeded_provider(&temp_file).await;
    let store = provider.get().unwrap();

    let mut list = ChatListScreen::mount(&provider).await;
    let before = list.version().unwrap();

    ChatSessionStore::new(store.clone())
        .update_last_message("2", "missing-message")
        .await
        .unwrap();

    assert!(list.next_frame().await);
    assert!(list.version().unwrap() > before);
    let row = list.rows().iter().find(|row| row.id == "2").unwrap();
    assert_eq!(row.last_message, None);
}

#[tokio::test]
async fn test_chat_list_preview_follows_message_edits() {
    let temp_file = NamedTempFile::new().unwrap();
    let provider = seeded_provider(&temp_file).await;
    let store = provider.get().unwrap();

    let mut list = ChatListScreen::mount(&provider).await;

    store
        .update_by_id("11", |m: &mut Message| m.text = "edited".to_string())
        .await
        .unwrap();

    let rendered = tokio::time::timeout(std::time::Duration::from_secs(5), list.next_frame())
        .await
        .expect("no frame after message edit");
    assert!(rendered);

    let row = list.rows().iter().find(|row| row.id == "1").unwrap();
    assert_eq!(row.last_message.as_deref(), Some("edited"));
}

#[tokio::test]
async fn test_chat_list_preview_appears_when_message_is_created() {
    let temp_file = NamedTempFile::new().unwrap();
    let provider = seeded_provider(&temp_file).await;
    let store = provider.get().unwrap();

    let mut list = ChatListScreen::mount(&provider).await;

    ChatSessionStore::new(store.clone())
        .update_last_message("2", "later")
        .await
        .unwrap();
    assert!(list.next_frame().await);
    let row = list.rows().iter().find(|row| row.id == "2").unwrap();
    assert_eq!(row.last_message, None);

    MessageStore::new(store.clone())
        .create_message(|m: &mut Message| {
            m.id = "later".to_string();
            m.chat_session_id = "2".to_string();
            m.sender_id = "user2".to_string();
            m.text = "arrived later".to_string();
        })
        .await
        .unwrap();
    assert!(list.next_frame().await);

    let row = list.rows().iter().find(|row| row.id == "2").unwrap();
    assert_eq!(row.last_message.as_deref(), Some("arrived later"));
    list.unmount();
}

#[tokio::test]
async fn test_chat_detail_attributes_senders() {
    let temp_file = NamedTempFile::new().unwrap();
    let provider = seeded_provider(&temp_file).await;

    let detail = ChatDetailScreen::mount(&provider, "1", "me").await;
    assert_eq!(detail.chat_id(), "1");

    let rows = detail.rows();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].id, "11");
    assert_eq!(rows[0].sender, Sender::Me);
    assert_eq!(rows[1].id, "10");
    assert_eq!(rows[1].sender, Sender::Other);
}

#[tokio::test]
async fn test_chat_detail_send_clears_input_and_renders() {
    let temp_file = NamedTempFile::new().unwrap();
    let provider = seeded_provider(&temp_file).await;

    let mut detail = ChatDetailScreen::mount(&provider, "1", "me").await;

    detail.set_input("   ");
    assert!(!detail.send().await);
    assert_eq!(detail.input(), "   ");

    detail.set_input("See you at 8");
    assert!(detail.send().await);
    assert_eq!(detail.input(), "");

    assert!(detail.next_frame().await);
    assert_eq!(detail.rows().len(), 7);
    assert_eq!(detail.rows()[0].text, "See you at 8");
    assert_eq!(detail.rows()[0].sender, Sender::Me);

    // Sending does not touch the session row
    let session = ChatSessionStore::new(provider.get().unwrap())
        .get_session("1")
        .await
        .unwrap();
    assert_eq!(session.unread_count, 3);
    assert_eq!(session.last_message_id.as_deref(), Some("11"));

    detail.unmount();
}
