// Tests for SettingsManager

use chat_store::settings_manager::{SettingsManager, CURRENT_USER_ID_KEY, LANGUAGE_KEY};
use chat_store::{Store, StoreConfig, Table};
use tempfile::NamedTempFile;

async fn open_store(path: &NamedTempFile) -> Store {
    Store::open(StoreConfig::new(path.path()))
        .await
        .expect("Failed to open store")
}

#[tokio::test]
async fn test_set_and_get_setting() {
    let temp_file = NamedTempFile::new().unwrap();
    let manager = SettingsManager::new(open_store(&temp_file).await);

    manager
        .set(None, CURRENT_USER_ID_KEY, "me")
        .await
        .expect("Failed to set setting");

    let value = manager
        .get(None, CURRENT_USER_ID_KEY)
        .await
        .expect("Failed to get setting");
    assert_eq!(value.as_deref(), Some("me"));
}

#[tokio::test]
async fn test_get_nonexistent_setting() {
    let temp_file = NamedTempFile::new().unwrap();
    let manager = SettingsManager::new(open_store(&temp_file).await);

    assert!(manager.get(None, "missing").await.unwrap().is_none());
    assert!(!manager.exists(None, "missing").await.unwrap());
}

#[tokio::test]
async fn test_update_existing_setting_keeps_one_row() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let manager = SettingsManager::new(store.clone());

    manager.set(None, LANGUAGE_KEY, "zh").await.unwrap();
    manager.set(None, LANGUAGE_KEY, "en").await.unwrap();

    assert_eq!(
        manager.get(None, LANGUAGE_KEY).await.unwrap().as_deref(),
        Some("en")
    );
    assert_eq!(manager.get_all(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_scopes_are_separate() {
    let temp_file = NamedTempFile::new().unwrap();
    let manager = SettingsManager::new(open_store(&temp_file).await);

    manager.set(None, LANGUAGE_KEY, "en").await.unwrap();
    manager.set(Some("user1"), LANGUAGE_KEY, "zh").await.unwrap();
    manager.set(Some("user2"), LANGUAGE_KEY, "fr").await.unwrap();

    assert_eq!(manager.get(None, LANGUAGE_KEY).await.unwrap().as_deref(), Some("en"));
    assert_eq!(
        manager.get(Some("user1"), LANGUAGE_KEY).await.unwrap().as_deref(),
        Some("zh")
    );
    assert_eq!(
        manager.get(Some("user2"), LANGUAGE_KEY).await.unwrap().as_deref(),
        Some("fr")
    );
    assert!(manager.get(Some("user3"), LANGUAGE_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_many_and_get_all_sorted() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let manager = SettingsManager::new(store.clone());

    let items = vec![
        ("theme".to_string(), "dark".to_string()),
        ("font_size".to_string(), "14".to_string()),
        (LANGUAGE_KEY.to_string(), "zh".to_string()),
    ];
    manager.set_many(Some("user1"), &items).await.unwrap();

    // One commit for the whole batch
    assert_eq!(store.version().await, 1);

    let all = manager.get_all(Some("user1")).await.unwrap();
    let keys: Vec<&str> = all.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["font_size", "language", "theme"]);
    assert!(manager.get_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_many_empty_is_noop() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let manager = SettingsManager::new(store.clone());

    manager.set_many(None, &[]).await.unwrap();
    assert_eq!(store.version().await, 0);
}

#[tokio::test]
async fn test_json_settings() {
    let temp_file = NamedTempFile::new().unwrap();
    let manager = SettingsManager::new(open_store(&temp_file).await);

    let pinned = vec!["1".to_string(), "5".to_string()];
    manager
        .set_json(Some("user1"), "pinned_sessions", &pinned)
        .await
        .unwrap();

    let loaded: Option<Vec<String>> = manager
        .get_json(Some("user1"), "pinned_sessions")
        .await
        .unwrap();
    assert_eq!(loaded, Some(pinned));

    manager.set(None, "broken", "{not json").await.unwrap();
    let broken = manager.get_json::<Vec<String>>(None, "broken").await;
    assert!(matches!(
        broken,
        Err(chat_store::StoreError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_settings_are_observable() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let manager = SettingsManager::new(store.clone());

    let mut all = store
        .observe(chat_store::Query::<chat_store::UserSetting>::all())
        .await
        .unwrap();
    all.try_recv().unwrap();

    manager.set(None, LANGUAGE_KEY, "en").await.unwrap();
    let snapshot = all.try_recv().unwrap();
    assert_eq!(snapshot.records[0].value, "en");
    assert_eq!(store.subscription_count(Table::UserSettings).await, 1);
}
