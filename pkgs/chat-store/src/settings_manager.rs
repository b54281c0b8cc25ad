//! Settings manager for key/value settings, global or scoped to a user

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::entities::user_settings;
use crate::error::Result;
use crate::models::UserSetting;
use crate::query::{Query, SortOrder};
use crate::store::{Store, WriteTxn};

/// Key for the id of the user operating this device
pub const CURRENT_USER_ID_KEY: &str = "current_user_id";

/// Key for the preferred UI language
pub const LANGUAGE_KEY: &str = "language";

/// Key for the notification on/off switch
pub const NOTIFICATIONS_ENABLED_KEY: &str = "notifications_enabled";

/// Settings manager. `user_id == None` addresses application-wide settings.
#[derive(Clone)]
pub struct SettingsManager {
    store: Store,
}

impl SettingsManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn key_query(user_id: Option<&str>, key: &str) -> Query<UserSetting> {
        let query = Query::all().filter(user_settings::Column::Key, key);
        match user_id {
            Some(user_id) => query.filter(user_settings::Column::UserId, user_id),
            None => query.is_null(user_settings::Column::UserId),
        }
    }

    fn scope_query(user_id: Option<&str>) -> Query<UserSetting> {
        let query = Query::all().sort_by(user_settings::Column::Key, SortOrder::Asc);
        match user_id {
            Some(user_id) => query.filter(user_settings::Column::UserId, user_id),
            None => query.is_null(user_settings::Column::UserId),
        }
    }

    /// Get a setting value by key
    pub async fn get(&self, user_id: Option<&str>, key: &str) -> Result<Option<String>> {
        debug!("Getting setting: {} (user {:?})", key, user_id);

        let found = self
            .store
            .query(&Self::key_query(user_id, key))
            .await?
            .into_iter()
            .next();

        Ok(found.map(|setting| setting.value))
    }

    /// Get a JSON-encoded setting
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        user_id: Option<&str>,
        key: &str,
    ) -> Result<Option<T>> {
        match self.get(user_id, key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Set a setting value
    pub async fn set(&self, user_id: Option<&str>, key: &str, value: &str) -> Result<()> {
        debug!("Setting key: {} (user {:?})", key, user_id);

        let mut txn = self.store.begin_write().await?;
        Self::upsert(&mut txn, user_id, key, value).await?;
        txn.commit().await?;

        info!("Setting '{}' updated successfully", key);
        Ok(())
    }

    /// Store `value` as JSON
    pub async fn set_json<T: Serialize>(
        &self,
        user_id: Option<&str>,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(user_id, key, &raw).await
    }

    /// Set multiple settings in one transaction
    pub async fn set_many(&self, user_id: Option<&str>, items: &[(String, String)]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let mut txn = self.store.begin_write().await?;
        for (key, value) in items {
            Self::upsert(&mut txn, user_id, key, value).await?;
        }
        txn.commit().await?;

        info!("Set {} settings successfully", items.len());
        Ok(())
    }

    /// All settings in a scope as (key, value), sorted by key
    pub async fn get_all(&self, user_id: Option<&str>) -> Result<Vec<(String, String)>> {
        let settings = self.store.query(&Self::scope_query(user_id)).await?;

        Ok(settings.into_iter().map(|s| (s.key, s.value)).collect())
    }

    /// Check if a setting exists
    pub async fn exists(&self, user_id: Option<&str>, key: &str) -> Result<bool> {
        Ok(self.get(user_id, key).await?.is_some())
    }

    async fn upsert(
        txn: &mut WriteTxn<'_>,
        user_id: Option<&str>,
        key: &str,
        value: &str,
    ) -> Result<UserSetting> {
        let existing = txn
            .query(&Self::key_query(user_id, key))
            .await?
            .into_iter()
            .next();

        match existing {
            Some(setting) => {
                txn.update(&setting, |s: &mut UserSetting| s.value = value.to_string())
                    .await
            }
            None => {
                txn.create(|s: &mut UserSetting| {
                    s.key = key.to_string();
                    s.value = value.to_string();
                    s.user_id = user_id.map(str::to_string);
                })
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_constants() {
        assert_eq!(CURRENT_USER_ID_KEY, "current_user_id");
        assert_eq!(LANGUAGE_KEY, "language");
        assert_eq!(NOTIFICATIONS_ENABLED_KEY, "notifications_enabled");
    }
}
