//! User manager for user records and presence

use tracing::debug;

use crate::entities::users;
use crate::error::Result;
use crate::models::User;
use crate::query::{Query, SortOrder};
use crate::store::Store;

/// User manager
#[derive(Clone)]
pub struct UserManager {
    store: Store,
}

impl UserManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Add a user with a generated id
    pub async fn add(&self, name: &str, email: Option<&str>) -> Result<User> {
        let user = self
            .store
            .create(|user: &mut User| {
                user.name = name.to_string();
                user.email = email.map(str::to_string);
            })
            .await?;

        debug!("Added user: {} ({})", user.name, user.id);
        Ok(user)
    }

    /// Get a user by id
    pub async fn get(&self, id: &str) -> Result<User> {
        self.store.find(id).await
    }

    /// All users, by name
    pub async fn get_all(&self) -> Result<Vec<User>> {
        self.store
            .query(&Query::all().sort_by(users::Column::Name, SortOrder::Asc))
            .await
    }

    pub async fn get_online(&self) -> Result<Vec<User>> {
        self.store
            .query(&Query::all().filter(users::Column::IsOnline, true))
            .await
    }

    /// Update the online flag
    pub async fn set_online(&self, id: &str, online: bool) -> Result<User> {
        let user = self
            .store
            .update_by_id(id, |user: &mut User| user.is_online = online)
            .await?;

        debug!("User {} online -> {}", id, online);
        Ok(user)
    }

    /// Update display name
    pub async fn update_name(&self, id: &str, name: &str) -> Result<User> {
        self.store
            .update_by_id(id, |user: &mut User| user.name = name.to_string())
            .await
    }
}
