//! Participant manager for session membership

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info};

use crate::entities::{chat_participants, chat_sessions};
use crate::error::{Result, StoreError};
use crate::models::{ChatParticipant, ChatSession, ParticipantRole};
use crate::query::{Query, SortOrder};
use crate::record::{now_millis, Record};
use crate::store::Store;

/// Participant manager
#[derive(Clone)]
pub struct ParticipantManager {
    store: Store,
}

impl ParticipantManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Add `user_id` to a session.
    ///
    /// An active membership is returned unchanged; a user who left rejoins
    /// with a fresh `joined_at`.
    pub async fn join(
        &self,
        chat_session_id: &str,
        user_id: &str,
        role: ParticipantRole,
    ) -> Result<ChatParticipant> {
        let mut txn = self.store.begin_write().await?;

        let existing = txn
            .query(&Self::membership_query(chat_session_id, user_id))
            .await?
            .into_iter()
            .next();

        let participant = match existing {
            Some(p) if p.is_active() => {
                debug!("User {} already in session {}", user_id, chat_session_id);
                return Ok(p);
            }
            Some(p) => {
                txn.update(&p, |p: &mut ChatParticipant| {
                    p.role = role;
                    p.joined_at = now_millis();
                    p.left_at = None;
                })
                .await?
            }
            None => {
                txn.create(|p: &mut ChatParticipant| {
                    p.chat_session_id = chat_session_id.to_string();
                    p.user_id = user_id.to_string();
                    p.role = role;
                    p.joined_at = now_millis();
                })
                .await?
            }
        };
        txn.commit().await?;

        info!("User {} joined session {}", user_id, chat_session_id);
        Ok(participant)
    }

    /// Mark a membership as left. The row is kept.
    pub async fn leave(&self, chat_session_id: &str, user_id: &str) -> Result<ChatParticipant> {
        let mut txn = self.store.begin_write().await?;

        let participant = txn
            .query(&Self::membership_query(chat_session_id, user_id))
            .await?
            .into_iter()
            .find(ChatParticipant::is_active)
            .ok_or_else(|| {
                StoreError::not_found(
                    ChatParticipant::TABLE,
                    format!("{}/{}", chat_session_id, user_id),
                )
            })?;

        let left = txn
            .update(&participant, |p: &mut ChatParticipant| {
                p.left_at = Some(now_millis());
            })
            .await?;
        txn.commit().await?;

        info!("User {} left session {}", user_id, chat_session_id);
        Ok(left)
    }

    /// Active participants of a session, in join order
    pub async fn get_participants(&self, chat_session_id: &str) -> Result<Vec<ChatParticipant>> {
        let query = Query::all()
            .filter(chat_participants::Column::ChatSessionId, chat_session_id)
            .is_null(chat_participants::Column::LeftAt)
            .sort_by(chat_participants::Column::JoinedAt, SortOrder::Asc);
        self.store.query(&query).await
    }

    /// Sessions `user_id` currently belongs to
    pub async fn get_sessions_for_user(&self, user_id: &str) -> Result<Vec<ChatSession>> {
        let rows = chat_participants::Entity::find()
            .filter(chat_participants::Column::UserId.eq(user_id))
            .filter(chat_participants::Column::LeftAt.is_null())
            .order_by_asc(chat_participants::Column::JoinedAt)
            .find_also_related(chat_sessions::Entity)
            .all(self.store.connection())
            .await?;

        // Memberships may point at sessions that were never created
        rows.into_iter()
            .filter_map(|(_, session)| session)
            .map(ChatSession::from_model)
            .collect()
    }

    fn membership_query(chat_session_id: &str, user_id: &str) -> Query<ChatParticipant> {
        Query::all()
            .filter(chat_participants::Column::ChatSessionId, chat_session_id)
            .filter(chat_participants::Column::UserId, user_id)
            .sort_by(chat_participants::Column::JoinedAt, SortOrder::Desc)
    }
}
