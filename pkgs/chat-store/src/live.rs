//! Live queries: snapshot delivery after every relevant commit
//!
//! Every subscription owns a feed in the [`Registry`], filed under the table
//! its query reads. A commit refreshes its affected feeds before releasing
//! the store's writer lock, so the next write cannot start until delivery is
//! done. That gives each subscription its snapshots in commit order.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::Stream;
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::query::Query;
use crate::record::{Record, Table};
use crate::store::StoreInner;

pub type SubscriptionId = u64;

/// The full result set of a query as of one commit
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R> {
    /// Commit version this snapshot reflects (0 = before any commit)
    pub version: u64,
    pub records: Vec<R>,
}

#[async_trait]
trait Feed: Send {
    fn is_closed(&self) -> bool;

    /// Recompute the result set and deliver it if it changed
    async fn refresh(&mut self, db: &DatabaseConnection, version: u64) -> Result<()>;
}

struct QueryFeed<R: Record> {
    query: Query<R>,
    tx: mpsc::UnboundedSender<Snapshot<R>>,
    last: Vec<R>,
}

#[async_trait]
impl<R: Record> Feed for QueryFeed<R> {
    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn refresh(&mut self, db: &DatabaseConnection, version: u64) -> Result<()> {
        let records = self.query.fetch(db).await?;
        if records == self.last {
            return Ok(());
        }

        self.last = records.clone();
        // A closed receiver is pruned on the next publish
        let _ = self.tx.send(Snapshot { version, records });
        Ok(())
    }
}

/// Subscription registry keyed by table
#[derive(Default)]
pub(crate) struct Registry {
    version: u64,
    next_id: SubscriptionId,
    feeds: HashMap<Table, BTreeMap<SubscriptionId, Box<dyn Feed>>>,
}

impl Registry {
    pub(crate) fn version(&self) -> u64 {
        self.version
    }

    /// Register `query`, returning the receiving end primed with `initial`
    pub(crate) fn register<R: Record>(
        &mut self,
        query: Query<R>,
        initial: Vec<R>,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<Snapshot<R>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(Snapshot {
            version: self.version,
            records: initial.clone(),
        });

        let id = self.next_id;
        self.next_id += 1;

        let feed = QueryFeed {
            query,
            tx,
            last: initial,
        };
        self.feeds
            .entry(R::TABLE)
            .or_default()
            .insert(id, Box::new(feed));

        debug!("Registered subscription {} on {}", id, R::TABLE);
        (id, rx)
    }

    pub(crate) fn remove(&mut self, table: Table, id: SubscriptionId) {
        if let Some(feeds) = self.feeds.get_mut(&table) {
            if feeds.remove(&id).is_some() {
                debug!("Removed subscription {} on {}", id, table);
            }
        }
    }

    /// Number of live subscriptions on `table`
    pub(crate) fn len(&self, table: Table) -> usize {
        self.feeds.get(&table).map_or(0, |feeds| {
            feeds.values().filter(|feed| !feed.is_closed()).count()
        })
    }

    /// Advance the commit version and refresh every feed reading a touched table
    pub(crate) async fn publish(&mut self, db: &DatabaseConnection, touched: &BTreeSet<Table>) -> u64 {
        self.version += 1;
        let version = self.version;

        for table in touched {
            let Some(feeds) = self.feeds.get_mut(table) else {
                continue;
            };

            feeds.retain(|_, feed| !feed.is_closed());

            for (id, feed) in feeds.iter_mut() {
                // Failed refreshes leave the subscriber on its last snapshot
                if let Err(e) = feed.refresh(db, version).await {
                    warn!(
                        "Failed to refresh subscription {} on {} at version {}: {}",
                        id, table, version, e
                    );
                }
            }
        }

        version
    }
}

/// A live query.
///
/// Yields a snapshot as soon as it is created and then one per commit that
/// changes the result set. Dropping it (or calling [`unsubscribe`]) stops
/// delivery.
///
/// [`unsubscribe`]: Subscription::unsubscribe
pub struct Subscription<R: Record> {
    id: SubscriptionId,
    rx: mpsc::UnboundedReceiver<Snapshot<R>>,
    store: Weak<StoreInner>,
}

impl<R: Record> Subscription<R> {
    pub(crate) fn new(
        id: SubscriptionId,
        rx: mpsc::UnboundedReceiver<Snapshot<R>>,
        store: &Arc<StoreInner>,
    ) -> Self {
        Self {
            id,
            rx,
            store: Arc::downgrade(store),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next snapshot. `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<Snapshot<R>> {
        self.rx.recv().await
    }

    /// Take an already delivered snapshot without waiting
    pub fn try_recv(&mut self) -> Option<Snapshot<R>> {
        self.rx.try_recv().ok()
    }

    /// Stop delivery and release the registry entry
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<R: Record> Stream for Subscription<R> {
    type Item = Snapshot<R>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<R: Record> Drop for Subscription<R> {
    fn drop(&mut self) {
        self.rx.close();

        // If a publish holds the registry it prunes the closed feed itself
        if let Some(store) = self.store.upgrade() {
            if let Ok(mut registry) = store.registry.try_lock() {
                registry.remove(R::TABLE, self.id);
            }
        }
    }
}
