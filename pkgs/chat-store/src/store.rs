//! Record store: typed create/find/update/query over the local database,
//! scoped write transactions, and live queries.

use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::live::{Registry, Subscription};
use crate::query::Query;
use crate::record::{now_millis, Record, Table};
use crate::StoreConfig;

pub(crate) struct StoreInner {
    pub(crate) db: DatabaseConnection,
    /// Writer lock. Held for the whole life of a [`WriteTxn`].
    writer: Mutex<()>,
    /// Only locked briefly: to register, to publish a commit, to prune.
    pub(crate) registry: Mutex<Registry>,
}

/// Handle to the local store. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Open (creating if needed) the database described by `config` and run migrations
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let mut options = ConnectOptions::new(config.database_url()?);
        options
            .max_connections(config.max_connections)
            .sqlx_logging(config.sqlx_logging);

        let db = Database::connect(options).await?;
        let store = Self::with_connection(db).await?;

        info!("Chat store initialized at {}", config.db_path.display());
        Ok(store)
    }

    /// Create a store over an existing connection
    pub async fn with_connection(db: DatabaseConnection) -> Result<Self> {
        crate::migration::Migrator::up(&db, None).await?;

        Ok(Self {
            inner: Arc::new(StoreInner {
                db,
                writer: Mutex::new(()),
                registry: Mutex::new(Registry::default()),
            }),
        })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.inner.db
    }

    /// Start a scoped write transaction.
    ///
    /// Waits for any other write transaction to finish first. Writes become
    /// visible to readers on [`WriteTxn::commit`]; dropping the transaction
    /// without committing rolls it back. Reads and subscriptions do not wait
    /// for an open transaction.
    pub async fn begin_write(&self) -> Result<WriteTxn<'_>> {
        let writer = self.inner.writer.lock().await;
        let txn = self.inner.db.begin().await?;

        Ok(WriteTxn {
            txn,
            _writer: writer,
            store: self,
            touched: BTreeSet::new(),
        })
    }

    /// Create one record in its own transaction
    pub async fn create<R, F>(&self, init: F) -> Result<R>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        let mut txn = self.begin_write().await?;
        let record = txn.create(init).await?;
        txn.commit().await?;
        Ok(record)
    }

    /// Update one record in its own transaction
    pub async fn update<R, F>(&self, record: &R, mutate: F) -> Result<R>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        self.update_by_id(record.id(), mutate).await
    }

    /// Update the record with `id` in its own transaction
    pub async fn update_by_id<R, F>(&self, id: &str, mutate: F) -> Result<R>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        let mut txn = self.begin_write().await?;
        let updated = txn.update_by_id(id, mutate).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Find a record by id among committed rows
    pub async fn find<R: Record>(&self, id: &str) -> Result<R> {
        find_in(&self.inner.db, id).await
    }

    /// Current matching set among committed rows
    pub async fn query<R: Record>(&self, query: &Query<R>) -> Result<Vec<R>> {
        query.fetch(&self.inner.db).await
    }

    /// Subscribe to the live result set of `query`.
    ///
    /// The current result set is queued on the subscription before this
    /// returns; every later commit that changes it queues another snapshot.
    pub async fn observe<R: Record>(&self, query: Query<R>) -> Result<Subscription<R>> {
        let mut registry = self.inner.registry.lock().await;
        // May already include a commit whose publish is waiting on the
        // registry; that publish then finds the result unchanged.
        let initial = query.fetch(&self.inner.db).await?;
        let (id, rx) = registry.register(query, initial);
        drop(registry);

        Ok(Subscription::new(id, rx, &self.inner))
    }

    /// Number of open subscriptions reading `table`
    pub async fn subscription_count(&self, table: Table) -> usize {
        self.inner.registry.lock().await.len(table)
    }

    /// Version of the most recent commit
    pub async fn version(&self) -> u64 {
        self.inner.registry.lock().await.version()
    }
}

async fn find_in<R, C>(conn: &C, id: &str) -> Result<R>
where
    R: Record,
    C: ConnectionTrait,
{
    let model = R::Entity::find()
        .filter(R::id_column().eq(id))
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::not_found(R::TABLE, id))?;

    R::from_model(model)
}

/// A scoped write transaction; the only way to change records.
pub struct WriteTxn<'a> {
    // Dropped (rolled back) before the writer lock is released
    txn: DatabaseTransaction,
    _writer: MutexGuard<'a, ()>,
    store: &'a Store,
    touched: BTreeSet<Table>,
}

impl WriteTxn<'_> {
    /// Create a record.
    ///
    /// The record starts as `R::default()` with a fresh UUIDv7 id, so ids
    /// generated by one process sort in creation order; `init` may replace
    /// the id (used when seeding). Timestamps are stamped afterwards.
    pub async fn create<R, F>(&mut self, init: F) -> Result<R>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        let mut record = R::default();
        record.set_id(Uuid::now_v7().to_string());
        init(&mut record);
        if record.id().is_empty() {
            record.set_id(Uuid::now_v7().to_string());
        }

        let now = now_millis();
        record.stamp(now, now);

        let model = record.into_active().insert(&self.txn).await?;
        self.touched.insert(R::TABLE);

        let created = R::from_model(model)?;
        debug!("Created {} record {}", R::TABLE, created.id());
        Ok(created)
    }

    /// Apply `mutate` to the stored version of `record` and persist it.
    ///
    /// The id and `created_at` cannot be changed; `updated_at` is bumped.
    pub async fn update<R, F>(&mut self, record: &R, mutate: F) -> Result<R>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        self.update_by_id(record.id(), mutate).await
    }

    /// Like [`WriteTxn::update`], addressing the record by id
    pub async fn update_by_id<R, F>(&mut self, id: &str, mutate: F) -> Result<R>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        let current: R = find_in(&self.txn, id).await?;

        let mut next = current.clone();
        mutate(&mut next);
        next.set_id(current.id().to_string());
        next.stamp(current.created_at(), now_millis());

        let model = match next.into_active().update(&self.txn).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => {
                return Err(StoreError::not_found(R::TABLE, current.id()))
            }
            Err(e) => return Err(e.into()),
        };
        self.touched.insert(R::TABLE);

        let updated = R::from_model(model)?;
        debug!("Updated {} record {}", R::TABLE, updated.id());
        Ok(updated)
    }

    /// Find a record, seeing this transaction's own uncommitted writes
    pub async fn find<R: Record>(&self, id: &str) -> Result<R> {
        find_in(&self.txn, id).await
    }

    /// Query, seeing this transaction's own uncommitted writes
    pub async fn query<R: Record>(&self, query: &Query<R>) -> Result<Vec<R>> {
        query.fetch(&self.txn).await
    }

    /// Commit all writes atomically and deliver snapshots to affected subscriptions.
    ///
    /// Returns the new commit version, or the current one if nothing was written.
    pub async fn commit(self) -> Result<u64> {
        let WriteTxn {
            txn,
            _writer,
            store,
            touched,
        } = self;

        txn.commit().await?;

        // Still holding the writer lock, so publishes happen in commit order
        let mut registry = store.inner.registry.lock().await;
        if touched.is_empty() {
            return Ok(registry.version());
        }

        let version = registry.publish(&store.inner.db, &touched).await;
        debug!("Committed version {} touching {:?}", version, touched);
        Ok(version)
    }

    /// Discard all writes
    pub async fn rollback(self) -> Result<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}

/// Lazily initialised store shared by screens.
///
/// Screens read the store through the provider so that mounting before
/// initialisation fails with [`StoreError::StoreUnavailable`].
#[derive(Clone, Default)]
pub struct StoreProvider {
    cell: Arc<OnceCell<Store>>,
}

impl StoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the store on first call; later calls return the same store
    pub async fn init(&self, config: StoreConfig) -> Result<Store> {
        self.cell
            .get_or_try_init(|| Store::open(config))
            .await
            .cloned()
    }

    /// Provide an already opened store
    pub fn provide(&self, store: Store) -> Result<()> {
        self.cell
            .set(store)
            .map_err(|_| StoreError::Validation("store already initialized".to_string()))
    }

    pub fn get(&self) -> Result<Store> {
        self.cell.get().cloned().ok_or(StoreError::StoreUnavailable)
    }
}
