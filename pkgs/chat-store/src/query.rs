//! Equality-filter queries over a single table

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
    Select, Value,
};

use crate::error::Result;
use crate::record::{ColumnOf, Record, Table};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// A single filter term
#[derive(Debug, Clone)]
pub enum Predicate<C> {
    Eq(C, Value),
    IsNull(C),
}

/// Query over the table of `R`.
///
/// Results are ordered by the sort column (if any) and then by primary key in
/// the same direction, so the same committed state always yields the same
/// sequence. Generated ids sort in creation order, which keeps records that
/// share a sort key in the order they were created.
#[derive(Debug, Clone)]
pub struct Query<R: Record> {
    predicates: Vec<Predicate<ColumnOf<R>>>,
    sort: Option<(ColumnOf<R>, SortOrder)>,
    limit: Option<u64>,
}

impl<R: Record> Default for Query<R> {
    fn default() -> Self {
        Self::all()
    }
}

impl<R: Record> Query<R> {
    /// Every row of the table
    pub fn all() -> Self {
        Self {
            predicates: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    /// Keep rows where `column == value`
    pub fn filter(mut self, column: ColumnOf<R>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Eq(column, value.into()));
        self
    }

    /// Keep rows where `column IS NULL`
    pub fn is_null(mut self, column: ColumnOf<R>) -> Self {
        self.predicates.push(Predicate::IsNull(column));
        self
    }

    /// Order by `column`; a later call replaces an earlier one
    pub fn sort_by(mut self, column: ColumnOf<R>, order: SortOrder) -> Self {
        self.sort = Some((column, order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> Table {
        R::TABLE
    }

    pub fn predicates(&self) -> &[Predicate<ColumnOf<R>>] {
        &self.predicates
    }

    fn select(&self) -> Select<R::Entity> {
        let mut select = R::Entity::find();

        for predicate in &self.predicates {
            select = match predicate {
                Predicate::Eq(column, value) => select.filter(column.eq(value.clone())),
                Predicate::IsNull(column) => select.filter(column.is_null()),
            };
        }

        let tie_break = match self.sort {
            Some((column, order)) => {
                select = select.order_by(column, order.into());
                order
            }
            None => SortOrder::Asc,
        };
        select = select.order_by(R::id_column(), tie_break.into());

        if let Some(limit) = self.limit {
            select = select.limit(limit);
        }

        select
    }

    /// Run the query against a connection or an open transaction
    pub(crate) async fn fetch<C>(&self, conn: &C) -> Result<Vec<R>>
    where
        C: ConnectionTrait,
    {
        let models = self.select().all(conn).await?;
        models.into_iter().map(R::from_model).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::messages;
    use crate::models::Message;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_message_thread_query_sql() {
        let query = Query::<Message>::all()
            .filter(messages::Column::ChatSessionId, "1")
            .sort_by(messages::Column::Timestamp, SortOrder::Desc);

        let sql = query.select().build(DbBackend::Sqlite).to_string();

        assert!(sql.contains(r#"WHERE "messages"."chat_session_id" = '1'"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "messages"."timestamp" DESC, "messages"."id" DESC"#),
            "{sql}"
        );
        assert_eq!(query.table(), Table::Messages);
    }

    #[test]
    fn test_is_null_and_limit() {
        let query = Query::<Message>::all()
            .is_null(messages::Column::ReplyToMessageId)
            .limit(5);

        let sql = query.select().build(DbBackend::Sqlite).to_string();

        assert!(sql.contains(r#""messages"."reply_to_message_id" IS NULL"#), "{sql}");
        assert!(sql.contains(r#"ORDER BY "messages"."id" ASC"#), "{sql}");
        assert!(sql.contains("LIMIT 5"), "{sql}");
    }
}
