/// PostgreSQL document store
///
/// All collections share one `documents` table; user fields live in a JSONB
/// `body` column and every store index is backed by an expression index on
/// `(collection, body ->> field, seq)`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE documents (
///     seq BIGSERIAL NOT NULL,
///     id TEXT PRIMARY KEY,
///     collection TEXT NOT NULL,
///     body JSONB NOT NULL DEFAULT '{}'::jsonb,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Transactions
///
/// Each [`Transaction`] wraps one sqlx transaction running at `SERIALIZABLE`
/// isolation. A transaction owns a single connection, so calls fanned out
/// against it are queued on an async mutex and reach the server one at a time.
/// Serialization failures surface as [`StoreError::Database`]; no retry is
/// attempted here.

use super::{Collection, Document, Fields, Id, Index, Store, StoreError, StoreResult, Transaction};
use crate::db::pool::health_check;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPool, types::Json, Postgres};
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// Row shape shared by every document query
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    created_at: DateTime<Utc>,
    body: Json<Fields>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: Id::new(row.id),
            creation_time: row.created_at,
            fields: row.body.0,
        }
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing connection pool
    ///
    /// The schema must already be migrated; see [`crate::db::migrations::run_migrations`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        debug!("Opened serializable transaction");
        Ok(Box::new(PgTransaction { tx: Mutex::new(tx) }))
    }

    async fn health_check(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}

/// Transaction over a [`PgStore`]
pub struct PgTransaction {
    tx: Mutex<sqlx::Transaction<'static, Postgres>>,
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn query_by_index(&self, index: Index, value: &str) -> StoreResult<Vec<Document>> {
        // Field names come from `Index`, never from callers.
        let sql = format!(
            "SELECT id, created_at, body FROM documents \
             WHERE collection = $1 AND body ->> '{}' = $2 \
             ORDER BY seq",
            index.field()
        );

        let mut tx = self.tx.lock().await;
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(index.collection().as_str())
            .bind(value)
            .fetch_all(&mut **tx)
            .await?;

        trace!(
            collection = %index.collection(),
            index = index.name(),
            value,
            matched = rows.len(),
            "Index query"
        );
        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn get(&self, collection: Collection, id: &Id) -> StoreResult<Option<Document>> {
        let mut tx = self.tx.lock().await;
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, created_at, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn insert(&self, collection: Collection, fields: Fields) -> StoreResult<Id> {
        let id = Id::generate();

        let mut tx = self.tx.lock().await;
        sqlx::query(
            r#"
            INSERT INTO documents (id, collection, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id.as_str())
        .bind(collection.as_str())
        .bind(Json(fields))
        .execute(&mut **tx)
        .await?;

        trace!(collection = %collection, id = %id, "Inserted document");
        Ok(id)
    }

    async fn patch(&self, collection: Collection, id: &Id, fields: Fields) -> StoreResult<()> {
        let mut tx = self.tx.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_strip_nulls(body || $3)
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(Json(fields))
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.clone(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &Id) -> StoreResult<()> {
        let mut tx = self.tx.lock().await;
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.clone(),
            });
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.into_inner().commit().await?;
        debug!("Committed transaction");
        Ok(())
    }
}
