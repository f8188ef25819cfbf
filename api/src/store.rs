//! Postgres-backed [`DocumentStore`]: every collection shares the `documents`
//! table, keyed by `(collection, id)` with a JSONB body.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use craly_core::store::{Collection, Document, DocumentStore, Fields, StoreError, WriteOp};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write(&self, op: WriteOp) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await.map_err(backend)?;
        apply_write(&mut conn, &op).await
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!("Database error: {:?}", err);
    StoreError::Backend(err.to_string())
}

/// Apply one write on an open connection or transaction.
async fn apply_write(conn: &mut PgConnection, op: &WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Set {
            collection,
            id,
            data,
        } => {
            sqlx::query(
                r#"
                INSERT INTO documents (collection, id, data, updated_at)
                VALUES ($1, $2, $3, now())
                ON CONFLICT (collection, id)
                DO UPDATE SET data = EXCLUDED.data, updated_at = now()
                "#,
            )
            .bind(collection.as_str())
            .bind(id)
            .bind(Json(data))
            .execute(&mut *conn)
            .await
            .map_err(backend)?;
        }
        WriteOp::Update {
            collection,
            id,
            fields,
        } => {
            let result = sqlx::query(
                r#"
                UPDATE documents
                SET data = data || $3, updated_at = now()
                WHERE collection = $1 AND id = $2
                "#,
            )
            .bind(collection.as_str())
            .bind(id)
            .bind(Json(fields))
            .execute(&mut *conn)
            .await
            .map_err(backend)?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound {
                    collection: *collection,
                    id: id.clone(),
                });
            }
        }
        WriteOp::Delete { collection, id } => {
            sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .execute(&mut *conn)
                .await
                .map_err(backend)?;
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, (String, Json<Fields>)>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(|(id, Json(data))| Document { id, data }))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Json<Fields>)>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY id",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(data))| Document { id, data })
            .collect())
    }

    async fn list_ids(
        &self,
        collection: Collection,
    ) -> Result<std::collections::HashSet<String>, StoreError> {
        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(ids.into_iter().collect())
    }

    async fn create(&self, collection: Collection, data: Fields) -> Result<String, StoreError> {
        let id = Uuid::now_v7().to_string();
        self.write(WriteOp::Set {
            collection,
            id: id.clone(),
            data,
        })
        .await?;
        Ok(id)
    }

    async fn set(&self, collection: Collection, id: &str, data: Fields) -> Result<(), StoreError> {
        self.write(WriteOp::Set {
            collection,
            id: id.to_string(),
            data,
        })
        .await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.write(WriteOp::Update {
            collection,
            id: id.to_string(),
            fields,
        })
        .await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.write(WriteOp::Delete {
            collection,
            id: id.to_string(),
        })
        .await
    }

    async fn commit(&self, writes: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        for op in &writes {
            apply_write(&mut tx, op).await?;
        }
        tx.commit().await.map_err(backend)?;
        tracing::debug!(writes = writes.len(), "batch committed");
        Ok(())
    }
}
