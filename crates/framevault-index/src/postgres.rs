//! Postgres/pgvector-backed vector store.

use std::collections::HashMap;

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use framevault_core::{Error, IndexEntry, Result, VectorStore};

/// Vector store backed by Postgres with the pgvector extension.
///
/// Top-k runs server-side over the `<=>` cosine-distance operator;
/// similarity is `1 - distance`. Upsert is true upsert via the
/// `(document_id, frame_number)` primary key.
pub struct PgVectorStore {
    pool: Pool<Postgres>,
    dimension: usize,
}

impl PgVectorStore {
    /// Connect and ensure the schema exists for `dimension`-length
    /// embeddings.
    pub async fn connect(database_url: &str, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::Config(
                "embedding dimension must be positive".to_string(),
            ));
        }

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let store = Self { pool, dimension };
        store.ensure_schema().await?;
        info!(dimension, "connected pgvector store");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS frame_entry (
                document_id  TEXT NOT NULL,
                frame_number INT NOT NULL,
                chunk_text   TEXT NOT NULL,
                embedding    vector({}) NOT NULL,
                metadata     JSONB NOT NULL DEFAULT '{{}}',
                PRIMARY KEY (document_id, frame_number)
            )
            "#,
            self.dimension
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Check if the database is reachable.
    pub async fn health_check(&self) -> Result<bool> {
        Ok(sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok())
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        for entry in &entries {
            if entry.embedding.len() != self.dimension {
                return Err(Error::InvalidInput(format!(
                    "embedding dimension {} does not match store dimension {}",
                    entry.embedding.len(),
                    self.dimension
                )));
            }
        }

        let count = entries.len();
        let mut tx = self.pool.begin().await?;
        for entry in entries {
            let metadata = serde_json::to_value(&entry.metadata)?;
            let IndexEntry {
                document_id,
                frame_number,
                chunk_text,
                embedding,
                ..
            } = entry;
            sqlx::query(
                r#"
                INSERT INTO frame_entry
                    (document_id, frame_number, chunk_text, embedding, metadata)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (document_id, frame_number) DO UPDATE SET
                    chunk_text = EXCLUDED.chunk_text,
                    embedding = EXCLUDED.embedding,
                    metadata = EXCLUDED.metadata
                "#,
            )
            .bind(document_id)
            .bind(frame_number as i32)
            .bind(chunk_text)
            .bind(Vector::from(embedding))
            .bind(metadata)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        debug!(count, "upserted entries");
        Ok(())
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexEntry>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vec = Vector::from(query.to_vec());
        let rows = sqlx::query(
            r#"
            SELECT document_id, frame_number, chunk_text, embedding, metadata,
                   1.0 - (embedding <=> $1) AS score
            FROM frame_entry
            ORDER BY embedding <=> $1, document_id, frame_number
            LIMIT $2
            "#,
        )
        .bind(&query_vec)
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await?;

        let hits = rows
            .into_iter()
            .map(|row| {
                let embedding: Vector = row.get("embedding");
                let metadata: serde_json::Value = row.get("metadata");
                let metadata: HashMap<String, String> =
                    serde_json::from_value(metadata).unwrap_or_default();
                IndexEntry {
                    document_id: row.get("document_id"),
                    frame_number: row.get::<i32, _>("frame_number") as u32,
                    chunk_text: row.get("chunk_text"),
                    embedding: embedding.to_vec(),
                    metadata,
                    similarity: Some(row.get::<f64, _>("score") as f32),
                }
            })
            .collect();

        Ok(hits)
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM frame_entry")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("count") as usize)
    }

    async fn delete_document(&self, document_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM frame_entry WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM frame_entry")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
