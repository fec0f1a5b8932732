//! Postgres-backed implementation of the pet store.
//!
//! # What this module is
//! Implements `PetStore` on top of a single `pets` table used as a document
//! collection: each row holds one pet as a JSONB document, plus the id and
//! timestamp columns the document carries, so rows can be addressed and
//! ordered without decoding JSON.
//!
//! # Key invariants
//! - The `document` column is the authoritative copy; `id`, `created_at` and
//!   `updated_at` columns mirror it and are written in the same statement.
//! - Ids are generated here (UUIDv4) and never reused.
//! - Updates read, merge and write inside one transaction. No row lock is
//!   taken, so concurrent updates to the same pet are last-write-wins.
//!
//! # Operational notes
//! - Migrations run at startup via `sqlx::migrate!("./migrations")`.
//! - Connection URLs may contain credentials; never log them.
use super::{PetStore, StoreError, StoreResult, parse_id};
use crate::config::PostgresConfig;
use crate::model::{NewPet, Pet, PetPatch, now_millis};
use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use std::time::Duration;

/// Durable pet store backed by Postgres.
///
/// # Example
/// ```rust,no_run
/// use petcare_api::config::PostgresConfig;
/// use petcare_api::store::postgres::PostgresStore;
///
/// async fn open(pg: PostgresConfig) {
///     let _ = PostgresStore::connect(&pg).await;
/// }
/// ```
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a pool and apply migrations.
    ///
    /// # Errors
    /// - Invalid connection URL, connect timeout, pool setup or migration
    ///   failures.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        Self::connect_internal(pg, true).await
    }

    /// Open a pool against an existing schema, for tests that manage
    /// migrations themselves.
    #[cfg(any(test, feature = "pg-tests"))]
    pub async fn connect_without_migrations(pg: &PostgresConfig) -> StoreResult<Self> {
        Self::connect_internal(pg, false).await
    }

    async fn connect_internal(pg: &PostgresConfig, run_migrations: bool) -> StoreResult<Self> {
        let connect_options = PgConnectOptions::from_str(&pg.url)?;
        let connect = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options);
        let pool = tokio::time::timeout(Duration::from_millis(pg.connect_timeout_ms), connect)
            .await
            .map_err(|_| anyhow!("timed out connecting to postgres"))??;

        if run_migrations {
            // Handlers assume the schema exists; fail startup otherwise.
            sqlx::migrate!("./migrations").run(&pool).await?;
        }

        Ok(Self { pool })
    }

    // The write has already committed when this runs, so a failed count
    // only leaves the gauge stale.
    async fn refresh_count(&self) {
        let total: Result<i64, sqlx::Error> = sqlx::query_scalar("SELECT COUNT(*) FROM pets")
            .fetch_one(&self.pool)
            .await;
        match total {
            Ok(total) => metrics::gauge!("petcare_pets_total").set(total as f64),
            Err(err) => tracing::warn!(error = %err, "failed to refresh pet count gauge"),
        }
    }
}

#[async_trait]
impl PetStore for PostgresStore {
    async fn list_pets(&self) -> StoreResult<Vec<Pet>> {
        let rows: Vec<Json<Pet>> =
            sqlx::query_scalar("SELECT document FROM pets ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|Json(pet)| pet).collect())
    }

    async fn get_pet(&self, id: &str) -> StoreResult<Pet> {
        let key = parse_id(id)?;
        let row: Option<Json<Pet>> = sqlx::query_scalar("SELECT document FROM pets WHERE id = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(Json(pet)) => Ok(pet),
            None => Err(StoreError::NotFound("pet".into())),
        }
    }

    async fn create_pet(&self, pet: NewPet) -> StoreResult<Pet> {
        let key = uuid::Uuid::new_v4();
        let pet = pet.into_pet(key.to_string(), now_millis())?;
        sqlx::query(
            r#"INSERT INTO pets (id, document, created_at, updated_at) VALUES ($1, $2, $3, $4)"#,
        )
        .bind(key)
        .bind(Json(&pet))
        .bind(pet.created_at)
        .bind(pet.updated_at)
        .execute(&self.pool)
        .await?;
        metrics::counter!("petcare_pet_changes_total", "op" => "created").increment(1);
        self.refresh_count().await;
        Ok(pet)
    }

    async fn update_pet(&self, id: &str, patch: PetPatch) -> StoreResult<Pet> {
        let key = parse_id(id)?;
        let mut tx = self.pool.begin().await?;
        let row: Option<Json<Pet>> = sqlx::query_scalar("SELECT document FROM pets WHERE id = $1")
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(Json(existing)) = row else {
            return Err(StoreError::NotFound("pet".into()));
        };

        let merged = patch.apply(&existing, now_millis());
        merged.validate()?;

        sqlx::query(r#"UPDATE pets SET document = $2, updated_at = $3 WHERE id = $1"#)
            .bind(key)
            .bind(Json(&merged))
            .bind(merged.updated_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        metrics::counter!("petcare_pet_changes_total", "op" => "updated").increment(1);
        Ok(merged)
    }

    async fn delete_pet(&self, id: &str) -> StoreResult<()> {
        let key = parse_id(id)?;
        let removed = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        if removed.rows_affected() == 0 {
            return Err(StoreError::NotFound("pet".into()));
        }
        metrics::counter!("petcare_pet_changes_total", "op" => "deleted").increment(1);
        self.refresh_count().await;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
