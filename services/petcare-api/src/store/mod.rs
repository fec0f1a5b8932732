//! Document store abstraction for pet records.
//!
//! # Purpose
//! Defines the `PetStore` trait that handlers talk to and the error taxonomy
//! every backend reports through. Backends assign identifiers and timestamps,
//! validate documents before writing, and never retry.
use crate::model::{NewPet, Pet, PetPatch, ValidationError};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Collection of pet documents.
///
/// Every operation is independent; concurrent updates to the same document
/// are last-write-wins.
#[async_trait]
pub trait PetStore: Send + Sync {
    /// All stored pets, in whatever order the backend yields them.
    async fn list_pets(&self) -> StoreResult<Vec<Pet>>;
    async fn get_pet(&self, id: &str) -> StoreResult<Pet>;
    /// Assign an id and timestamps, validate, and persist.
    async fn create_pet(&self, pet: NewPet) -> StoreResult<Pet>;
    /// Shallow-merge `patch` onto the stored pet and persist the result.
    async fn update_pet(&self, id: &str, patch: PetPatch) -> StoreResult<Pet>;
    async fn delete_pet(&self, id: &str) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Parse a client-supplied id under the UUID addressing scheme both backends
/// use.
pub(crate) fn parse_id(id: &str) -> StoreResult<uuid::Uuid> {
    uuid::Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}
