//! In-memory implementation of the pet store.
//!
//! # Purpose
//! Implements `PetStore` with a `HashMap` guarded by `tokio::sync::RwLock`. It
//! exists for local development and tests, and for deployments where
//! durability is not required.
//!
//! # Durability and consistency
//! - **Not durable**: all pets are lost on process restart.
//! - Mutations take the write lock for their whole read-merge-write cycle, so
//!   each one is atomic within this process.
//! - Ids are UUIDv4 values; a deleted id is never issued again.
use super::{PetStore, StoreError, StoreResult, parse_id};
use crate::model::{NewPet, Pet, PetPatch, now_millis};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    /// Authoritative pet documents keyed by id.
    pets: Arc<RwLock<HashMap<Uuid, Pet>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PetStore for InMemoryStore {
    async fn list_pets(&self) -> StoreResult<Vec<Pet>> {
        Ok(self.pets.read().await.values().cloned().collect())
    }

    async fn get_pet(&self, id: &str) -> StoreResult<Pet> {
        let key = parse_id(id)?;
        self.pets
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("pet".into()))
    }

    async fn create_pet(&self, pet: NewPet) -> StoreResult<Pet> {
        let mut pets = self.pets.write().await;
        let mut key = Uuid::new_v4();
        while pets.contains_key(&key) {
            key = Uuid::new_v4();
        }
        let pet = pet.into_pet(key.to_string(), now_millis())?;
        pets.insert(key, pet.clone());
        metrics::counter!("petcare_pet_changes_total", "op" => "created").increment(1);
        metrics::gauge!("petcare_pets_total").set(pets.len() as f64);
        Ok(pet)
    }

    async fn update_pet(&self, id: &str, patch: PetPatch) -> StoreResult<Pet> {
        let key = parse_id(id)?;
        let mut pets = self.pets.write().await;
        let existing = pets
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound("pet".into()))?;
        let merged = patch.apply(existing, now_millis());
        // A rejected merge leaves the stored document untouched.
        merged.validate()?;
        *existing = merged.clone();
        metrics::counter!("petcare_pet_changes_total", "op" => "updated").increment(1);
        Ok(merged)
    }

    async fn delete_pet(&self, id: &str) -> StoreResult<()> {
        let key = parse_id(id)?;
        let mut pets = self.pets.write().await;
        if pets.remove(&key).is_none() {
            return Err(StoreError::NotFound("pet".into()));
        }
        metrics::counter!("petcare_pet_changes_total", "op" => "deleted").increment(1);
        metrics::gauge!("petcare_pets_total").set(pets.len() as f64);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        // Always healthy while the process is running.
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
