//! Pet data model module.
//!
//! # Purpose
//! Re-exports the stored pet document, the creation payload, and the update
//! patch with its merge rules, shared by the API and store layers.
mod patch;
mod pet;

pub use patch::PetPatch;
pub use pet::{MedicalInfo, NewPet, Pet, ValidationError, now_millis};
