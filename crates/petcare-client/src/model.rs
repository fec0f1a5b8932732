//! Pet documents as seen by the client.
//!
//! `Pet` mirrors what the server returns. `PetDraft` is what the profile form
//! edits and what gets sent back on create and update.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Species offered as suggestions by the profile form. Free text is still
/// accepted.
pub const SPECIES_OPTIONS: [&str; 4] = ["Dog", "Cat", "Bird", "Other"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalInfo {
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
    pub last_checkup: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub species: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub next_feeding: Option<String>,
    #[serde(default)]
    pub next_grooming: Option<String>,
    #[serde(default)]
    pub medical_info: MedicalInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    pub fn icon(&self) -> PetIcon {
        PetIcon::for_species(&self.species)
    }
}

/// Editable pet fields.
///
/// Unset optional fields serialize as `null`, so sending a draft on update
/// clears anything the user emptied in the form. `medicalInfo` is always sent
/// and replaces the stored one as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<f64>,
    pub weight: Option<String>,
    pub next_feeding: Option<String>,
    pub next_grooming: Option<String>,
    pub medical_info: MedicalInfo,
}

impl From<&Pet> for PetDraft {
    fn from(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            age: pet.age,
            weight: pet.weight.clone(),
            next_feeding: pet.next_feeding.clone(),
            next_grooming: pet.next_grooming.clone(),
            medical_info: pet.medical_info.clone(),
        }
    }
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetIcon {
    Dog,
    Cat,
    Generic,
}

impl PetIcon {
    pub fn for_species(species: &str) -> Self {
        match species.trim().to_ascii_lowercase().as_str() {
            "dog" => PetIcon::Dog,
            "cat" => PetIcon::Cat,
            _ => PetIcon::Generic,
        }
    }
}
