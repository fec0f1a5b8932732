//! Profile form state.
//!
//! # Purpose
//! Holds the draft being edited on the profile screen: a blank template when
//! adding a pet, or a copy of a freshly fetched pet when editing one.
//!
//! # Key invariants
//! - Every edit returns a new `ProfileForm`; the receiver is never mutated,
//!   so a previously rendered form stays consistent.
//! - Blank allergy/condition entries are never appended; entries are stored
//!   trimmed.
//! - Removing by index keeps the relative order of the remaining entries.
use crate::model::{Pet, PetDraft, SPECIES_OPTIONS};
use chrono::NaiveDate;
use std::future::Future;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("age must be a non-negative number, got {0:?}")]
    InvalidAge(String),
    #[error("last checkup must be a date (YYYY-MM-DD), got {0:?}")]
    InvalidDate(String),
}

/// Scalar fields addressable by their document path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetField {
    Name,
    Species,
    Breed,
    Age,
    Weight,
    NextFeeding,
    NextGrooming,
    LastCheckup,
}

impl FromStr for PetField {
    type Err = FormError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        match path {
            "name" => Ok(PetField::Name),
            "type" => Ok(PetField::Species),
            "breed" => Ok(PetField::Breed),
            "age" => Ok(PetField::Age),
            "weight" => Ok(PetField::Weight),
            "nextFeeding" => Ok(PetField::NextFeeding),
            "nextGrooming" => Ok(PetField::NextGrooming),
            "medicalInfo.lastCheckup" => Ok(PetField::LastCheckup),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MedicalList {
    Allergies,
    Conditions,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pet_id: Option<String>,
    draft: PetDraft,
}

impl ProfileForm {
    /// Blank template for a new pet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing pet.
    pub fn edit(pet: &Pet) -> Self {
        Self {
            pet_id: Some(pet.id.clone()),
            draft: PetDraft::from(pet),
        }
    }

    /// Id of the pet being edited, `None` when creating.
    pub fn pet_id(&self) -> Option<&str> {
        self.pet_id.as_deref()
    }

    pub fn draft(&self) -> &PetDraft {
        &self.draft
    }

    pub fn is_new(&self) -> bool {
        self.pet_id.is_none()
    }

    pub fn species_suggestions(&self) -> &'static [&'static str] {
        &SPECIES_OPTIONS
    }

    /// Set a field addressed by path, e.g. `"breed"` or
    /// `"medicalInfo.lastCheckup"`.
    pub fn set_path(&self, path: &str, value: &str) -> Result<Self, FormError> {
        self.set(path.parse()?, value)
    }

    /// Set a single field from raw input.
    ///
    /// Optional fields are cleared by blank input. `age` must parse as a
    /// non-negative number and `lastCheckup` as `YYYY-MM-DD`.
    pub fn set(&self, field: PetField, value: &str) -> Result<Self, FormError> {
        let mut next = self.clone();
        let draft = &mut next.draft;
        match field {
            PetField::Name => draft.name = value.to_string(),
            PetField::Species => draft.species = value.to_string(),
            PetField::Breed => draft.breed = optional_text(value),
            PetField::Weight => draft.weight = optional_text(value),
            PetField::NextFeeding => draft.next_feeding = optional_text(value),
            PetField::NextGrooming => draft.next_grooming = optional_text(value),
            PetField::Age => draft.age = parse_age(value)?,
            PetField::LastCheckup => {
                draft.medical_info.last_checkup = parse_checkup(value)?;
            }
        }
        Ok(next)
    }

    #[must_use]
    pub fn add_allergy(&self, entry: &str) -> Self {
        self.append(MedicalList::Allergies, entry)
    }

    #[must_use]
    pub fn remove_allergy(&self, index: usize) -> Self {
        self.remove(MedicalList::Allergies, index)
    }

    #[must_use]
    pub fn add_condition(&self, entry: &str) -> Self {
        self.append(MedicalList::Conditions, entry)
    }

    #[must_use]
    pub fn remove_condition(&self, index: usize) -> Self {
        self.remove(MedicalList::Conditions, index)
    }

    fn append(&self, list: MedicalList, entry: &str) -> Self {
        let entry = entry.trim();
        let mut next = self.clone();
        if !entry.is_empty() {
            next.list_mut(list).push(entry.to_string());
        }
        next
    }

    fn remove(&self, list: MedicalList, index: usize) -> Self {
        let mut next = self.clone();
        let entries = next.list_mut(list);
        if index < entries.len() {
            entries.remove(index);
        }
        next
    }

    fn list_mut(&mut self, list: MedicalList) -> &mut Vec<String> {
        match list {
            MedicalList::Allergies => &mut self.draft.medical_info.allergies,
            MedicalList::Conditions => &mut self.draft.medical_info.conditions,
        }
    }

    /// Hand the full draft to `save` and return whatever it produces.
    pub async fn submit<F, Fut>(self, save: F) -> Fut::Output
    where
        F: FnOnce(PetDraft) -> Fut,
        Fut: Future,
    {
        save(self.draft).await
    }

    /// Discard the draft. Nothing is persisted.
    pub fn cancel(self) {
        tracing::debug!(pet_id = ?self.pet_id, "profile form discarded");
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_age(value: &str) -> Result<Option<f64>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(age) if age.is_finite() && age >= 0.0 => Ok(Some(age)),
        _ => Err(FormError::InvalidAge(value.to_string())),
    }
}

fn parse_checkup(value: &str) -> Result<Option<NaiveDate>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate(value.to_string()))
}
