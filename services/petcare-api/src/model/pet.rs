//! Pet document definitions and write-time validation.
//!
//! # Purpose
//! Defines the single stored entity (`Pet`), its nested medical record, and the
//! creation payload that a store turns into a document.
//!
//! # Key invariants
//! - `id`, `created_at` are assigned once by the store and never change.
//! - `created_at <= updated_at` for every stored document.
//! - `name` and `species` are non-empty; `age`, when set, is not negative.
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Nested medical record. Replaced wholesale on update, never merged per key.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfo {
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checkup: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_feeding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_grooming: Option<String>,
    #[serde(default)]
    pub medical_info: MedicalInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rejected write, carrying one entry per failed field.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Pet validation failed: {}", .problems.join(", "))]
pub struct ValidationError {
    pub problems: Vec<String>,
}

impl Pet {
    /// Check the document-level constraints enforced on every write.
    ///
    /// # Errors
    /// - Returns [`ValidationError`] listing every failed field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        }
        if self.species.trim().is_empty() {
            problems.push("type is required".to_string());
        }
        if let Some(age) = self.age {
            if !age.is_finite() || age < 0.0 {
                problems.push(format!("age must be a non-negative number, got {age}"));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { problems })
        }
    }
}

/// Creation payload: every client-settable field of a pet, all optional on
/// the wire so that missing required fields surface as validation errors
/// rather than decode failures.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age: Option<f64>,
    pub weight: Option<String>,
    pub next_feeding: Option<String>,
    pub next_grooming: Option<String>,
    pub medical_info: Option<MedicalInfo>,
}

impl NewPet {
    /// Build the stored document for a store-assigned `id`.
    ///
    /// `created_at` and `updated_at` are both set to `now`.
    ///
    /// # Errors
    /// - Returns [`ValidationError`] if the resulting document is invalid.
    pub fn into_pet(self, id: String, now: DateTime<Utc>) -> Result<Pet, ValidationError> {
        let pet = Pet {
            id,
            name: self.name.unwrap_or_default(),
            species: self.species.unwrap_or_default(),
            breed: self.breed,
            age: self.age,
            weight: self.weight,
            next_feeding: self.next_feeding,
            next_grooming: self.next_grooming,
            medical_info: self.medical_info.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        pet.validate()?;
        Ok(pet)
    }
}

/// Current time at the millisecond precision documents are stored with.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: &str) -> DateTime<Utc> {
        ts.parse().expect("timestamp")
    }

    #[test]
    fn into_pet_sets_defaults_and_timestamps() {
        let now = at("2024-09-15T10:00:00.123Z");
        let pet = NewPet {
            name: Some("Max".to_string()),
            species: Some("Dog".to_string()),
            ..NewPet::default()
        }
        .into_pet("abc".to_string(), now)
        .expect("valid");
        assert_eq!(pet.id, "abc");
        assert_eq!(pet.created_at, now);
        assert_eq!(pet.updated_at, now);
        assert!(pet.medical_info.allergies.is_empty());
        assert!(pet.medical_info.conditions.is_empty());
    }

    #[test]
    fn into_pet_reports_every_missing_required_field() {
        let err = NewPet {
            species: Some("   ".to_string()),
            age: Some(-1.0),
            ..NewPet::default()
        }
        .into_pet("abc".to_string(), now_millis())
        .expect_err("invalid");
        assert_eq!(err.problems.len(), 3);
        let text = err.to_string();
        assert!(text.starts_with("Pet validation failed: "));
        assert!(text.contains("name is required"));
        assert!(text.contains("type is required"));
    }

    #[test]
    fn pet_json_uses_document_field_names() {
        let now = at("2024-09-15T10:00:00Z");
        let pet = NewPet {
            name: Some("Max".to_string()),
            species: Some("Dog".to_string()),
            next_feeding: Some("18:00".to_string()),
            medical_info: Some(MedicalInfo {
                allergies: vec!["Chicken".to_string()],
                conditions: vec![],
                last_checkup: NaiveDate::from_ymd_opt(2024, 9, 15),
            }),
            ..NewPet::default()
        }
        .into_pet("abc".to_string(), now)
        .expect("valid");
        let value = serde_json::to_value(&pet).expect("json");
        assert_eq!(value["type"], "Dog");
        assert_eq!(value["nextFeeding"], "18:00");
        assert_eq!(value["medicalInfo"]["lastCheckup"], "2024-09-15");
        assert_eq!(value["medicalInfo"]["allergies"][0], "Chicken");
        assert!(value.get("breed").is_none());
        assert!(value.get("createdAt").is_some());

        let decoded: Pet = serde_json::from_value(value).expect("decode");
        assert_eq!(decoded, pet);
    }

    #[test]
    fn now_millis_drops_sub_millisecond_precision() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
