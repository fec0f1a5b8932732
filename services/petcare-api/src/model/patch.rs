//! Update payload and shallow-merge rules.
//!
//! # Purpose
//! An update replaces any subset of a pet's top-level fields. `PetPatch`
//! records, per field, whether the key was absent, explicitly `null`, or set,
//! and [`PetPatch::apply`] merges it onto the stored document.
//!
//! # Merge rules
//! - Absent keys keep the stored value.
//! - `name` and `type` are required: a value replaces, `null` clears the
//!   field so that validation rejects the write.
//! - Optional scalars (`breed`, `age`, `weight`, `nextFeeding`,
//!   `nextGrooming`): a value replaces, `null` clears.
//! - `medicalInfo` is replaced as a whole object; sub-keys missing from the
//!   new object take their defaults rather than the stored values. `null`
//!   resets it to the default.
//! - `id` and `createdAt` never change; `updatedAt` always advances.
use super::pet::{MedicalInfo, Pet};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PetPatch {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub species: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub breed: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<f64>)]
    pub age: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub weight: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub next_feeding: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub next_grooming: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<MedicalInfo>)]
    pub medical_info: Option<Option<MedicalInfo>>,
}

// Present keys decode to `Some(..)`, so `null` becomes `Some(None)` while an
// absent key falls back to the field default `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PetPatch {
    /// Merge this patch onto `existing`, stamping `updated_at` from `now`.
    ///
    /// The result is not validated; callers run [`Pet::validate`] before
    /// persisting it.
    pub fn apply(self, existing: &Pet, now: DateTime<Utc>) -> Pet {
        let mut merged = existing.clone();
        if let Some(name) = self.name {
            merged.name = name.unwrap_or_default();
        }
        if let Some(species) = self.species {
            merged.species = species.unwrap_or_default();
        }
        if let Some(breed) = self.breed {
            merged.breed = breed;
        }
        if let Some(age) = self.age {
            merged.age = age;
        }
        if let Some(weight) = self.weight {
            merged.weight = weight;
        }
        if let Some(next_feeding) = self.next_feeding {
            merged.next_feeding = next_feeding;
        }
        if let Some(next_grooming) = self.next_grooming {
            merged.next_grooming = next_grooming;
        }
        if let Some(medical_info) = self.medical_info {
            merged.medical_info = medical_info.unwrap_or_default();
        }
        merged.updated_at = advance(existing.updated_at, now);
        merged
    }
}

// `updated_at` must strictly increase even when two writes land in the same
// millisecond.
fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stored() -> Pet {
        let created: DateTime<Utc> = "2024-09-01T08:00:00Z".parse().expect("ts");
        Pet {
            id: "p1".to_string(),
            name: "Max".to_string(),
            species: "Dog".to_string(),
            breed: Some("Golden Retriever".to_string()),
            age: Some(3.0),
            weight: Some("30kg".to_string()),
            next_feeding: Some("18:00".to_string()),
            next_grooming: Some("2024-11-01".to_string()),
            medical_info: MedicalInfo {
                allergies: vec!["Chicken".to_string()],
                conditions: vec!["None".to_string()],
                last_checkup: NaiveDate::from_ymd_opt(2024, 9, 15),
            },
            created_at: created,
            updated_at: created,
        }
    }

    fn later() -> DateTime<Utc> {
        "2024-09-02T08:00:00Z".parse().expect("ts")
    }

    #[test]
    fn absent_keys_are_preserved() {
        let existing = stored();
        let patch: PetPatch = serde_json::from_str(r#"{"age": 4}"#).expect("patch");
        let merged = patch.apply(&existing, later());
        assert_eq!(merged.age, Some(4.0));
        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.breed, existing.breed);
        assert_eq!(merged.medical_info, existing.medical_info);
        assert_eq!(merged.id, existing.id);
        assert_eq!(merged.created_at, existing.created_at);
        assert_eq!(merged.updated_at, later());
    }

    #[test]
    fn null_clears_optional_fields() {
        let existing = stored();
        let patch: PetPatch =
            serde_json::from_str(r#"{"breed": null, "weight": null}"#).expect("patch");
        let merged = patch.apply(&existing, later());
        assert_eq!(merged.breed, None);
        assert_eq!(merged.weight, None);
        assert_eq!(merged.name, "Max");
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn null_required_fields_fail_validation() {
        let patch: PetPatch =
            serde_json::from_str(r#"{"name": null, "type": null}"#).expect("patch");
        let merged = patch.apply(&stored(), later());
        let err = merged.validate().expect_err("required fields cleared");
        assert_eq!(
            err.problems,
            vec!["name is required".to_string(), "type is required".to_string()]
        );
    }

    #[test]
    fn medical_info_is_replaced_wholesale() {
        let existing = stored();
        let patch: PetPatch =
            serde_json::from_str(r#"{"medicalInfo": {"conditions": ["Arthritis"]}}"#)
                .expect("patch");
        let merged = patch.apply(&existing, later());
        assert_eq!(merged.medical_info.conditions, vec!["Arthritis".to_string()]);
        assert!(merged.medical_info.allergies.is_empty());
        assert_eq!(merged.medical_info.last_checkup, None);
    }

    #[test]
    fn medical_info_null_resets_to_default() {
        let patch: PetPatch = serde_json::from_str(r#"{"medicalInfo": null}"#).expect("patch");
        let merged = patch.apply(&stored(), later());
        assert_eq!(merged.medical_info, MedicalInfo::default());
    }

    #[test]
    fn identity_and_creation_time_keys_are_ignored() {
        let existing = stored();
        let patch: PetPatch = serde_json::from_str(
            r#"{"id": "other", "createdAt": "2030-01-01T00:00:00Z", "colour": "gold"}"#,
        )
        .expect("patch");
        let merged = patch.apply(&existing, later());
        assert_eq!(merged.id, "p1");
        assert_eq!(merged.created_at, existing.created_at);
    }

    #[test]
    fn updated_at_strictly_increases_when_clock_stalls() {
        let existing = stored();
        let merged = PetPatch::default().apply(&existing, existing.updated_at);
        assert!(merged.updated_at > existing.updated_at);
        let merged_again = PetPatch::default().apply(&merged, existing.updated_at);
        assert!(merged_again.updated_at > merged.updated_at);
    }
}
