//! Client side of the pet care service.
//!
//! # Purpose
//! Provides a typed HTTP client for the pet API, the draft state behind the
//! profile form, and the controller that drives the list/detail screens.
//!
//! # Notes
//! Nothing here renders UI. The controller exposes plain state that any
//! front end can draw, and every server call goes through the `PetApi` trait
//! so the state machine can be exercised without a network.
pub mod api;
pub mod config;
pub mod form;
pub mod model;
pub mod view;

pub use api::{ClientError, ClientResult, PetApi, PetClient};
pub use config::ClientConfig;
pub use form::{FormError, PetField, ProfileForm};
pub use model::{DeleteConfirmation, MedicalInfo, Pet, PetDraft, PetIcon, SPECIES_OPTIONS};
pub use view::{PetListController, View};
