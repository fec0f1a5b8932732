//! List/detail view controller.
//!
//! # Purpose
//! Owns the state behind the pet screens: the displayed list, which screen is
//! active, the loading flag, and the last error message. Front ends render
//! from it and forward user actions to it.
//!
//! # Transitions
//! - `Listing` to `Editing` on [`add_new`](PetListController::add_new) or
//!   [`edit`](PetListController::edit). Editing an existing pet always
//!   refetches it first.
//! - `Editing` to `Listing` on a successful save (which reloads the list) or
//!   on cancel.
//! - `Listing` to `ConfirmingDelete` on a delete request, and back on confirm
//!   (after the delete succeeds) or dismiss.
//!
//! Actions that do not apply to the current screen are ignored. A failed
//! call records an error and leaves the displayed state as it was.
use crate::api::{ClientResult, PetApi};
use crate::form::ProfileForm;
use crate::model::Pet;

const LOAD_FAILED: &str = "Failed to load pets";
const DELETE_FAILED: &str = "Failed to delete pet";

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Listing,
    Editing(ProfileForm),
    ConfirmingDelete(Pet),
}

pub struct PetListController<A> {
    api: A,
    pets: Vec<Pet>,
    view: View,
    selected: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl<A: PetApi> PetListController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            pets: Vec::new(),
            view: View::Listing,
            selected: None,
            loading: false,
            error: None,
        }
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Id of the pet most recently opened for editing.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn form(&self) -> Option<&ProfileForm> {
        match &self.view {
            View::Editing(form) => Some(form),
            _ => None,
        }
    }

    /// Replace the draft while editing, e.g. with the result of
    /// `form.add_allergy(..)`.
    pub fn update_form(&mut self, form: ProfileForm) {
        if let View::Editing(current) = &mut self.view {
            *current = form;
        }
    }

    /// Fetch the full list. On failure the previous list stays displayed.
    pub async fn load(&mut self) -> ClientResult<()> {
        self.loading = true;
        self.error = None;
        let result = self.api.list_pets().await;
        self.loading = false;
        match result {
            Ok(pets) => {
                self.pets = pets;
                Ok(())
            }
            Err(err) => {
                self.error = Some(LOAD_FAILED.to_string());
                Err(err)
            }
        }
    }

    pub fn add_new(&mut self) {
        if self.view == View::Listing {
            self.error = None;
            self.view = View::Editing(ProfileForm::new());
        }
    }

    /// Open an existing pet, starting from a fresh copy from the server.
    pub async fn edit(&mut self, id: &str) -> ClientResult<()> {
        if self.view != View::Listing {
            return Ok(());
        }
        self.error = None;
        match self.api.get_pet(id).await {
            Ok(pet) => {
                self.selected = Some(pet.id.clone());
                self.view = View::Editing(ProfileForm::edit(&pet));
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Create or update from the current draft, then reload the list.
    ///
    /// On failure the form stays open with the draft intact. Once the save
    /// succeeds this returns `Ok` even if the reload fails; that failure
    /// shows up as the `Failed to load pets` error with the old list kept.
    pub async fn save(&mut self) -> ClientResult<()> {
        let View::Editing(form) = &self.view else {
            return Ok(());
        };
        let form = form.clone();
        let pet_id = form.pet_id().map(str::to_string);
        let api = &self.api;
        let saved = form
            .submit(|draft| async move {
                match pet_id {
                    Some(id) => api.update_pet(&id, &draft).await,
                    None => api.create_pet(&draft).await,
                }
            })
            .await;
        match saved {
            Ok(pet) => {
                tracing::debug!(pet_id = %pet.id, "pet saved");
                self.view = View::Listing;
                if let Err(err) = self.load().await {
                    tracing::debug!(error = %err, "reload after save failed");
                }
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn cancel(&mut self) {
        if !matches!(self.view, View::Editing(_)) {
            return;
        }
        if let View::Editing(form) = std::mem::replace(&mut self.view, View::Listing) {
            form.cancel();
        }
        self.error = None;
    }

    /// Leave the profile screen without saving.
    pub fn back_to_list(&mut self) {
        self.cancel();
    }

    /// Ask for confirmation before deleting a displayed pet.
    pub fn request_delete(&mut self, id: &str) {
        if self.view != View::Listing {
            return;
        }
        if let Some(pet) = self.pets.iter().find(|pet| pet.id == id) {
            self.view = View::ConfirmingDelete(pet.clone());
        }
    }

    /// Delete the pet under confirmation and drop it from the displayed list.
    ///
    /// On failure the confirmation stays open and the list is unchanged.
    pub async fn confirm_delete(&mut self) -> ClientResult<()> {
        let View::ConfirmingDelete(pet) = &self.view else {
            return Ok(());
        };
        let id = pet.id.clone();
        match self.api.delete_pet(&id).await {
            Ok(_) => {
                self.pets.retain(|pet| pet.id != id);
                if self.selected.as_deref() == Some(id.as_str()) {
                    self.selected = None;
                }
                self.error = None;
                self.view = View::Listing;
                Ok(())
            }
            Err(err) => {
                self.error = Some(DELETE_FAILED.to_string());
                Err(err)
            }
        }
    }

    pub fn dismiss_delete(&mut self) {
        if matches!(self.view, View::ConfirmingDelete(_)) {
            self.view = View::Listing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientError, OP_CREATE, OP_DELETE, OP_GET, OP_LIST, OP_UPDATE};
    use crate::model::{DeleteConfirmation, MedicalInfo, PetDraft};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn failed(operation: &'static str) -> ClientError {
        ClientError::RequestFailed {
            operation,
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        }
    }

    fn pet(id: &str, name: &str) -> Pet {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Pet {
            id: id.into(),
            name: name.into(),
            species: "Dog".into(),
            breed: None,
            age: None,
            weight: None,
            next_feeding: None,
            next_grooming: None,
            medical_info: MedicalInfo::default(),
            created_at: at,
            updated_at: at,
        }
    }

    #[derive(Default)]
    struct FakeApi {
        pets: Mutex<Vec<Pet>>,
        fail_list: AtomicBool,
        fail_delete: AtomicBool,
        fail_save: AtomicBool,
        list_calls: AtomicUsize,
        get_calls: AtomicUsize,
        next_id: AtomicUsize,
    }

    impl FakeApi {
        fn with_pets(pets: Vec<Pet>) -> Self {
            Self {
                pets: Mutex::new(pets),
                ..Self::default()
            }
        }

        fn rename_on_server(&self, id: &str, name: &str) {
            let mut pets = self.pets.lock().unwrap();
            if let Some(pet) = pets.iter_mut().find(|pet| pet.id == id) {
                pet.name = name.to_string();
            }
        }
    }

    #[async_trait]
    impl PetApi for FakeApi {
        async fn list_pets(&self) -> ClientResult<Vec<Pet>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(failed(OP_LIST));
            }
            Ok(self.pets.lock().unwrap().clone())
        }

        async fn get_pet(&self, id: &str) -> ClientResult<Pet> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.pets
                .lock()
                .unwrap()
                .iter()
                .find(|pet| pet.id == id)
                .cloned()
                .ok_or_else(|| failed(OP_GET))
        }

        async fn create_pet(&self, draft: &PetDraft) -> ClientResult<Pet> {
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(failed(OP_CREATE));
            }
            let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
            let mut created = pet(&id, &draft.name);
            created.species = draft.species.clone();
            created.medical_info = draft.medical_info.clone();
            self.pets.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update_pet(&self, id: &str, draft: &PetDraft) -> ClientResult<Pet> {
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(failed(OP_UPDATE));
            }
            let mut pets = self.pets.lock().unwrap();
            let existing = pets
                .iter_mut()
                .find(|pet| pet.id == id)
                .ok_or_else(|| failed(OP_UPDATE))?;
            existing.name = draft.name.clone();
            existing.medical_info = draft.medical_info.clone();
            Ok(existing.clone())
        }

        async fn delete_pet(&self, id: &str) -> ClientResult<DeleteConfirmation> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(failed(OP_DELETE));
            }
            self.pets.lock().unwrap().retain(|pet| pet.id != id);
            Ok(DeleteConfirmation {
                message: "Pet deleted successfully".into(),
            })
        }
    }

    async fn loaded(api: FakeApi) -> PetListController<FakeApi> {
        let mut controller = PetListController::new(api);
        controller.load().await.expect("load");
        controller
    }

    #[tokio::test]
    async fn load_populates_list_and_clears_loading() {
        let controller = loaded(FakeApi::with_pets(vec![pet("a", "Max"), pet("b", "Luna")])).await;
        assert_eq!(controller.pets().len(), 2);
        assert!(!controller.is_loading());
        assert_eq!(controller.error(), None);
        assert_eq!(controller.view(), &View::Listing);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let mut controller = loaded(FakeApi::with_pets(vec![pet("a", "Max")])).await;
        controller.api().fail_list.store(true, Ordering::SeqCst);

        assert!(controller.load().await.is_err());
        assert_eq!(controller.error(), Some("Failed to load pets"));
        assert_eq!(controller.pets().len(), 1);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn edit_refetches_instead_of_using_the_listed_copy() {
        let mut controller = loaded(FakeApi::with_pets(vec![pet("a", "Max")])).await;
        controller.api().rename_on_server("a", "Maximus");

        controller.edit("a").await.expect("edit");
        assert_eq!(controller.api().get_calls.load(Ordering::SeqCst), 1);
        let form = controller.form().expect("editing");
        assert_eq!(form.pet_id(), Some("a"));
        assert_eq!(form.draft().name, "Maximus");
        assert_eq!(controller.selected(), Some("a"));
    }

    #[tokio::test]
    async fn save_new_pet_reloads_and_returns_to_listing() {
        let mut controller = loaded(FakeApi::default()).await;
        controller.add_new();
        let form = controller.form().expect("editing").clone();
        assert!(form.is_new());
        let form = form
            .set_path("name", "Kiwi")
            .and_then(|form| form.set_path("type", "Bird"))
            .expect("fields")
            .add_allergy("seeds");
        controller.update_form(form);

        controller.save().await.expect("save");
        assert_eq!(controller.view(), &View::Listing);
        assert_eq!(controller.api().list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(controller.pets().len(), 1);
        assert_eq!(controller.pets()[0].medical_info.allergies, vec!["seeds"]);
    }

    #[tokio::test]
    async fn save_succeeds_even_when_the_reload_fails() {
        let mut controller = loaded(FakeApi::with_pets(vec![pet("a", "Max")])).await;
        controller.add_new();
        let form = controller
            .form()
            .expect("editing")
            .set_path("name", "Kiwi")
            .and_then(|form| form.set_path("type", "Bird"))
            .expect("fields");
        controller.update_form(form);
        controller.api().fail_list.store(true, Ordering::SeqCst);

        controller.save().await.expect("save persisted");
        assert_eq!(controller.view(), &View::Listing);
        assert_eq!(controller.error(), Some("Failed to load pets"));
        assert_eq!(controller.pets().len(), 1);
        assert_eq!(controller.api().pets.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_form_open() {
        let mut controller = loaded(FakeApi::with_pets(vec![pet("a", "Max")])).await;
        controller.edit("a").await.expect("edit");
        let form = controller.form().expect("editing").set_path("name", "Rex").expect("name");
        controller.update_form(form.clone());
        controller.api().fail_save.store(true, Ordering::SeqCst);

        assert!(controller.save().await.is_err());
        assert_eq!(controller.error(), Some("Failed to update pet"));
        assert_eq!(controller.form(), Some(&form));
        assert_eq!(controller.pets()[0].name, "Max");
    }

    #[tokio::test]
    async fn cancel_discards_the_draft() {
        let mut controller = loaded(FakeApi::with_pets(vec![pet("a", "Max")])).await;
        controller.edit("a").await.expect("edit");
        let form = controller.form().expect("editing").set_path("name", "Rex").expect("name");
        controller.update_form(form);

        controller.back_to_list();
        assert_eq!(controller.view(), &View::Listing);
        assert_eq!(controller.pets()[0].name, "Max");
        assert_eq!(controller.api().get_pet("a").await.expect("get").name, "Max");
    }

    #[tokio::test]
    async fn confirmed_delete_removes_locally_and_clears_selection() {
        let mut controller =
            loaded(FakeApi::with_pets(vec![pet("a", "Max"), pet("b", "Luna")])).await;
        controller.edit("a").await.expect("edit");
        controller.cancel();
        assert_eq!(controller.selected(), Some("a"));

        controller.request_delete("a");
        assert!(matches!(controller.view(), View::ConfirmingDelete(pet) if pet.id == "a"));
        controller.confirm_delete().await.expect("delete");

        assert_eq!(controller.view(), &View::Listing);
        assert_eq!(controller.selected(), None);
        let ids: Vec<&str> = controller.pets().iter().map(|pet| pet.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(controller.api().list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_and_confirmation() {
        let mut controller = loaded(FakeApi::with_pets(vec![pet("a", "Max")])).await;
        controller.api().fail_delete.store(true, Ordering::SeqCst);
        controller.request_delete("a");

        assert!(controller.confirm_delete().await.is_err());
        assert_eq!(controller.error(), Some("Failed to delete pet"));
        assert!(matches!(controller.view(), View::ConfirmingDelete(_)));
        assert_eq!(controller.pets().len(), 1);

        controller.dismiss_delete();
        assert_eq!(controller.view(), &View::Listing);
        assert_eq!(controller.pets().len(), 1);
    }

    #[tokio::test]
    async fn actions_outside_their_screen_are_ignored() {
        let mut controller = loaded(FakeApi::with_pets(vec![pet("a", "Max")])).await;
        controller.request_delete("missing");
        assert_eq!(controller.view(), &View::Listing);

        controller.request_delete("a");
        controller.add_new();
        controller.cancel();
        assert!(matches!(controller.view(), View::ConfirmingDelete(_)));
        controller.save().await.expect("no-op");
        assert!(matches!(controller.view(), View::ConfirmingDelete(_)));
    }
}
