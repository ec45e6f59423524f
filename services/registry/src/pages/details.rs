//! User details page with the edit modal and address management
//!
//! Address edits are staged in a map keyed by address id and never touch
//! the loaded user. The loaded user only changes by re-fetching it after a
//! successful call, so cancelling always leaves the last fetched record.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::models::{AddressId, AddressPayload, AddressType, Gender, User, UserId, UserUpdate};
use common::validation::{
    Field, FieldErrors, collect, validate_address_text, validate_birthdate, validate_name,
    validate_surname,
};
use tracing::info;

use crate::error::ServiceResult;
use crate::pages::{Alert, LoadState};
use crate::prompt::Confirm;
use crate::user_service::UserService;

const NOT_EDITING: &str = "Enter edit mode to manage addresses";
const DELETE_ADDRESS_QUESTION: &str = "Are you sure you want to delete this address?";

/// Fields of the user edit modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    pub birthdate: Option<NaiveDate>,
}

impl EditForm {
    fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            surname: user.surname.clone(),
            gender: user.gender,
            birthdate: Some(user.birthdate),
        }
    }

    fn validate(&self, today: NaiveDate) -> Result<UserUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        collect(&mut errors, Field::Name, validate_name(&self.name));
        collect(&mut errors, Field::Surname, validate_surname(&self.surname));
        collect(
            &mut errors,
            Field::Birthdate,
            validate_birthdate(self.birthdate, today),
        );

        match self.birthdate {
            Some(birthdate) if errors.is_empty() => Ok(UserUpdate {
                name: self.name.trim().to_string(),
                surname: self.surname.trim().to_string(),
                gender: self.gender,
                birthdate,
            }),
            _ => Err(errors),
        }
    }
}

/// Details page of a single user
#[derive(Debug)]
pub struct DetailsPage {
    user_id: UserId,
    state: LoadState<User>,
    /// `Some` while the edit modal is open
    modal: Option<EditForm>,
    /// Address rows being edited, by address id
    staged: BTreeMap<AddressId, AddressPayload>,
    new_address: AddressPayload,
}

impl DetailsPage {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            state: LoadState::Loading,
            modal: None,
            staged: BTreeMap::new(),
            new_address: AddressPayload::default(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn state(&self) -> &LoadState<User> {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.loaded()
    }

    /// Fetch the user named by the route
    pub async fn load(&mut self, service: &UserService) {
        self.state = LoadState::Loading;
        self.state = match service.get_user_by_id(self.user_id).await {
            Ok(user) => LoadState::Loaded(user),
            Err(error) if error.is_not_found() => LoadState::NotFound,
            Err(error) => LoadState::Failed(
                error
                    .message()
                    .unwrap_or("Failed to load user details.")
                    .to_string(),
            ),
        };
    }

    /// Re-fetch after a mutation, keeping the previous record on failure
    async fn refetch(&mut self, service: &UserService) -> ServiceResult<()> {
        let user = service.get_user_by_id(self.user_id).await?;
        self.state = LoadState::Loaded(user);
        Ok(())
    }

    pub fn is_editing(&self) -> bool {
        self.modal.is_some()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.modal.as_mut()
    }

    /// Open the edit modal with the user's current fields
    pub fn begin_edit(&mut self) -> bool {
        match self.state.loaded() {
            Some(user) => {
                self.modal = Some(EditForm::from_user(user));
                true
            }
            None => false,
        }
    }

    /// Close the modal, dropping every pending edit
    pub fn cancel_edit(&mut self) {
        self.close_modal();
    }

    fn close_modal(&mut self) {
        self.modal = None;
        self.staged.clear();
        self.new_address = AddressPayload::default();
    }

    /// Save the modal's fields and reload the user
    pub async fn save(&mut self, service: &UserService, today: NaiveDate) -> Option<Alert> {
        let form = self.modal.as_ref()?;
        let update = match form.validate(today) {
            Ok(update) => update,
            Err(errors) => {
                let message = errors.into_values().collect::<Vec<_>>().join(", ");
                return Some(Alert::Invalid(message));
            }
        };

        let result: ServiceResult<()> = async {
            service.update_user(self.user_id, &update).await?;
            self.refetch(service).await
        }
        .await;

        match result {
            Ok(()) => {
                info!("Updated user {}", self.user_id);
                self.close_modal();
                Some(Alert::Success("User updated successfully!".to_string()))
            }
            Err(_) => Some(Alert::Failed(
                "Failed to update user. Please try again.".to_string(),
            )),
        }
    }

    /// Draft of the address to add
    pub fn new_address(&self) -> &AddressPayload {
        &self.new_address
    }

    pub fn set_new_address(&mut self, address_type: AddressType, address_text: &str) {
        self.new_address = AddressPayload {
            address_type,
            address_text: address_text.to_string(),
        };
    }

    /// Add the drafted address and reload the user
    pub async fn add_address(&mut self, service: &UserService) -> Option<Alert> {
        if !self.is_editing() {
            return Some(Alert::Invalid(NOT_EDITING.to_string()));
        }
        if let Err(message) = validate_address_text(&self.new_address.address_text) {
            return Some(Alert::Invalid(message));
        }

        let payload = self.new_address.clone();
        let result: ServiceResult<()> = async {
            service.add_address(self.user_id, &payload).await?;
            self.refetch(service).await
        }
        .await;

        match result {
            Ok(()) => {
                self.new_address = AddressPayload::default();
                Some(Alert::Success("Address added successfully!".to_string()))
            }
            Err(_) => Some(Alert::Failed(
                "Failed to add address. Please try again.".to_string(),
            )),
        }
    }

    pub fn is_editing_address(&self, address_id: AddressId) -> bool {
        self.staged.contains_key(&address_id)
    }

    /// Staged values of an address row in edit
    pub fn staged_address(&self, address_id: AddressId) -> Option<&AddressPayload> {
        self.staged.get(&address_id)
    }

    pub fn staged_address_mut(&mut self, address_id: AddressId) -> Option<&mut AddressPayload> {
        self.staged.get_mut(&address_id)
    }

    /// Switch an address row to editing, staging a copy of its values
    pub fn begin_address_edit(&mut self, address_id: AddressId) -> bool {
        if !self.is_editing() {
            return false;
        }
        let Some(address) = self.user().and_then(|user| user.address(address_id)) else {
            return false;
        };
        let payload = AddressPayload::from(address);
        self.staged.entry(address_id).or_insert(payload);
        true
    }

    /// Drop the staged values of an address row
    pub fn cancel_address_edit(&mut self, address_id: AddressId) {
        self.staged.remove(&address_id);
    }

    /// Send a staged address edit and reload the user
    pub async fn save_address(
        &mut self,
        service: &UserService,
        address_id: AddressId,
    ) -> Option<Alert> {
        if !self.is_editing() {
            return Some(Alert::Invalid(NOT_EDITING.to_string()));
        }
        let payload = self.staged.get(&address_id)?.clone();
        if let Err(message) = validate_address_text(&payload.address_text) {
            return Some(Alert::Invalid(message));
        }

        let result: ServiceResult<()> = async {
            service
                .update_address(self.user_id, address_id, &payload)
                .await?;
            self.refetch(service).await
        }
        .await;

        match result {
            Ok(()) => {
                self.staged.remove(&address_id);
                Some(Alert::Success("Address updated successfully!".to_string()))
            }
            Err(_) => Some(Alert::Failed(
                "Failed to update address. Please try again.".to_string(),
            )),
        }
    }

    /// Delete an address after confirmation and reload the user
    pub async fn delete_address(
        &mut self,
        service: &UserService,
        address_id: AddressId,
        confirm: &mut impl Confirm,
    ) -> Option<Alert> {
        if !self.is_editing() {
            return Some(Alert::Invalid(NOT_EDITING.to_string()));
        }
        if !confirm.confirm(DELETE_ADDRESS_QUESTION) {
            return None;
        }

        let result: ServiceResult<()> = async {
            service.delete_address(self.user_id, address_id).await?;
            self.refetch(service).await
        }
        .await;

        match result {
            Ok(()) => {
                self.staged.remove(&address_id);
                Some(Alert::Success("Address deleted successfully!".to_string()))
            }
            Err(_) => Some(Alert::Failed(
                "Failed to delete address. Please try again.".to_string(),
            )),
        }
    }
}
