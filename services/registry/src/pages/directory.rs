//! User directory page

use common::models::{User, UserId};
use tracing::info;

use crate::pages::{Alert, DetailsPage, LoadState};
use crate::prompt::Confirm;
use crate::routes::Route;
use crate::user_service::UserService;

const FETCH_FAILED: &str = "Failed to fetch users. Please try again later.";
const DELETE_FAILED: &str = "Failed to delete user.";
const DELETE_QUESTION: &str = "Are you sure you want to delete this user?";

/// List of all registered users
#[derive(Debug)]
pub struct DirectoryPage {
    state: LoadState<Vec<User>>,
}

impl Default for DirectoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryPage {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<User>> {
        &self.state
    }

    /// Users currently shown; empty unless loaded
    pub fn users(&self) -> &[User] {
        self.state.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    /// Fetch the full collection. Also used to retry after a failure.
    pub async fn load(&mut self, service: &UserService) {
        self.state = LoadState::Loading;
        self.state = match service.get_all_users().await {
            Ok(users) => {
                info!("Loaded {} users", users.len());
                LoadState::Loaded(users)
            }
            Err(_) => LoadState::Failed(FETCH_FAILED.to_string()),
        };
    }

    /// Open a user in a details page of its own
    pub fn view_details(&self, id: UserId) -> (Route, DetailsPage) {
        (Route::UserDetails(id), DetailsPage::new(id))
    }

    /// Delete a user after confirmation, then reload the list.
    ///
    /// Returns `None` when the confirmation is declined. On failure the
    /// list is left exactly as it was.
    pub async fn delete(
        &mut self,
        service: &UserService,
        id: UserId,
        confirm: &mut impl Confirm,
    ) -> Option<Alert> {
        if !confirm.confirm(DELETE_QUESTION) {
            return None;
        }

        match service.delete_user(id).await {
            Ok(()) => {
                info!("Deleted user {}", id);
                self.load(service).await;
                Some(Alert::Success("User deleted successfully!".to_string()))
            }
            Err(_) => Some(Alert::Failed(DELETE_FAILED.to_string())),
        }
    }
}
