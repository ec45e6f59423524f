//! Pages of the registry application
//!
//! Each page owns its state. Operations are driven by user actions and
//! turn every failure into page state or an [`Alert`]; nothing escapes.

pub mod details;
pub mod directory;
pub mod home;
pub mod register;

pub use details::DetailsPage;
pub use directory::DirectoryPage;
pub use home::HomePage;
pub use register::{RegisterPage, SubmitOutcome};

/// Loading state of remote data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    /// The requested record does not exist
    NotFound,
    /// Retryable failure with a user-facing message
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Blocking notification raised by a page operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Success(String),
    /// Rejected locally before any request was sent
    Invalid(String),
    Failed(String),
}

impl Alert {
    pub fn is_success(&self) -> bool {
        matches!(self, Alert::Success(_))
    }
}
