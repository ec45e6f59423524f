//! Registration form page

use std::time::Duration;

use chrono::NaiveDate;
use common::dates::parse_calendar_date;
use common::models::{Gender, User, UserRegistration};
use common::validation::{
    Field, FieldErrors, collect, validate_birthdate, validate_gender, validate_name,
    validate_surname,
};
use tracing::info;

use crate::error::ServiceError;
use crate::routes::Route;
use crate::user_service::UserService;

const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Raw form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub surname: String,
    pub gender: String,
    pub birthdate: Option<NaiveDate>,
    pub work_address: String,
    pub home_address: String,
}

impl RegisterForm {
    /// Check the form and build the payload to send
    pub fn validate(&self, today: NaiveDate) -> Result<UserRegistration, FieldErrors> {
        let mut errors = FieldErrors::new();
        collect(&mut errors, Field::Name, validate_name(&self.name));
        collect(&mut errors, Field::Surname, validate_surname(&self.surname));
        collect(&mut errors, Field::Gender, validate_gender(&self.gender));
        collect(
            &mut errors,
            Field::Birthdate,
            validate_birthdate(self.birthdate, today),
        );

        let gender = self.gender.parse::<Gender>();
        match (gender, self.birthdate) {
            (Ok(gender), Some(birthdate)) if errors.is_empty() => Ok(UserRegistration {
                name: self.name.trim().to_string(),
                surname: self.surname.trim().to_string(),
                gender,
                birthdate,
                work_address: self.work_address.clone(),
                home_address: self.home_address.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Where to go next, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
    pub after: Duration,
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent
    Invalid,
    /// The registry refused the submission
    Rejected,
    Registered { user: User, redirect: Redirect },
}

/// Registration page state
#[derive(Debug)]
pub struct RegisterPage {
    form: RegisterForm,
    errors: FieldErrors,
    /// Parse failure of the typed birthdate, kept until the field changes
    invalid_birthdate: Option<String>,
    registered: bool,
    redirect_delay: Duration,
}

impl RegisterPage {
    pub fn new(redirect_delay: Duration) -> Self {
        Self {
            form: RegisterForm::default(),
            errors: FieldErrors::new(),
            invalid_birthdate: None,
            registered: false,
            redirect_delay,
        }
    }

    pub fn form(&self) -> &RegisterForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the success indicator is showing
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Change one field, clearing its error
    pub fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Name => self.form.name = value.to_string(),
            Field::Surname => self.form.surname = value.to_string(),
            Field::Gender => self.form.gender = value.to_string(),
            Field::Birthdate => return self.set_birthdate_text(value),
            Field::WorkAddress => self.form.work_address = value.to_string(),
            Field::HomeAddress => self.form.home_address = value.to_string(),
            Field::General => return,
        }
        self.errors.remove(&field);
    }

    /// Set the birthdate from a picked date
    pub fn set_birthdate(&mut self, birthdate: Option<NaiveDate>) {
        self.form.birthdate = birthdate;
        self.invalid_birthdate = None;
        self.errors.remove(&Field::Birthdate);
    }

    /// Set the birthdate from typed text; blank text clears it
    fn set_birthdate_text(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return self.set_birthdate(None);
        }
        match parse_calendar_date(value) {
            Ok(birthdate) => self.set_birthdate(Some(birthdate)),
            Err(error) => {
                self.set_birthdate(None);
                self.invalid_birthdate = Some(error.to_string());
            }
        }
    }

    /// Validate and send the form
    pub async fn submit(&mut self, service: &UserService, today: NaiveDate) -> SubmitOutcome {
        self.errors.clear();
        self.registered = false;

        let registration = match (self.form.validate(today), &self.invalid_birthdate) {
            (Ok(registration), None) => registration,
            (result, invalid_birthdate) => {
                let mut errors = result.err().unwrap_or_default();
                if let Some(message) = invalid_birthdate {
                    errors.insert(Field::Birthdate, message.clone());
                }
                self.errors = errors;
                return SubmitOutcome::Invalid;
            }
        };

        match service.create_user(&registration).await {
            Ok(user) => {
                info!("Registered user {}", user.id);
                self.form = RegisterForm::default();
                self.registered = true;
                SubmitOutcome::Registered {
                    user,
                    redirect: Redirect {
                        route: Route::Users,
                        after: self.redirect_delay,
                    },
                }
            }
            Err(ServiceError::Validation { fields, .. }) => {
                self.errors = fields;
                SubmitOutcome::Rejected
            }
            Err(error) => {
                let message = error.message().unwrap_or(GENERIC_FAILURE).to_string();
                self.errors.insert(Field::General, message);
                SubmitOutcome::Rejected
            }
        }
    }
}
