//! Input validation utilities

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

/// Form field an error message is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Surname,
    Gender,
    Birthdate,
    WorkAddress,
    HomeAddress,
    /// Errors not tied to a single field
    General,
}

impl Field {
    /// Key used for the field in JSON payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Surname => "surname",
            Field::Gender => "gender",
            Field::Birthdate => "birthdate",
            Field::WorkAddress => "workAddress",
            Field::HomeAddress => "homeAddress",
            Field::General => "general",
        }
    }

    /// Map a payload key back to a form field
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Field::Name),
            "surname" => Some(Field::Surname),
            "gender" => Some(Field::Gender),
            "birthdate" => Some(Field::Birthdate),
            "workAddress" => Some(Field::WorkAddress),
            "homeAddress" => Some(Field::HomeAddress),
            "general" => Some(Field::General),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field error messages
pub type FieldErrors = BTreeMap<Field, String>;

/// Validate name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    Ok(())
}

/// Validate surname
pub fn validate_surname(surname: &str) -> Result<(), String> {
    if surname.trim().is_empty() {
        return Err("Surname is required".to_string());
    }
    Ok(())
}

/// Validate gender selection; the value itself is parsed separately
pub fn validate_gender(gender: &str) -> Result<(), String> {
    match gender.trim() {
        "" => Err("Gender is required".to_string()),
        "M" | "m" | "F" | "f" => Ok(()),
        _ => Err("Gender must be M or F".to_string()),
    }
}

/// Validate birthdate: present and not after `today`
pub fn validate_birthdate(birthdate: Option<NaiveDate>, today: NaiveDate) -> Result<(), String> {
    match birthdate {
        None => Err("Birthdate is required".to_string()),
        Some(date) if date > today => Err("Birthdate cannot be in the future".to_string()),
        Some(_) => Ok(()),
    }
}

/// Validate free-text address
pub fn validate_address_text(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("Please enter an address".to_string());
    }
    Ok(())
}

/// Record a failed check under `field`
pub fn collect(errors: &mut FieldErrors, field: Field, result: Result<(), String>) {
    if let Err(message) = result {
        errors.insert(field, message);
    }
}
