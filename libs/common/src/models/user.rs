//! User model and request payloads

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::Address;

/// Server-assigned user identifier
pub type UserId = i64;

/// Gender as stored by the registry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::M => "Male",
            Gender::F => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" | "m" => Ok(Gender::M),
            "F" | "f" => Ok(Gender::F),
            _ => Err(ModelError::InvalidGender(s.to_string())),
        }
    }
}

/// User record as returned by the registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    #[serde(with = "crate::dates::calendar_date")]
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl User {
    /// Age in full years as of `today`
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        crate::dates::calculate_age(self.birthdate, today)
    }

    /// Look up one of the user's addresses
    pub fn address(&self, id: crate::models::AddressId) -> Option<&Address> {
        self.addresses.iter().find(|address| address.id == id)
    }
}

/// Registration payload.
///
/// `workAddress` and `homeAddress` are sent inline as free text; the
/// registry turns the non-blank ones into WORK and HOME addresses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    #[serde(with = "crate::dates::calendar_date")]
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub work_address: String,
    #[serde(default)]
    pub home_address: String,
}

/// Full-field user update payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    #[serde(with = "crate::dates::calendar_date")]
    pub birthdate: NaiveDate,
}

impl From<&User> for UserUpdate {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            surname: user.surname.clone(),
            gender: user.gender,
            birthdate: user.birthdate,
        }
    }
}
