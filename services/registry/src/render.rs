//! Text rendering of pages for the terminal

use std::fmt;

use chrono::NaiveDate;
use common::dates::{format_display, format_iso};
use common::models::User;
use common::validation::FieldErrors;

use crate::pages::{Alert, HomePage};

/// Landing page menu
pub struct HomeView;

impl fmt::Display for HomeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User Registry")?;
        for (label, route) in HomePage::entries() {
            writeln!(f, "  {label:<20} {route}")?;
        }
        Ok(())
    }
}

/// Directory cards with derived age
pub struct DirectoryView<'a> {
    pub users: &'a [User],
    pub today: NaiveDate,
}

impl fmt::Display for DirectoryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.users.is_empty() {
            return writeln!(f, "No users registered yet.");
        }
        for user in self.users {
            writeln!(
                f,
                "#{} {} {} | {} | {} ({} years old)",
                user.id,
                user.name,
                user.surname,
                user.gender.label(),
                format_display(user.birthdate),
                user.age_on(self.today)
            )?;
        }
        Ok(())
    }
}

/// Flat table of all users
pub struct TableView<'a> {
    pub users: &'a [User],
}

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<6} {:<16} {:<16} {:<7} {:<10}",
            "ID", "Name", "Surname", "Gender", "Birthdate"
        )?;
        for user in self.users {
            writeln!(
                f,
                "{:<6} {:<16} {:<16} {:<7} {:<10}",
                user.id,
                user.name,
                user.surname,
                user.gender,
                format_iso(user.birthdate)
            )?;
        }
        Ok(())
    }
}

/// Read mode of the details page
pub struct DetailsView<'a> {
    pub user: &'a User,
    pub today: NaiveDate,
}

impl fmt::Display for DetailsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = self.user;
        writeln!(f, "Name:      {}", user.name)?;
        writeln!(f, "Surname:   {}", user.surname)?;
        writeln!(f, "Gender:    {}", user.gender.label())?;
        writeln!(
            f,
            "Birthdate: {} ({} years old)",
            format_display(user.birthdate),
            user.age_on(self.today)
        )?;
        writeln!(f, "User ID:   #{}", user.id)?;
        writeln!(f, "Addresses:")?;
        if user.addresses.is_empty() {
            return writeln!(f, "  No addresses registered");
        }
        for address in &user.addresses {
            writeln!(
                f,
                "  [{}] {}: {}",
                address.id,
                address.address_type.label(),
                address.address_text
            )?;
        }
        Ok(())
    }
}

/// Per-field form errors
pub struct ErrorsView<'a>(pub &'a FieldErrors);

impl fmt::Display for ErrorsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, message) in self.0 {
            writeln!(f, "  {field}: {message}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::Success(message) => write!(f, "{message}"),
            Alert::Invalid(message) => write!(f, "Invalid: {message}"),
            Alert::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}
