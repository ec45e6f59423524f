//! Page routes

use std::fmt;

use common::models::UserId;

/// A page the application can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Register,
    Users,
    UserDetails(UserId),
    NotFound(String),
}

impl Route {
    /// Resolve a path such as `/users/12`
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["register"] => Route::Register,
            ["users"] => Route::Users,
            ["users", id] => id
                .parse()
                .map(Route::UserDetails)
                .unwrap_or_else(|_| Route::NotFound(trimmed.to_string())),
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Register => "/register".to_string(),
            Route::Users => "/users".to_string(),
            Route::UserDetails(id) => format!("/users/{id}"),
            Route::NotFound(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
