//! Landing page

use crate::routes::Route;

/// Navigation entries of the landing page
pub struct HomePage;

impl HomePage {
    pub fn entries() -> [(&'static str, Route); 2] {
        [
            ("Register New User", Route::Register),
            ("View All Users", Route::Users),
        ]
    }
}
