//! Registry records and request payloads

pub mod address;
pub mod user;

pub use address::{Address, AddressId, AddressPayload, AddressType};
pub use user::{Gender, User, UserId, UserRegistration, UserUpdate};
