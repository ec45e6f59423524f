//! Common library for the user registry
//!
//! This crate provides the pieces shared by the registry client: the
//! user and address records, calendar date handling, form validation,
//! configuration and error types.

pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod validation;
