//! Custom error types for the common library
//!
//! This module defines the error types raised while decoding or building
//! registry records.

use thiserror::Error;

/// Custom error type for model conversions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Date text did not contain a `YYYY-MM-DD` calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Gender other than `M` or `F`
    #[error("Gender must be M or F, got: {0}")]
    InvalidGender(String),

    /// Address type other than `HOME` or `WORK`
    #[error("Address type must be HOME or WORK, got: {0}")]
    InvalidAddressType(String),
}

/// Type alias for Result with ModelError
pub type ModelResult<T> = Result<T, ModelError>;
