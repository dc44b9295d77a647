//! Domain types shared by the scorer, the classifier and the report composer.

pub mod enums;
pub mod patient;
pub mod prediction;

pub use enums::{Gender, RiskCategory, XrayLabel};
pub use patient::PatientInput;
pub use prediction::ImagePrediction;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    #[error("{field} is not a valid {expected}: {value}")]
    Malformed {
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("{0} is required")]
    Missing(&'static str),
}
