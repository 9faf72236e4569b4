//! Input validators for values that arrive from outside the crate.

mod email;

pub use email::{MAX_EMAIL_LEN, validate_email};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmailEmpty,
    EmailTooLong,
    EmailInvalidFormat,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailEmpty => write!(f, "Email cannot be empty"),
            Self::EmailTooLong => {
                write!(f, "Email is too long (max {MAX_EMAIL_LEN} characters)")
            }
            Self::EmailInvalidFormat => write!(f, "Invalid email format"),
        }
    }
}

impl std::error::Error for ValidationError {}
