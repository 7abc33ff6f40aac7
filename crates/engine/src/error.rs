//! The module contains the errors the engine can throw.
//!
//! Membership errors ([`AlreadyMember`], [`NotInHousehold`],
//! [`DuplicateMembership`]) describe conflicts between the caller's current
//! affiliation and the requested operation. [`ResourceExhausted`] is only
//! raised when invite-code allocation runs out of retries.
//!
//! [`AlreadyMember`]: EngineError::AlreadyMember
//! [`NotInHousehold`]: EngineError::NotInHousehold
//! [`DuplicateMembership`]: EngineError::DuplicateMembership
//! [`ResourceExhausted`]: EngineError::ResourceExhausted
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Already a member: {0}")]
    AlreadyMember(String),
    #[error("Not in a household: {0}")]
    NotInHousehold(String),
    #[error("Duplicate membership: {0}")]
    DuplicateMembership(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyMember(a), Self::AlreadyMember(b)) => a == b,
            (Self::NotInHousehold(a), Self::NotInHousehold(b)) => a == b,
            (Self::DuplicateMembership(a), Self::DuplicateMembership(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ResourceExhausted(a), Self::ResourceExhausted(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
