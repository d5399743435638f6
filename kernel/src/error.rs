use std::fmt::Display;

use error_stack::Context;

use crate::entity::OwnerUserId;

#[derive(Debug)]
pub enum KernelError {
    Unauthenticated,
    InvalidArgument { field: &'static str },
    PhonebookNotFound { owner: OwnerUserId },
    StorageConstraint,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Unauthenticated => write!(f, "Caller is not authenticated"),
            KernelError::InvalidArgument { field } => {
                write!(f, "Invalid argument: {field} must not be empty")
            }
            KernelError::PhonebookNotFound { owner } => {
                write!(f, "No phonebook found for user {owner}")
            }
            KernelError::StorageConstraint => write!(f, "Storage constraint violated"),
            KernelError::Timeout => write!(f, "Timed out waiting for storage"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
