mod id;
mod name;
mod phone_number;

pub use self::{id::*, name::*, phone_number::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct Contact {
    id: ContactId,
    name: ContactName,
    phone_number: PhoneNumber,
}

impl Contact {
    /// A contact that has not been saved yet.
    pub fn new(name: ContactName, phone_number: PhoneNumber) -> Self {
        Self {
            id: ContactId::default(),
            name,
            phone_number,
        }
    }

    pub fn restore(id: ContactId, name: ContactName, phone_number: PhoneNumber) -> Self {
        Self {
            id,
            name,
            phone_number,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_assigned()
    }

    /// Called by persistence once the contact row has been inserted.
    pub fn assign_id(&mut self, id: ContactId) {
        self.id = id;
    }
}
