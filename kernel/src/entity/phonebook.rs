mod id;
mod owner;

pub use self::{id::*, owner::*};
use destructure::Destructure;
use vodca::References;

use crate::entity::Contact;

/// Aggregate root owning the contacts of a single user.
///
/// Contacts keep their insertion order. New contacts are only ever appended
/// through [`UserPhonebook::add_contact`]; existing ones are never modified.
#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct UserPhonebook {
    id: PhonebookId,
    owner_user_id: OwnerUserId,
    contacts: Vec<Contact>,
}

impl UserPhonebook {
    pub fn new(id: PhonebookId, owner_user_id: OwnerUserId, contacts: Vec<Contact>) -> Self {
        Self {
            id,
            owner_user_id,
            contacts,
        }
    }

    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Contacts appended since the phonebook was loaded, in insertion order.
    pub fn unsaved_contacts_mut(&mut self) -> impl Iterator<Item = &mut Contact> {
        self.contacts
            .iter_mut()
            .filter(|contact| !contact.is_persisted())
    }
}
