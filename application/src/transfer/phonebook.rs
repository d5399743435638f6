use kernel::prelude::entity::{Contact, DestructContact, OwnerUserId};

#[derive(Debug)]
pub struct GetPhonebookContactsDto {
    pub owner_user_id: OwnerUserId,
}

#[derive(Debug)]
pub struct CreateNewContactDto {
    pub owner_user_id: OwnerUserId,
    pub contact_full_name: String,
    pub contact_phone_number: String,
}

/// Read-only projection of a saved contact.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PhonebookContactDto {
    pub id: i64,
    pub contact_name: String,
    pub contact_phone_number: String,
}

impl From<Contact> for PhonebookContactDto {
    fn from(contact: Contact) -> Self {
        let DestructContact {
            id,
            name,
            phone_number,
        } = contact.into_destruct();
        Self {
            id: *id.as_ref(),
            contact_name: name.as_ref().to_owned(),
            contact_phone_number: phone_number.as_ref().to_owned(),
        }
    }
}
