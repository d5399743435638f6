use error_stack::{Report, ResultExt};

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{DependOnPhonebookQuery, PhonebookQuery};
use kernel::interface::update::{DependOnPhonebookModifier, PhonebookModifier};
use kernel::prelude::entity::{Contact, ContactName, OwnerUserId, PhoneNumber};
use kernel::KernelError;

use crate::transfer::{CreateNewContactDto, GetPhonebookContactsDto, PhonebookContactDto};

fn phonebook_not_found(owner: OwnerUserId) -> Report<KernelError> {
    Report::new(KernelError::PhonebookNotFound { owner })
}

#[async_trait::async_trait]
pub trait GetPhonebookContactsService: 'static + Sync + Send + DependOnPhonebookQuery {
    async fn get_phonebook_contacts(
        &self,
        dto: GetPhonebookContactsDto,
    ) -> error_stack::Result<Vec<PhonebookContactDto>, KernelError> {
        let owner = dto.owner_user_id;
        let mut connection = self.database_connection().transact().await?;

        let phonebook = self
            .phonebook_query()
            .find_by_owner(&mut connection, &owner)
            .await?
            .ok_or_else(|| phonebook_not_found(owner))?;

        let contacts = phonebook.into_destruct().contacts;
        tracing::debug!(%owner, count = contacts.len(), "loaded phonebook contacts");

        Ok(contacts
            .into_iter()
            .map(PhonebookContactDto::from)
            .collect())
    }
}

impl<T> GetPhonebookContactsService for T where T: DependOnPhonebookQuery {}

#[async_trait::async_trait]
pub trait CreateNewContactService:
    'static + Sync + Send + DependOnPhonebookQuery + DependOnPhonebookModifier
{
    async fn create_new_contact(
        &self,
        dto: CreateNewContactDto,
    ) -> error_stack::Result<(), KernelError> {
        let name = ContactName::new(dto.contact_full_name);
        if name.is_blank() {
            return Err(Report::new(KernelError::InvalidArgument {
                field: "contact_full_name",
            }));
        }
        let phone_number = PhoneNumber::new(dto.contact_phone_number);
        if phone_number.is_blank() {
            return Err(Report::new(KernelError::InvalidArgument {
                field: "contact_phone_number",
            }));
        }

        let owner = dto.owner_user_id;
        let mut connection = self.database_connection().transact().await?;

        let mut phonebook = self
            .phonebook_query()
            .find_by_owner(&mut connection, &owner)
            .await?
            .ok_or_else(|| phonebook_not_found(owner))?;

        phonebook.add_contact(Contact::new(name, phone_number));

        let written = self
            .phonebook_modifier()
            .save_changes(connection, &mut phonebook)
            .await
            .attach_printable_lazy(|| format!("Failed to save new contact for user {owner}"))?;
        tracing::debug!(%owner, written, "saved new contact");

        Ok(())
    }
}

impl<T> CreateNewContactService for T where T: DependOnPhonebookQuery + DependOnPhonebookModifier {}
