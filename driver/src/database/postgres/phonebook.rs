use sqlx::types::Uuid;
use sqlx::PgConnection;

use kernel::interface::database::Transaction;
use kernel::interface::query::{DependOnPhonebookQuery, PhonebookQuery};
use kernel::interface::update::{DependOnPhonebookModifier, PhonebookModifier};
use kernel::prelude::entity::{
    Contact, ContactId, ContactName, OwnerUserId, PhoneNumber, PhonebookId, UserPhonebook,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresDatabase, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresPhonebookRepository;

#[async_trait::async_trait]
impl PhonebookQuery for PostgresPhonebookRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_owner(
        &self,
        con: &mut PostgresTransaction,
        owner: &OwnerUserId,
    ) -> error_stack::Result<Option<UserPhonebook>, KernelError> {
        PgPhonebookInternal::find_by_owner(con.connection(), owner).await
    }
}

#[async_trait::async_trait]
impl PhonebookModifier for PostgresPhonebookRepository {
    type Transaction = PostgresTransaction;
    async fn save_changes(
        &self,
        mut con: PostgresTransaction,
        phonebook: &mut UserPhonebook,
    ) -> error_stack::Result<usize, KernelError> {
        let written = PgPhonebookInternal::insert_unsaved(con.connection(), phonebook).await?;
        con.commit().await?;
        Ok(written)
    }
}

impl DependOnPhonebookQuery for PostgresDatabase {
    type PhonebookQuery = PostgresPhonebookRepository;
    fn phonebook_query(&self) -> &Self::PhonebookQuery {
        &PostgresPhonebookRepository
    }
}

impl DependOnPhonebookModifier for PostgresDatabase {
    type PhonebookModifier = PostgresPhonebookRepository;
    fn phonebook_modifier(&self) -> &Self::PhonebookModifier {
        &PostgresPhonebookRepository
    }
}

#[derive(sqlx::FromRow)]
struct PhonebookRow {
    id: i64,
    owner_user_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i64,
    contact_name: String,
    contact_phone_number: String,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact::restore(
            ContactId::new(row.id),
            ContactName::new(row.contact_name),
            PhoneNumber::new(row.contact_phone_number),
        )
    }
}

pub(in crate::database) struct PgPhonebookInternal;

impl PgPhonebookInternal {
    async fn find_by_owner(
        con: &mut PgConnection,
        owner: &OwnerUserId,
    ) -> error_stack::Result<Option<UserPhonebook>, KernelError> {
        let row = sqlx::query_as::<_, PhonebookRow>(
            // language=postgresql
            r#"
            SELECT id, owner_user_id
            FROM user_phonebooks
            WHERE owner_user_id = $1
            "#,
        )
        .bind(owner.as_ref())
        .fetch_optional(&mut *con)
        .await
        .convert_error()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let contacts = sqlx::query_as::<_, ContactRow>(
            // language=postgresql
            r#"
            SELECT id, contact_name, contact_phone_number
            FROM contacts
            WHERE phonebook_id = $1
            ORDER BY id
            "#,
        )
        .bind(row.id)
        .fetch_all(&mut *con)
        .await
        .convert_error()?;

        Ok(Some(UserPhonebook::new(
            PhonebookId::new(row.id),
            OwnerUserId::new(row.owner_user_id),
            contacts.into_iter().map(Contact::from).collect(),
        )))
    }

    async fn insert_unsaved(
        con: &mut PgConnection,
        phonebook: &mut UserPhonebook,
    ) -> error_stack::Result<usize, KernelError> {
        let phonebook_id = *phonebook.id().as_ref();
        let mut written = 0;
        for contact in phonebook.unsaved_contacts_mut() {
            // language=postgresql
            let id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO contacts (phonebook_id, contact_name, contact_phone_number)
                VALUES ($1, $2, $3)
                RETURNING id
                "#,
            )
            .bind(phonebook_id)
            .bind(contact.name().as_ref())
            .bind(contact.phone_number().as_ref())
            .fetch_one(&mut *con)
            .await
            .convert_error()?;
            contact.assign_id(ContactId::new(id));
            written += 1;
        }
        tracing::debug!(phonebook_id, written, "inserted contacts");
        Ok(written)
    }
}

#[cfg(test)]
mod test {
    use error_stack::ResultExt;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::PhonebookQuery;
    use kernel::interface::update::PhonebookModifier;
    use kernel::prelude::entity::{Contact, ContactName, OwnerUserId, PhoneNumber};
    use kernel::KernelError;

    use crate::database::postgres::phonebook::PostgresPhonebookRepository;
    use crate::database::postgres::PostgresDatabase;

    async fn provision(db: &PostgresDatabase, owner: &OwnerUserId) -> error_stack::Result<(), KernelError> {
        let mut con = db.transact().await?;
        // language=postgresql
        sqlx::query("INSERT INTO user_phonebooks (owner_user_id) VALUES ($1)")
            .bind(owner.as_ref())
            .execute(con.connection())
            .await
            .change_context_lazy(|| KernelError::Internal)?;
        con.commit().await
    }

    async fn database() -> error_stack::Result<PostgresDatabase, KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        Ok(db)
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn missing_phonebook_is_none() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let mut con = db.transact().await?;
        let found = PostgresPhonebookRepository
            .find_by_owner(&mut con, &OwnerUserId::new(Uuid::new_v4()))
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn saved_contacts_round_trip() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let owner = OwnerUserId::new(Uuid::new_v4());
        provision(&db, &owner).await?;

        let mut con = db.transact().await?;
        let mut phonebook = PostgresPhonebookRepository
            .find_by_owner(&mut con, &owner)
            .await?
            .expect("provisioned phonebook");
        assert!(phonebook.contacts().is_empty());

        for (name, phone) in [("Alice", "111"), ("Bob", "222")] {
            phonebook.add_contact(Contact::new(ContactName::new(name), PhoneNumber::new(phone)));
        }
        let written = PostgresPhonebookRepository
            .save_changes(con, &mut phonebook)
            .await?;
        assert_eq!(written, 2);
        assert!(phonebook.contacts().iter().all(Contact::is_persisted));

        let mut con = db.transact().await?;
        let found = PostgresPhonebookRepository
            .find_by_owner(&mut con, &owner)
            .await?
            .expect("provisioned phonebook");
        assert_eq!(found, phonebook);
        let names = found
            .contacts()
            .iter()
            .map(|contact| contact.name().as_ref().as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Alice", "Bob"]);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn too_long_phone_number_is_storage_constraint() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let owner = OwnerUserId::new(Uuid::new_v4());
        provision(&db, &owner).await?;

        let mut con = db.transact().await?;
        let mut phonebook = PostgresPhonebookRepository
            .find_by_owner(&mut con, &owner)
            .await?
            .expect("provisioned phonebook");
        phonebook.add_contact(Contact::new(
            ContactName::new("Alice"),
            PhoneNumber::new("1".repeat(33)),
        ));
        let error = PostgresPhonebookRepository
            .save_changes(con, &mut phonebook)
            .await
            .expect_err("phone number exceeds column length");
        assert!(matches!(
            error.current_context(),
            KernelError::StorageConstraint
        ));

        let mut con = db.transact().await?;
        let found = PostgresPhonebookRepository
            .find_by_owner(&mut con, &owner)
            .await?
            .expect("provisioned phonebook");
        assert!(found.contacts().is_empty());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn nul_in_name_is_storage_constraint() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let owner = OwnerUserId::new(Uuid::new_v4());
        provision(&db, &owner).await?;

        let mut con = db.transact().await?;
        let mut phonebook = PostgresPhonebookRepository
            .find_by_owner(&mut con, &owner)
            .await?
            .expect("provisioned phonebook");
        phonebook.add_contact(Contact::new(
            ContactName::new("Al\u{0}ice"),
            PhoneNumber::new("111"),
        ));
        let error = PostgresPhonebookRepository
            .save_changes(con, &mut phonebook)
            .await
            .expect_err("NUL cannot be stored in text");
        assert!(matches!(
            error.current_context(),
            KernelError::StorageConstraint
        ));
        Ok(())
    }
}
