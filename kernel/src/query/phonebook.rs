use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{OwnerUserId, UserPhonebook};
use crate::KernelError;

#[async_trait::async_trait]
pub trait PhonebookQuery: Sync + Send + 'static {
    type Transaction: Transaction;
    /// Loads the phonebook of `owner` with every contact, in insertion order.
    async fn find_by_owner(
        &self,
        con: &mut Self::Transaction,
        owner: &OwnerUserId,
    ) -> error_stack::Result<Option<UserPhonebook>, KernelError>;
}

pub trait DependOnPhonebookQuery: Sync + Send + 'static + DependOnDatabaseConnection {
    type PhonebookQuery: PhonebookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn phonebook_query(&self) -> &Self::PhonebookQuery;
}
