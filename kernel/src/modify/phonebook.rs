use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::UserPhonebook;
use crate::KernelError;

#[async_trait::async_trait]
pub trait PhonebookModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Writes every unsaved contact of `phonebook` and commits `con`.
    ///
    /// Saved contacts get their row id assigned. Consuming the transaction
    /// means a gateway scope can be saved at most once; on error nothing is
    /// committed. Returns the number of rows written.
    async fn save_changes(
        &self,
        con: Self::Transaction,
        phonebook: &mut UserPhonebook,
    ) -> error_stack::Result<usize, KernelError>;
}

pub trait DependOnPhonebookModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type PhonebookModifier: PhonebookModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn phonebook_modifier(&self) -> &Self::PhonebookModifier;
}
