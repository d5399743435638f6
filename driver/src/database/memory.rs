use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use error_stack::Report;
use tokio::sync::Mutex;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnPhonebookQuery, PhonebookQuery};
use kernel::interface::update::{DependOnPhonebookModifier, PhonebookModifier};
use kernel::prelude::entity::{Contact, ContactId, OwnerUserId, PhonebookId, UserPhonebook};
use kernel::KernelError;

/// Process-local gateway with the same column limits as the Postgres schema.
///
/// Every scope acquisition, release, lookup and save is counted so callers can
/// check how the gateway was used.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<Store>>,
    stats: Arc<GatewayStats>,
}

#[derive(Default)]
struct Store {
    phonebooks: HashMap<OwnerUserId, UserPhonebook>,
    last_phonebook_id: i64,
    last_contact_id: i64,
}

#[derive(Debug, Default)]
pub struct GatewayStats {
    acquired: AtomicUsize,
    released: AtomicUsize,
    lookups: AtomicUsize,
    saves: AtomicUsize,
    rows_written: AtomicUsize,
}

impl GatewayStats {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written.load(Ordering::SeqCst)
    }
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &GatewayStats {
        &self.stats
    }

    /// Creates the phonebook of `owner` holding `contacts`, which are given
    /// row ids in order. Provisioning does not go through the gateway.
    pub async fn provision(
        &self,
        owner: OwnerUserId,
        contacts: impl IntoIterator<Item = Contact>,
    ) -> UserPhonebook {
        let mut store = self.store.lock().await;
        store.last_phonebook_id += 1;
        let id = PhonebookId::new(store.last_phonebook_id);
        let mut phonebook = UserPhonebook::new(id, owner, Vec::new());
        for contact in contacts {
            phonebook.add_contact(contact);
        }
        for contact in phonebook.unsaved_contacts_mut() {
            store.last_contact_id += 1;
            contact.assign_id(ContactId::new(store.last_contact_id));
        }
        store.phonebooks.insert(owner, phonebook.clone());
        phonebook
    }

    /// Current stored state of a phonebook, bypassing the gateway counters.
    pub async fn phonebook(&self, owner: &OwnerUserId) -> Option<UserPhonebook> {
        self.store.lock().await.phonebooks.get(owner).cloned()
    }
}

pub struct InMemoryTransaction {
    store: Arc<Mutex<Store>>,
    stats: Arc<GatewayStats>,
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        self.stats.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<InMemoryTransaction, KernelError> {
        self.stats.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryTransaction {
            store: Arc::clone(&self.store),
            stats: Arc::clone(&self.stats),
        })
    }
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

pub struct InMemoryPhonebookRepository;

#[async_trait::async_trait]
impl PhonebookQuery for InMemoryPhonebookRepository {
    type Transaction = InMemoryTransaction;
    async fn find_by_owner(
        &self,
        con: &mut InMemoryTransaction,
        owner: &OwnerUserId,
    ) -> error_stack::Result<Option<UserPhonebook>, KernelError> {
        con.stats.lookups.fetch_add(1, Ordering::SeqCst);
        let store = con.store.lock().await;
        Ok(store.phonebooks.get(owner).cloned())
    }
}

#[async_trait::async_trait]
impl PhonebookModifier for InMemoryPhonebookRepository {
    type Transaction = InMemoryTransaction;
    async fn save_changes(
        &self,
        con: InMemoryTransaction,
        phonebook: &mut UserPhonebook,
    ) -> error_stack::Result<usize, KernelError> {
        con.stats.saves.fetch_add(1, Ordering::SeqCst);
        let mut store = con.store.lock().await;

        if phonebook
            .contacts()
            .iter()
            .filter(|contact| !contact.is_persisted())
            .any(|contact| {
                let name = contact.name();
                let phone_number = contact.phone_number();
                name.exceeds_max_length()
                    || name.contains_nul()
                    || phone_number.exceeds_max_length()
                    || phone_number.contains_nul()
            })
        {
            return Err(Report::new(KernelError::StorageConstraint)
                .attach_printable("Contact value cannot be stored"));
        }

        let owner = *phonebook.owner_user_id();
        if !store.phonebooks.contains_key(&owner) {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Phonebook of user {owner} is not stored")));
        }

        let mut appended = Vec::new();
        for contact in phonebook.unsaved_contacts_mut() {
            store.last_contact_id += 1;
            contact.assign_id(ContactId::new(store.last_contact_id));
            appended.push(contact.clone());
        }
        let written = appended.len();
        if let Some(stored) = store.phonebooks.get_mut(&owner) {
            for contact in appended {
                stored.add_contact(contact);
            }
        }
        drop(store);

        con.stats.rows_written.fetch_add(written, Ordering::SeqCst);
        con.commit().await?;
        Ok(written)
    }
}

impl DependOnPhonebookQuery for InMemoryDatabase {
    type PhonebookQuery = InMemoryPhonebookRepository;
    fn phonebook_query(&self) -> &Self::PhonebookQuery {
        &InMemoryPhonebookRepository
    }
}

impl DependOnPhonebookModifier for InMemoryDatabase {
    type PhonebookModifier = InMemoryPhonebookRepository;
    fn phonebook_modifier(&self) -> &Self::PhonebookModifier {
        &InMemoryPhonebookRepository
    }
}
