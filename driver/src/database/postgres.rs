use error_stack::{Report, ResultExt};
use sqlx::error::ErrorKind;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::phonebook::*;

mod phonebook;

static POSTGRES_URL: &str = "POSTGRES_URL";

/// Postgres SQLSTATE `string_data_right_truncation`.
static STRING_TOO_LONG: &str = "22001";
/// Postgres SQLSTATE `character_not_in_repertoire`, raised for NUL in text values.
static CHARACTER_NOT_IN_REPERTOIRE: &str = "22021";

pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        Self::connect(&url).await
    }

    pub async fn connect(url: &str) -> error_stack::Result<Self, KernelError> {
        let pool = Pool::connect(url).await.convert_error()?;
        tracing::debug!("connected to postgres");
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> error_stack::Result<(), KernelError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to apply migrations")?;
        Ok(())
    }
}

/// One gateway scope. Dropping it without committing rolls the work back.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

impl PostgresTransaction {
    pub(in crate::database) fn connection(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<PostgresTransaction, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(con))
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                Error::PoolTimedOut => KernelError::Timeout,
                Error::Database(db) if is_constraint_violation(db.as_ref()) => {
                    KernelError::StorageConstraint
                }
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}

fn is_constraint_violation(error: &dyn sqlx::error::DatabaseError) -> bool {
    is_storage_constraint(error.kind(), error.code().as_deref())
}

fn is_storage_constraint(kind: ErrorKind, code: Option<&str>) -> bool {
    matches!(kind, ErrorKind::CheckViolation | ErrorKind::NotNullViolation)
        || matches!(code, Some(code) if code == STRING_TOO_LONG || code == CHARACTER_NOT_IN_REPERTOIRE)
}
