use error_stack::{Report, ResultExt};
use kernel::KernelError;

pub mod database;
pub mod error;

/// Reads `key` from the environment or a `.env` file.
pub fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .map_err(Report::from)
        .change_context(KernelError::Internal)
        .attach_printable_lazy(|| format!("Missing environment variable: {key}"))
}
