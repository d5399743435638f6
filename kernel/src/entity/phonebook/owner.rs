use std::fmt::Display;

use uuid::Uuid;
use vodca::{AsRefln, Fromln};

/// Identifier of the authenticated principal that owns a phonebook.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Default, Fromln, AsRefln)]
pub struct OwnerUserId(Uuid);

impl OwnerUserId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl Display for OwnerUserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
