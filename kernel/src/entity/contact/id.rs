use vodca::{AsRefln, Fromln};

/// Row id of a contact. Zero until the contact has been saved.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Default, Fromln, AsRefln)]
pub struct ContactId(i64);

impl ContactId {
    pub fn new(id: impl Into<i64>) -> Self {
        Self(id.into())
    }

    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }
}
