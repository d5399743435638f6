use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Default, Fromln, AsRefln)]
pub struct PhonebookId(i64);

impl PhonebookId {
    pub fn new(id: impl Into<i64>) -> Self {
        Self(id.into())
    }
}
