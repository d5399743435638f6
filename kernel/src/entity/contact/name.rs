use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct ContactName(String);

impl ContactName {
    pub const MAX_LENGTH: usize = 128;

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn exceeds_max_length(&self) -> bool {
        self.0.chars().count() > Self::MAX_LENGTH
    }

    /// Text columns cannot store NUL.
    pub fn contains_nul(&self) -> bool {
        self.0.contains('\0')
    }
}
