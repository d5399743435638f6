use std::fmt::Display;

use vodca::{AsRefln, Fromln};

/// Raw phone number text. Two numbers are the same number when their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub const MAX_LENGTH: usize = 32;

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
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

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
