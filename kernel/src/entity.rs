mod contact;
mod phonebook;

pub use self::{contact::*, phonebook::*};
