mod phonebook;

pub use self::phonebook::*;
