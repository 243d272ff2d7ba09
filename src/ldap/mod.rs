//! The LDAP-side data model: flat entries and compiled search filters,
//! both expressed as plain data rather than wrapping any particular
//! LDAP client crate — connecting to a directory is outside this
//! crate's scope.

pub mod entry;
pub mod filter;

pub use entry::{Attribute, Entry};
pub use filter::LdapFilter;
