//! Infrastructure layer: the persistence-side collaborators of the
//! authorization core (owner lookups, query filter rendering).

pub mod owners;
pub mod sql;

pub use owners::{InMemoryOwnerStore, PostgresOwnerLookup};
pub use sql::push_list_filter;
