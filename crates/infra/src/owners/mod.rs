//! Owner lookups backing `EntityAccessGuard`.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryOwnerStore;
pub use postgres::PostgresOwnerLookup;
