//! `projectguard-core` — identifier and error primitives shared by every crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{EntityId, ProjectId, UserId};
