//! `projectguard-auth` — project- and module-scoped authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage. It consumes an
//! already authenticated [`User`] snapshot and answers whether an action may
//! proceed; the only IO it performs is the owner lookup behind
//! [`OwnerLookup`], supplied by the caller.

pub mod access;
pub mod action;
pub mod authorize;
pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod guard;
pub mod scope;
pub mod user;

pub use access::{AccessLevel, ModuleLevels, ModuleName, Resource};
pub use action::Action;
pub use authorize::{
    Decision, DecisionExplanation, DenialKind, allow_by_op, can_user, decide, explain_decision,
};
pub use config::AuthzConfig;
pub use entity::{EntityAccessGuard, LookupError, OwnerLookup, Ownership};
pub use error::AuthzError;
pub use filter::{CollectionKind, FilterField, ListFilter, build_list_filter};
pub use guard::require_op;
pub use scope::{RestrictedScope, Scope, extract_project_scope, extract_scope};
pub use user::{ProjectPermission, Role, User};
