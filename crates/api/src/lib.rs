//! HTTP boundary for the authorization core: request context, guards and
//! the mapping of outcomes to responses.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
