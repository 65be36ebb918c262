//! Middleware module
//!
//! Contains the authorization layer guarding the `/v1` routes.

pub mod auth;

pub use auth::{AllowAll, AuthDecision, Authorizer, BearerTokenAuthorizer};
