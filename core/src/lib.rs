//! ghauth-core: platform-agnostic GitHub credential minting
//!
//! Mints GitHub App JWTs, exchanges them for installation tokens, and issues
//! self-hosted runner tokens authenticated either as an installation or with
//! a personal access token. It depends only on abstract platform traits
//! (HttpClient, Clock, Environment) and never performs file or process I/O.

pub mod config;
pub mod context;
pub mod credential;
pub mod error;
pub mod github;
pub mod mint;
pub mod platform;
pub mod strategy;

#[cfg(test)]
pub mod test_support;

pub use config::Options;
pub use context::Context;
pub use credential::{Authorization, Credential, CredentialKind};
pub use error::{AuthError, Result, ValidationFailure};
pub use mint::{mint, TokenKind};
pub use strategy::{try_strategies, AuthorizationStrategy, FallbackOrder};
