//! GitHub API module
//!
//! App JWTs, installation tokens, personal access tokens and runner tokens.

pub(crate) mod api;
pub mod auth;
pub mod installation;
pub mod pat;
pub mod runners;
