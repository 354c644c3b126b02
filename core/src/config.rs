//! Per-call options
//!
//! Every field is optional. Nothing is validated here beyond parsing; each
//! operation checks the fields it needs and reports the missing ones.

use std::path::PathBuf;

use crate::error::{AuthError, Result};
use crate::platform::Environment;
use crate::strategy::FallbackOrder;

/// Default GitHub REST API base
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Inputs for a single mint operation
#[derive(Clone, Default)]
pub struct Options {
    /// GitHub App numeric ID
    pub app_id: Option<String>,
    /// GitHub App private key (PEM format)
    pub private_key: Option<String>,
    /// Key file path. The core never reads it: front ends load the file into
    /// `private_key` before minting.
    pub private_key_path: Option<PathBuf>,
    pub installation_id: Option<u64>,
    pub org_name: Option<String>,
    /// Full repository name (`owner/repo`)
    pub repo_name: Option<String>,
    pub enterprise_name: Option<String>,
    pub personal_access_token: Option<String>,
    /// API base URL override (GitHub Enterprise Server)
    pub api_url: Option<String>,
    pub fallback_order: FallbackOrder,
}

impl Options {
    /// Load options from GitHub Actions style variables (`{prefix}APPID`, ...)
    ///
    /// Empty values count as absent, since Actions passes every declared
    /// input even when the workflow leaves it unset.
    pub fn from_env(env: &dyn Environment, prefix: &str) -> Result<Self> {
        let var = |name: &str| non_empty(env.get_var(&format!("{}{}", prefix, name)));

        let installation_id = var("INSTALLATIONID")
            .map(|id| parse_installation_id(&id))
            .transpose()?;

        let fallback_order = match var("FALLBACKORDER") {
            Some(order) => order.parse()?,
            None => FallbackOrder::default(),
        };

        Ok(Self {
            app_id: var("APPID"),
            private_key: var("PRIVATEKEY"),
            private_key_path: var("PRIVATEKEYPATH").map(PathBuf::from),
            installation_id,
            org_name: var("ORGNAME"),
            repo_name: var("REPONAME"),
            enterprise_name: var("ENTERPRISENAME"),
            personal_access_token: var("PERSONALACCESSTOKEN"),
            api_url: var("APIURL"),
            fallback_order,
        })
    }

    /// Organization name, derived from `repo_name` when not given directly
    pub fn org_name(&self) -> Option<&str> {
        match (self.org_name.as_deref(), self.repo_name.as_deref()) {
            (Some(org), _) => Some(org),
            (None, Some(repo)) => repo.split('/').next().filter(|org| !org.is_empty()),
            (None, None) => None,
        }
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(GITHUB_API_BASE)
    }
}

/// Parse a user-supplied installation id
pub fn parse_installation_id(value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| AuthError::validation("installationId must be numeric", &["installationId"]))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
