//! Single entry point over every token kind

use std::fmt;
use std::str::FromStr;

use crate::config::Options;
use crate::context::Context;
use crate::credential::Credential;
use crate::error::{AuthError, Result};
use crate::github::runners::{RunnerScope, RunnerTokenAction};
use crate::github::{auth, installation, runners};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    App,
    Installation,
    RepoRunnerRegistration,
    OrgRunnerRegistration,
    EntRunnerRegistration,
    RepoRunnerRemove,
    OrgRunnerRemove,
    EntRunnerRemove,
}

impl TokenKind {
    pub const ALL: [TokenKind; 8] = [
        Self::App,
        Self::Installation,
        Self::RepoRunnerRegistration,
        Self::OrgRunnerRegistration,
        Self::EntRunnerRegistration,
        Self::RepoRunnerRemove,
        Self::OrgRunnerRemove,
        Self::EntRunnerRemove,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "appToken",
            Self::Installation => "installationToken",
            Self::RepoRunnerRegistration => "repoRunnerRegistrationToken",
            Self::OrgRunnerRegistration => "orgRunnerRegistrationToken",
            Self::EntRunnerRegistration => "entRunnerRegistrationToken",
            Self::RepoRunnerRemove => "repoRunnerRemoveToken",
            Self::OrgRunnerRemove => "orgRunnerRemoveToken",
            Self::EntRunnerRemove => "entRunnerRemoveToken",
        }
    }

    /// Only App and installation tokens have an `Authorization` form;
    /// runner tokens are handed to the runner as is.
    pub fn supports_authorization(self) -> bool {
        matches!(self, Self::App | Self::Installation)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AuthError::unsupported(format!("Unknown token type: {}", s)))
    }
}

/// Mint a token of `kind`, as a bare token or an `Authorization` value
pub async fn mint(
    ctx: &Context<'_>,
    kind: TokenKind,
    opts: &Options,
    as_authorization: bool,
) -> Result<String> {
    if as_authorization && !kind.supports_authorization() {
        return Err(AuthError::unsupported(format!(
            "{} has no authorization header form",
            kind
        )));
    }

    use RunnerScope::*;
    use RunnerTokenAction::*;

    let (scope, action) = match kind {
        TokenKind::App => {
            let credential = auth::create_app_token(ctx, opts).await?;
            return Ok(render(credential, as_authorization));
        }
        TokenKind::Installation => {
            let credential = installation::create_installation_token(ctx, opts).await?;
            return Ok(render(credential, as_authorization));
        }
        TokenKind::RepoRunnerRegistration => (Repo, Registration),
        TokenKind::OrgRunnerRegistration => (Org, Registration),
        TokenKind::EntRunnerRegistration => (Enterprise, Registration),
        TokenKind::RepoRunnerRemove => (Repo, Remove),
        TokenKind::OrgRunnerRemove => (Org, Remove),
        TokenKind::EntRunnerRemove => (Enterprise, Remove),
    };

    runners::create_runner_token(ctx, opts, scope, action).await
}

fn render(credential: Credential, as_authorization: bool) -> String {
    if as_authorization {
        credential.authorization().into_string()
    } else {
        credential.into_token()
    }
}
