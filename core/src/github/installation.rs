//! Installation lookup and installation token exchange

use serde::Deserialize;

use crate::config::Options;
use crate::context::Context;
use crate::credential::{Authorization, Credential, CredentialKind};
use crate::error::{AuthError, Result};

use super::api::ApiClient;
use super::auth;

const ORGANIZATION_ACCOUNT: &str = "Organization";

/// Entry of `GET /app/installations`
#[derive(Debug, Deserialize)]
struct Installation {
    id: u64,
    account: Option<Account>,
}

/// Enterprise accounts carry `slug`/`name` and no `login`
#[derive(Debug, Deserialize)]
struct Account {
    login: Option<String>,
    #[serde(rename = "type")]
    account_type: Option<String>,
}

impl Account {
    fn is_org(&self, org_name: &str) -> bool {
        self.account_type.as_deref() == Some(ORGANIZATION_ACCOUNT)
            && self.login.as_deref() == Some(org_name)
    }
}

/// Installation token response from GitHub
#[derive(Deserialize)]
struct AccessTokenResponse {
    token: String,
}

/// Where the installation id comes from
enum InstallationTarget<'a> {
    Id(u64),
    Org(&'a str),
}

fn installation_target(opts: &Options) -> Result<InstallationTarget<'_>> {
    match (opts.installation_id, opts.org_name()) {
        (Some(id), _) => Ok(InstallationTarget::Id(id)),
        (None, Some(org)) => Ok(InstallationTarget::Org(org)),
        (None, None) => Err(AuthError::validation(
            "Must give either installationId, orgName, or repoName",
            &["installationId", "orgName", "repoName"],
        )),
    }
}

/// First organization installation whose login matches, in listing order
fn find_org_installation(
    ctx: &Context<'_>,
    installations: &[Installation],
    org_name: &str,
) -> Option<u64> {
    installations
        .iter()
        .find(|installation| match &installation.account {
            Some(account) => {
                tracing::trace!(
                    parent: &ctx.span,
                    id = installation.id,
                    account_type = ?account.account_type,
                    login = ?account.login,
                    "checking installation"
                );
                account.is_org(org_name)
            }
            None => {
                tracing::trace!(
                    parent: &ctx.span,
                    id = installation.id,
                    "installation has no account"
                );
                false
            }
        })
        .map(|installation| installation.id)
}

async fn resolve_installation_id(
    ctx: &Context<'_>,
    client: &ApiClient<'_>,
    target: InstallationTarget<'_>,
) -> Result<u64> {
    let org_name = match target {
        InstallationTarget::Id(id) => return Ok(id),
        InstallationTarget::Org(org) => org,
    };

    tracing::debug!(parent: &ctx.span, org = org_name, "looking up installation by org name");
    let installations: Vec<Installation> = client.get("/app/installations").await?;
    tracing::trace!(parent: &ctx.span, count = installations.len(), "listed installations");

    find_org_installation(ctx, &installations, org_name).ok_or_else(|| {
        tracing::debug!(parent: &ctx.span, org = org_name, "no installation matched");
        AuthError::installation_not_found("Could not find installation")
    })
}

/// Exchange the App JWT for an installation access token
pub async fn create_installation_token(ctx: &Context<'_>, opts: &Options) -> Result<Credential> {
    let target = installation_target(opts)?;
    let ctx = ctx.child("create_installation_token");

    let app_authorization = auth::create_app_authorization(&ctx, opts).await?;
    let client = ApiClient::new(ctx.http, opts, app_authorization);

    let installation_id = resolve_installation_id(&ctx, &client, target).await?;

    tracing::debug!(parent: &ctx.span, installation_id, "creating installation token");
    let response: AccessTokenResponse = client
        .post(&format!("/app/installations/{}/access_tokens", installation_id))
        .await?;

    Ok(Credential::new(CredentialKind::Installation, response.token))
}

/// `Bearer <installation token>`
pub async fn create_installation_authorization(
    ctx: &Context<'_>,
    opts: &Options,
) -> Result<Authorization> {
    Ok(create_installation_token(ctx, opts).await?.authorization())
}
