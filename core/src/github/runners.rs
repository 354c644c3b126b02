//! Self-hosted runner registration and removal tokens
//!
//! Each token is scoped to a repository, an organization or an enterprise.
//! The caller is authenticated through the configured strategy order.

use serde::Deserialize;

use crate::config::Options;
use crate::context::Context;
use crate::error::{AuthError, Result};
use crate::strategy::try_strategies;

use super::api::ApiClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerScope {
    Repo,
    Org,
    Enterprise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerTokenAction {
    Registration,
    Remove,
}

impl RunnerTokenAction {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Registration => "registration-token",
            Self::Remove => "remove-token",
        }
    }
}

#[derive(Deserialize)]
struct RunnerTokenResponse {
    token: String,
}

/// API path prefix for the scope, from the options
fn scope_path(scope: RunnerScope, opts: &Options) -> Result<String> {
    match scope {
        RunnerScope::Repo => opts
            .repo_name
            .as_deref()
            .map(|repo| format!("/repos/{}", repo))
            .ok_or_else(|| AuthError::validation("Must give repoName", &["repoName"])),
        RunnerScope::Org => opts
            .org_name()
            .map(|org| format!("/orgs/{}", org))
            .ok_or_else(|| {
                AuthError::validation("Must give orgName or repoName", &["orgName", "repoName"])
            }),
        RunnerScope::Enterprise => opts
            .enterprise_name
            .as_deref()
            .map(|enterprise| format!("/enterprises/{}", enterprise))
            .ok_or_else(|| AuthError::validation("Must give enterpriseName", &["enterpriseName"])),
    }
}

/// Mint a runner token and return it verbatim
pub async fn create_runner_token(
    ctx: &Context<'_>,
    opts: &Options,
    scope: RunnerScope,
    action: RunnerTokenAction,
) -> Result<String> {
    let path = format!("{}/actions/runners/{}", scope_path(scope, opts)?, action.endpoint());
    let ctx = ctx.child("create_runner_token");

    let authorization = try_strategies(&ctx, &opts.fallback_order.strategies(), opts).await?;
    let client = ApiClient::new(ctx.http, opts, authorization);

    tracing::debug!(parent: &ctx.span, ?scope, ?action, "creating runner token");
    let response: RunnerTokenResponse = client.post(&path).await?;

    Ok(response.token)
}

pub async fn create_repo_runner_registration_token(
    ctx: &Context<'_>,
    opts: &Options,
) -> Result<String> {
    create_runner_token(ctx, opts, RunnerScope::Repo, RunnerTokenAction::Registration).await
}

pub async fn create_org_runner_registration_token(
    ctx: &Context<'_>,
    opts: &Options,
) -> Result<String> {
    create_runner_token(ctx, opts, RunnerScope::Org, RunnerTokenAction::Registration).await
}

pub async fn create_ent_runner_registration_token(
    ctx: &Context<'_>,
    opts: &Options,
) -> Result<String> {
    create_runner_token(ctx, opts, RunnerScope::Enterprise, RunnerTokenAction::Registration).await
}

pub async fn create_repo_runner_remove_token(ctx: &Context<'_>, opts: &Options) -> Result<String> {
    create_runner_token(ctx, opts, RunnerScope::Repo, RunnerTokenAction::Remove).await
}

pub async fn create_org_runner_remove_token(ctx: &Context<'_>, opts: &Options) -> Result<String> {
    create_runner_token(ctx, opts, RunnerScope::Org, RunnerTokenAction::Remove).await
}

pub async fn create_ent_runner_remove_token(ctx: &Context<'_>, opts: &Options) -> Result<String> {
    create_runner_token(ctx, opts, RunnerScope::Enterprise, RunnerTokenAction::Remove).await
}
