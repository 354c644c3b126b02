//! Fallback between authorization strategies
//!
//! Strategies run one at a time in order. The first success wins. A
//! strategy that cannot apply (validation failure) hands over to the next
//! one; any other failure means the strategy applied and broke, so it ends
//! the chain as is.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::config::Options;
use crate::context::Context;
use crate::credential::Authorization;
use crate::error::{AuthError, Result, ValidationFailure};
use crate::github::{installation, pat};

/// One way of producing an `Authorization` from the options
#[async_trait(?Send)]
pub trait AuthorizationStrategy {
    fn name(&self) -> &'static str;
    async fn authorize(&self, ctx: &Context<'_>, opts: &Options) -> Result<Authorization>;
}

/// Authenticate as a GitHub App installation
pub struct InstallationStrategy;

#[async_trait(?Send)]
impl AuthorizationStrategy for InstallationStrategy {
    fn name(&self) -> &'static str {
        "installation"
    }

    async fn authorize(&self, ctx: &Context<'_>, opts: &Options) -> Result<Authorization> {
        installation::create_installation_authorization(ctx, opts).await
    }
}

/// Authenticate with the caller's personal access token
pub struct PersonalAccessStrategy;

#[async_trait(?Send)]
impl AuthorizationStrategy for PersonalAccessStrategy {
    fn name(&self) -> &'static str {
        "personal_access"
    }

    async fn authorize(&self, _ctx: &Context<'_>, opts: &Options) -> Result<Authorization> {
        pat::personal_access_authorization(opts)
    }
}

/// Order in which scoped minters try their strategies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackOrder {
    #[default]
    InstallationFirst,
    PersonalAccessFirst,
}

impl FallbackOrder {
    pub fn strategies(self) -> [&'static dyn AuthorizationStrategy; 2] {
        match self {
            Self::InstallationFirst => [&InstallationStrategy, &PersonalAccessStrategy],
            Self::PersonalAccessFirst => [&PersonalAccessStrategy, &InstallationStrategy],
        }
    }
}

impl FromStr for FallbackOrder {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "installation-first" => Ok(Self::InstallationFirst),
            "personal-access-first" => Ok(Self::PersonalAccessFirst),
            _ => Err(AuthError::validation(
                format!(
                    "fallbackOrder must be installation-first or personal-access-first, got '{}'",
                    s
                ),
                &["fallbackOrder"],
            )),
        }
    }
}

impl fmt::Display for FallbackOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InstallationFirst => "installation-first",
            Self::PersonalAccessFirst => "personal-access-first",
        })
    }
}

/// Return the first authorization a strategy produces.
///
/// Validation failures are collected and, if every strategy fails that way,
/// merged into one. Any other error is returned immediately.
pub async fn try_strategies(
    ctx: &Context<'_>,
    strategies: &[&dyn AuthorizationStrategy],
    opts: &Options,
) -> Result<Authorization> {
    let ctx = ctx.child("try_strategies");
    let mut failures = Vec::with_capacity(strategies.len());

    for strategy in strategies {
        tracing::debug!(parent: &ctx.span, strategy = strategy.name(), "trying strategy");
        match strategy.authorize(&ctx, opts).await {
            Ok(authorization) => return Ok(authorization),
            Err(AuthError::Validation(failure)) => {
                tracing::debug!(
                    parent: &ctx.span,
                    strategy = strategy.name(),
                    reason = %failure,
                    "strategy not applicable"
                );
                failures.push(failure);
            }
            Err(e) => return Err(e),
        }
    }

    if failures.is_empty() {
        return Err(AuthError::internal("no authorization strategies given"));
    }

    Err(ValidationFailure::merge(&failures).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{Credential, CredentialKind};
    use crate::test_support::{json_response, test_keypair, MockClock, MockHttp, TEST_TIMESTAMP};
    use std::cell::Cell;

    /// Strategy with a canned outcome that counts its calls
    struct Fixed {
        outcome: Result<Authorization>,
        calls: Cell<u32>,
    }

    impl Fixed {
        fn ok(token: &str) -> Self {
            Self {
                outcome: Ok(Credential::new(CredentialKind::PersonalAccess, token).authorization()),
                calls: Cell::new(0),
            }
        }

        fn err(error: AuthError) -> Self {
            Self {
                outcome: Err(error),
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl AuthorizationStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn authorize(&self, _ctx: &Context<'_>, _opts: &Options) -> Result<Authorization> {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn ctx<'a>(http: &'a MockHttp, clock: &'a MockClock) -> Context<'a> {
        Context::new(http, clock, tracing::Span::none())
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let http = MockHttp::new(vec![]);
        let clock = MockClock(TEST_TIMESTAMP);
        let f1 = Fixed::ok("first");
        let f2 = Fixed::ok("second");

        let auth = try_strategies(&ctx(&http, &clock), &[&f1, &f2], &Options::default())
            .await
            .unwrap();
        assert_eq!(auth.as_str(), "token first");
        assert_eq!(f1.calls.get(), 1);
        assert_eq!(f2.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_falls_through() {
        let http = MockHttp::new(vec![]);
        let clock = MockClock(TEST_TIMESTAMP);
        let f1 = Fixed::err(AuthError::validation("Must give A", &["A"]));
        let f2 = Fixed::ok("second");

        let auth = try_strategies(&ctx(&http, &clock), &[&f1, &f2], &Options::default())
            .await
            .unwrap();
        assert_eq!(auth.as_str(), "token second");
        assert_eq!(f2.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_all_validation_failures_merge() {
        let http = MockHttp::new(vec![]);
        let clock = MockClock(TEST_TIMESTAMP);
        let f1 = Fixed::err(AuthError::validation("Must give A", &["A"]));
        let f2 = Fixed::err(AuthError::validation("Must give B", &["B"]));

        let err = try_strategies(&ctx(&http, &clock), &[&f1, &f2], &Options::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Must give A OR Must give B");
        assert_eq!(err.fields(), ["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_operational_failure_stops_chain() {
        let http = MockHttp::new(vec![]);
        let clock = MockClock(TEST_TIMESTAMP);
        let f1 = Fixed::err(AuthError::upstream("connection reset"));
        let f2 = Fixed::ok("second");

        let err = try_strategies(&ctx(&http, &clock), &[&f1, &f2], &Options::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err, AuthError::upstream("connection reset"));
        assert_eq!(f2.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_empty_strategy_list() {
        let http = MockHttp::new(vec![]);
        let clock = MockClock(TEST_TIMESTAMP);

        let err = try_strategies(&ctx(&http, &clock), &[], &Options::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_installation_not_found_does_not_fall_back_to_pat() {
        let http = MockHttp::new(vec![(
            "GET",
            "/app/installations",
            json_response(200, serde_json::json!([])),
        )]);
        let clock = MockClock(TEST_TIMESTAMP);
        let opts = Options {
            app_id: Some("1".to_string()),
            private_key: Some(test_keypair().0.clone()),
            org_name: Some("org1".to_string()),
            personal_access_token: Some("ghp_fallback".to_string()),
            ..Default::default()
        };

        let err = try_strategies(
            &ctx(&http, &clock),
            &FallbackOrder::InstallationFirst.strategies(),
            &opts,
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, AuthError::InstallationNotFound { .. }));
    }

    #[tokio::test]
    async fn test_builtin_strategies_merge_their_failures() {
        let http = MockHttp::new(vec![]);
        let clock = MockClock(TEST_TIMESTAMP);

        let err = try_strategies(
            &ctx(&http, &clock),
            &FallbackOrder::InstallationFirst.strategies(),
            &Options::default(),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(
            err.to_string(),
            "Must give either installationId, orgName, or repoName OR Must give personalAccessToken"
        );
        assert_eq!(
            err.fields(),
            [
                "installationId".to_string(),
                "orgName".to_string(),
                "repoName".to_string(),
                "personalAccessToken".to_string()
            ]
        );
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_personal_access_first_order() {
        let http = MockHttp::new(vec![]);
        let clock = MockClock(TEST_TIMESTAMP);
        let opts = Options {
            installation_id: Some(5),
            personal_access_token: Some("ghp_first".to_string()),
            ..Default::default()
        };

        let auth = try_strategies(
            &ctx(&http, &clock),
            &FallbackOrder::PersonalAccessFirst.strategies(),
            &opts,
        )
        .await
        .unwrap();
        assert_eq!(auth.as_str(), "token ghp_first");
        assert!(http.requests().is_empty());
    }

    #[test]
    fn test_fallback_order_parse() {
        assert_eq!(
            "installation-first".parse::<FallbackOrder>().unwrap(),
            FallbackOrder::InstallationFirst
        );
        assert_eq!(
            FallbackOrder::PersonalAccessFirst.to_string().parse::<FallbackOrder>().unwrap(),
            FallbackOrder::PersonalAccessFirst
        );
        assert!("random".parse::<FallbackOrder>().is_err());
    }
}
