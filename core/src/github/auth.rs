//! GitHub App authentication
//!
//! Generates the App JWT every other credential is derived from.

use serde::{Deserialize, Serialize};

use crate::config::Options;
use crate::context::Context;
use crate::credential::{Authorization, Credential, CredentialKind};
use crate::error::{AuthError, Result, ValidationFailure};

/// Validity window of the App JWT
pub const APP_JWT_TTL_SECS: i64 = 600;

/// Backdating of `iat` to absorb clock drift against GitHub
const APP_JWT_IAT_SKEW_SECS: i64 = 60;

/// GitHub App JWT claims
#[derive(Serialize, Deserialize)]
struct AppJwtClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// JWT signer that uses a local PEM private key
pub struct PemJwtSigner {
    pub app_id: String,
    pub pem_key: String,
}

impl PemJwtSigner {
    pub fn sign_app_jwt(&self, now_secs: i64) -> Result<String> {
        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

        let claims = AppJwtClaims {
            iat: now_secs - APP_JWT_IAT_SKEW_SECS,
            exp: now_secs + APP_JWT_TTL_SECS,
            iss: self.app_id.clone(),
        };

        let key = EncodingKey::from_rsa_pem(self.pem_key.as_bytes())
            .map_err(|e| AuthError::internal(format!("invalid private key: {}", e)))?;

        let header = Header::new(Algorithm::RS256);

        encode(&header, &claims, &key)
            .map_err(|e| AuthError::internal(format!("failed to encode JWT: {}", e)))
    }
}

/// Check the App inputs, reporting every missing one at once
fn app_signer(opts: &Options) -> Result<PemJwtSigner> {
    let mut failures = Vec::new();
    if opts.app_id.is_none() {
        failures.push(ValidationFailure::new("Must give appId", &["appId"]));
    }
    match (&opts.private_key, &opts.private_key_path) {
        (Some(_), _) => {}
        (None, Some(path)) => failures.push(ValidationFailure::new(
            format!("privateKeyPath {} was given but no key was loaded from it", path.display()),
            &["privateKey"],
        )),
        (None, None) => failures.push(ValidationFailure::new(
            "Must give either privateKey or privateKeyPath",
            &["privateKey", "privateKeyPath"],
        )),
    }

    match (&opts.app_id, &opts.private_key) {
        (Some(app_id), Some(pem_key)) => Ok(PemJwtSigner {
            app_id: app_id.clone(),
            pem_key: pem_key.clone(),
        }),
        _ => Err(ValidationFailure::merge(&failures).into()),
    }
}

/// Mint the App JWT
pub async fn create_app_token(ctx: &Context<'_>, opts: &Options) -> Result<Credential> {
    let signer = app_signer(opts)?;
    let ctx = ctx.child("create_app_token");

    tracing::debug!(parent: &ctx.span, app_id = %signer.app_id, "creating app token");
    let jwt = signer.sign_app_jwt(ctx.clock.now_secs() as i64)?;

    Ok(Credential::new(CredentialKind::App, jwt))
}

/// `Bearer <app jwt>`
pub async fn create_app_authorization(ctx: &Context<'_>, opts: &Options) -> Result<Authorization> {
    Ok(create_app_token(ctx, opts).await?.authorization())
}
