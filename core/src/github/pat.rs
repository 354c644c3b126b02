//! Personal access token passthrough

use crate::config::Options;
use crate::credential::{Authorization, Credential, CredentialKind};
use crate::error::{AuthError, Result};

pub fn personal_access_token(opts: &Options) -> Result<Credential> {
    opts.personal_access_token
        .as_ref()
        .map(|token| Credential::new(CredentialKind::PersonalAccess, token.clone()))
        .ok_or_else(|| {
            AuthError::validation("Must give personalAccessToken", &["personalAccessToken"])
        })
}

/// `token <pat>`
pub fn personal_access_authorization(opts: &Options) -> Result<Authorization> {
    Ok(personal_access_token(opts)?.authorization())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_access_authorization() {
        let opts = Options {
            personal_access_token: Some("ghp_abc".to_string()),
            ..Default::default()
        };
        assert_eq!(personal_access_authorization(&opts).unwrap().as_str(), "token ghp_abc");
    }

    #[test]
    fn test_missing_personal_access_token() {
        let err = personal_access_authorization(&Options::default()).err().unwrap();
        assert_eq!(
            err,
            AuthError::validation("Must give personalAccessToken", &["personalAccessToken"])
        );
    }
}
