//! GitHub Actions adapter
//!
//! Reads the step inputs from `INPUT_*` variables, mints the requested token,
//! masks it in the job log and publishes it as the `token` output.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use ghauth_core::error::{AuthError, Result};
use ghauth_core::platform::Environment;
use ghauth_core::{Options, TokenKind};

pub const INPUT_PREFIX: &str = "INPUT_";

/// What the step asked for
#[derive(Debug, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: TokenKind,
    pub as_authorization: bool,
}

/// Map a `tokenType` input to a token kind and output form
pub fn parse_token_type(token_type: &str) -> Result<ActionRequest> {
    let (kind, as_authorization) = match token_type {
        "appAuthorization" => (TokenKind::App, true),
        "installationAuthorization" => (TokenKind::Installation, true),
        other => (other.parse()?, false),
    };
    Ok(ActionRequest {
        kind,
        as_authorization,
    })
}

/// Read the token type and options from the step inputs
pub fn read_inputs(env: &dyn Environment) -> Result<(ActionRequest, Options)> {
    let token_type = env
        .get_var(&format!("{}TOKENTYPE", INPUT_PREFIX))
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            AuthError::validation("Input required and not supplied: tokenType", &["tokenType"])
        })?;

    let request = parse_token_type(token_type.trim())?;
    let opts = Options::from_env(env, INPUT_PREFIX)?;
    Ok((request, opts))
}

/// Mask `token` and publish it as the `token` step output
pub fn publish_token(
    token: &str,
    out: &mut impl Write,
    output_file: Option<&Path>,
) -> io::Result<()> {
    writeln!(out, "::add-mask::{}", token)?;

    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "token={}", token)
        }
        None => writeln!(out, "::set-output name=token::{}", token),
    }
}

/// Report a failure the way the runner expects
pub fn report_failure(message: &str, out: &mut impl Write) -> io::Result<()> {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    writeln!(out, "::error::{}", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnv(HashMap<String, String>);

    impl MapEnv {
        fn new(vars: &[(&str, &str)]) -> Self {
            Self(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
        }
    }

    impl Environment for MapEnv {
        fn get_var(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    #[test]
    fn test_parse_token_types() {
        let cases = [
            ("appToken", TokenKind::App, false),
            ("appAuthorization", TokenKind::App, true),
            ("installationToken", TokenKind::Installation, false),
            ("installationAuthorization", TokenKind::Installation, true),
            ("orgRunnerRegistrationToken", TokenKind::OrgRunnerRegistration, false),
            ("repoRunnerRegistrationToken", TokenKind::RepoRunnerRegistration, false),
        ];
        for (input, kind, as_authorization) in cases {
            assert_eq!(
                parse_token_type(input).unwrap(),
                ActionRequest {
                    kind,
                    as_authorization
                }
            );
        }
    }

    #[test]
    fn test_unknown_token_type() {
        let err = parse_token_type("nope").err().unwrap();
        assert!(err.to_string().contains("Unknown token type: nope"));
    }

    #[test]
    fn test_read_inputs() {
        let env = MapEnv::new(&[
            ("INPUT_TOKENTYPE", "repoRunnerRegistrationToken"),
            ("INPUT_REPONAME", "org1/repoA"),
            ("INPUT_PERSONALACCESSTOKEN", "ghp_abc"),
            ("INPUT_APPID", ""),
        ]);

        let (request, opts) = read_inputs(&env).unwrap();
        assert_eq!(request.kind, TokenKind::RepoRunnerRegistration);
        assert_eq!(opts.repo_name.as_deref(), Some("org1/repoA"));
        assert_eq!(opts.app_id, None);
    }

    #[test]
    fn test_token_type_is_required() {
        let env = MapEnv::new(&[("INPUT_TOKENTYPE", "")]);
        let err = read_inputs(&env).err().unwrap();
        assert_eq!(err.fields(), ["tokenType".to_string()]);
    }

    #[test]
    fn test_publish_token_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "other=1\n").unwrap();

        let mut out = Vec::new();
        publish_token("ghs_secret", &mut out, Some(&path)).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "::add-mask::ghs_secret\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "other=1\ntoken=ghs_secret\n");
    }

    #[test]
    fn test_publish_token_without_output_file() {
        let mut out = Vec::new();
        publish_token("ghs_secret", &mut out, None).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "::add-mask::ghs_secret\n::set-output name=token::ghs_secret\n"
        );
    }

    #[test]
    fn test_report_failure_escapes_newlines() {
        let mut out = Vec::new();
        report_failure("line one\nline two", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "::error::line one%0Aline two\n");
    }
}
