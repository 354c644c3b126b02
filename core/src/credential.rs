//! Credentials and the `Authorization` header values built from them

use std::fmt;

/// What a token string proves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialKind {
    /// Self-signed App JWT
    App,
    /// Installation access token obtained by exchanging an App JWT
    Installation,
    /// Caller-supplied personal access token
    PersonalAccess,
}

impl CredentialKind {
    /// Authorization header scheme for this kind
    pub fn scheme(self) -> &'static str {
        match self {
            Self::App | Self::Installation => "Bearer",
            Self::PersonalAccess => "token",
        }
    }
}

/// A freshly minted (or caller-supplied) token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    kind: CredentialKind,
    token: String,
}

impl Credential {
    pub fn new(kind: CredentialKind, token: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
        }
    }

    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn into_token(self) -> String {
        self.token
    }

    /// Wrap into a header value: `Bearer <t>` or `token <t>`
    pub fn authorization(&self) -> Authorization {
        Authorization {
            kind: self.kind,
            value: format!("{} {}", self.kind.scheme(), self.token),
        }
    }
}

// Tokens stay out of debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Value ready to be sent as the `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub struct Authorization {
    kind: CredentialKind,
    value: String,
}

impl Authorization {
    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// The bare token without its scheme prefix
    pub fn strip_scheme(&self) -> &str {
        let prefix_len = self.kind.scheme().len() + 1;
        &self.value[prefix_len..]
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("scheme", &self.kind.scheme())
            .field("value", &"<redacted>")
            .finish()
    }
}
