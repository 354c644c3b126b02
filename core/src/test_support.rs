//! Mock implementations of platform traits for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{AuthError, Result};
use crate::platform::{Clock, Environment, HttpClient, HttpResponse};

pub const TEST_TIMESTAMP: u64 = 1706900000;

/// A request seen by [`MockHttp`]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub authorization: Option<String>,
}

/// Mock HTTP client with pre-configured responses, matched by method and URL
/// substring in order. Every call is recorded, matched or not.
pub struct MockHttp {
    responses: Vec<(&'static str, String, HttpResponse)>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttp {
    pub fn new(responses: Vec<(&'static str, &str, HttpResponse)>) -> Self {
        Self {
            responses: responses
                .into_iter()
                .map(|(method, pattern, response)| (method, pattern.to_string(), response))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(
        &self,
        method: &'static str,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            authorization: headers
                .iter()
                .find(|(name, _)| *name == "Authorization")
                .map(|(_, value)| value.to_string()),
        });

        self.responses
            .iter()
            .find(|(m, pattern, _)| *m == method && url.contains(pattern.as_str()))
            .map(|(_, _, response)| response.clone())
            .ok_or_else(|| AuthError::upstream(format!("no mock response for {} {}", method, url)))
    }
}

#[async_trait(?Send)]
impl HttpClient for MockHttp {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.respond("GET", url, headers)
    }

    async fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        _body: &[u8],
    ) -> Result<HttpResponse> {
        self.respond("POST", url, headers)
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string().into_bytes(),
    }
}

/// Mock clock with a fixed timestamp
pub struct MockClock(pub u64);

impl Clock for MockClock {
    fn now_secs(&self) -> u64 {
        self.0
    }
}

/// Mock environment backed by an in-memory HashMap
pub struct MockEnv {
    vars: HashMap<String, String>,
}

impl MockEnv {
    pub fn new(vars: &[(&str, &str)]) -> Self {
        Self {
            vars: vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Environment for MockEnv {
    fn get_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Generate a fresh RSA key pair at runtime (never touches disk)
pub fn generate_rsa_keypair() -> (String, String) {
    use rand::rngs::OsRng;
    use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
    use rsa::RsaPrivateKey;

    let private_key = RsaPrivateKey::new(&mut OsRng, 2048).expect("key generation failed");
    let private_pem = private_key
        .to_pkcs1_pem(LineEnding::LF)
        .expect("private key PEM export failed")
        .to_string();
    let public_pem = private_key
        .to_public_key()
        .to_pkcs1_pem(LineEnding::LF)
        .expect("public key PEM export failed");
    (private_pem, public_pem)
}

/// Shared key pair for tests that only need *a* valid key
pub fn test_keypair() -> &'static (String, String) {
    static KEYPAIR: std::sync::OnceLock<(String, String)> = std::sync::OnceLock::new();
    KEYPAIR.get_or_init(generate_rsa_keypair)
}
