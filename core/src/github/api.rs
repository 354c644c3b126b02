//! GitHub REST client
//!
//! Thin wrapper over [`HttpClient`] bound to one base URL and one
//! `Authorization` header, reading JSON responses.

use serde::de::DeserializeOwned;

use crate::config::Options;
use crate::credential::Authorization;
use crate::error::{AuthError, Result};
use crate::platform::{HttpClient, HttpResponse};

const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = "ghauth";
const API_VERSION: &str = "2022-11-28";

pub(crate) struct ApiClient<'a> {
    http: &'a dyn HttpClient,
    base_url: String,
    authorization: Authorization,
}

impl<'a> ApiClient<'a> {
    pub fn new(http: &'a dyn HttpClient, opts: &Options, authorization: Authorization) -> Self {
        Self {
            http,
            base_url: opts.api_url().to_string(),
            authorization,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url, &self.headers())
            .await
            .map_err(|e| AuthError::upstream(format!("failed to call GitHub API: {}", e)))?;

        decode("GET", path, response)
    }

    /// POST with an empty body
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .http
            .post(&url, &self.headers(), &[])
            .await
            .map_err(|e| AuthError::upstream(format!("failed to call GitHub API: {}", e)))?;

        decode("POST", path, response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self) -> [(&str, &str); 4] {
        [
            ("Authorization", self.authorization.as_str()),
            ("Accept", ACCEPT),
            ("User-Agent", USER_AGENT),
            ("X-GitHub-Api-Version", API_VERSION),
        ]
    }
}

fn decode<T: DeserializeOwned>(method: &str, path: &str, response: HttpResponse) -> Result<T> {
    if !response.is_success() {
        return Err(AuthError::upstream(format!(
            "GitHub API error on {} {} ({}): {}",
            method,
            path,
            response.status,
            response.text()
        )));
    }

    response
        .json()
        .map_err(|e| AuthError::upstream(format!("failed to parse response from {}: {}", path, e)))
}
