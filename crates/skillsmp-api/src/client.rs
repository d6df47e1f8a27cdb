//! HTTP client for the SkillsMP search endpoints.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::{Credential, Query, SearchOutcome, SkillsmpError, SkillsmpResult};

/// Production API root. Endpoints are `{base}/search` and `{base}/ai-search`.
pub const DEFAULT_BASE_URL: &str = "https://skillsmp.com/api/v1/skills";

/// Whole-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("skillsmp-cli/", env!("CARGO_PKG_VERSION"));

const KEYWORD_ENDPOINT: &str = "search";
const SEMANTIC_ENDPOINT: &str = "ai-search";

/// Sends one search request per call and parses the reply.
#[derive(Debug)]
pub struct SkillsmpClient {
    http: Client,
    base_url: String,
    credential: Credential,
}

impl SkillsmpClient {
    /// Client against the production API.
    pub fn new(credential: Credential) -> SkillsmpResult<Self> {
        Self::with_base_url(credential, DEFAULT_BASE_URL)
    }

    /// Client against a custom API root (staging, or a mock server in tests).
    pub fn with_base_url(
        credential: Credential,
        base_url: impl Into<String>,
    ) -> SkillsmpResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run `query` against the matching endpoint and build typed results.
    pub async fn search(&self, query: &Query) -> SkillsmpResult<SearchOutcome> {
        let raw = self.fetch(query).await?;
        let outcome = SearchOutcome::from_raw(query.clone(), raw)?;

        tracing::debug!(
            mode = query.mode().as_str(),
            hits = outcome.results.hits().len(),
            "search complete"
        );
        Ok(outcome)
    }

    /// Run `query` and return the response body without interpreting it.
    ///
    /// Keyword queries send `q`, `limit`, `page` and `sortBy`; semantic queries
    /// send only `q`.
    pub async fn fetch(&self, query: &Query) -> SkillsmpResult<Value> {
        match query {
            Query::Keyword { text, options } => {
                let limit = options.limit.to_string();
                let page = options.page.to_string();
                let params = [
                    ("q", text.as_str()),
                    ("limit", limit.as_str()),
                    ("page", page.as_str()),
                    ("sortBy", options.sort.as_str()),
                ];
                self.get_json(KEYWORD_ENDPOINT, &params).await
            }
            Query::Semantic { text } => {
                self.get_json(SEMANTIC_ENDPOINT, &[("q", text.as_str())])
                    .await
            }
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> SkillsmpResult<Url> {
        let url = format!("{}/{}", self.base_url, path);
        Url::parse_with_params(&url, params)
            .map_err(|e| SkillsmpError::config(format!("invalid API URL {}: {}", url, e)))
    }

    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> SkillsmpResult<Value> {
        let url = self.endpoint(path, params)?;
        tracing::debug!(%url, "sending request");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.credential.expose())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "received response");

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Build an [`SkillsmpError::Api`], preferring the service's own message.
fn api_error(status: StatusCode, body: &[u8]) -> SkillsmpError {
    let from_body = serde_json::from_slice::<Value>(body).ok().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("error"))
            .or_else(|| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    let message = from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    });

    SkillsmpError::Api {
        status: status.as_u16(),
        message,
    }
}
