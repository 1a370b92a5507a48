// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe HTTP Client
 * Thin reqwest wrapper for single, non-retried probe exchanges
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use anyhow::{Context, Result};
use reqwest::{Client, Method};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default per-exchange timeout. Independent of admission throttling.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Maximum response body size (10MB) to prevent memory exhaustion
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// One outbound probe exchange. Probes never retry: a transport failure is
/// surfaced as-is and classified by the caller.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub method: String,
    pub url: String,
    pub body: Option<String>,
    pub basic_auth: Option<(String, String)>,
    pub bearer_token: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl ProbeRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: None,
            basic_auth: None,
            bearer_token: None,
            headers: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.basic_auth = Some((username.to_string(), password.to_string()));
        self
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_headers<'a, I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (name, value) in headers {
            self.headers.push((name.clone(), value.clone()));
        }
        self
    }
}

/// Response snapshot handed to the detection heuristics. Header names are
/// lowercased; `Set-Cookie` is kept separately because it legitimately
/// repeats and every instance must be inspected.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub set_cookie: Vec<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|v| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status_code, 200 | 201 | 202)
    }
}

/// Byte-level cap before decoding, so a multibyte character straddling
/// the cap can never hit a char-boundary panic.
fn truncated_body(bytes: &[u8], cap: usize) -> String {
    let slice = if bytes.len() > cap { &bytes[..cap] } else { bytes };
    String::from_utf8_lossy(slice).into_owned()
}

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Execute one exchange. No retries, no caching: probe heuristics need
    /// the raw first response, and re-sending attack payloads is never safe.
    pub async fn execute(&self, request: &ProbeRequest) -> Result<HttpResponse> {
        let method = Method::from_str(&request.method.to_uppercase())
            .with_context(|| format!("Invalid HTTP method: {}", request.method))?;

        let mut builder = self.client.request(method, &request.url);

        if let Some((username, password)) = &request.basic_auth {
            builder = builder.basic_auth(username, Some(password));
        }
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Request to {} failed", request.url))?;

        let status_code = response.status().as_u16();

        let mut headers = HashMap::new();
        let mut set_cookie = Vec::new();
        for (name, value) in response.headers() {
            let value = match value.to_str() {
                Ok(v) => v.to_string(),
                Err(_) => continue,
            };
            let name = name.as_str().to_lowercase();
            if name == "set-cookie" {
                set_cookie.push(value);
            } else {
                headers.entry(name).or_insert(value);
            }
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body from {}", request.url))?;
        let body = truncated_body(&bytes, MAX_BODY_SIZE);

        debug!(
            "[HTTP] {} {} -> {} ({} bytes)",
            request.method,
            request.url,
            status_code,
            body.len()
        );

        Ok(HttpResponse {
            status_code,
            headers,
            set_cookie,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("strict-transport-security".to_string(), "max-age=63072000".to_string());
        let response = HttpResponse {
            status_code: 200,
            headers,
            set_cookie: vec![],
            body: String::new(),
        };
        assert!(response.header("Strict-Transport-Security").is_some());
        assert!(response.header("STRICT-TRANSPORT-SECURITY").is_some());
        assert!(response.header("x-missing").is_none());
    }

    #[test]
    fn success_statuses() {
        for (code, expected) in [(200, true), (201, true), (202, true), (204, false), (302, false), (401, false)] {
            let response = HttpResponse {
                status_code: code,
                headers: HashMap::new(),
                set_cookie: vec![],
                body: String::new(),
            };
            assert_eq!(response.is_success(), expected, "status {}", code);
        }
    }

    #[test]
    fn truncation_survives_multibyte_char_on_the_cap() {
        // '€' is three bytes; the cap lands inside it.
        let mut bytes = vec![b'a'; 9];
        bytes.extend_from_slice("€".as_bytes());
        let body = truncated_body(&bytes, 10);
        assert_eq!(body, format!("{}\u{FFFD}", "a".repeat(9)));

        let untouched = truncated_body(b"hello", 10);
        assert_eq!(untouched, "hello");
    }

    #[test]
    fn request_builder_collects_headers() {
        let custom = HashMap::from([("X-Tenant".to_string(), "qa".to_string())]);
        let req = ProbeRequest::new("POST", "http://t/api")
            .with_basic_auth("admin", "password")
            .with_header("X-Probe", "1")
            .with_headers(custom.iter());

        assert_eq!(req.headers.len(), 2);
        assert!(req.basic_auth.is_some());
        assert!(req.bearer_token.is_none());
    }
}
