// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Engine Types
 * Run configuration and per-endpoint result types
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every endpoint starts the run with this score; failed probes subtract
/// their weight from it. The score is never clamped.
pub const BASE_SCORE: i32 = 100;

/// One target endpoint to assess. Immutable during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub url: String,

    /// HTTP method the endpoint is normally invoked with (GET, POST, ...)
    pub method: String,

    /// Request body template. May contain the `%s` marker where injection
    /// and XSS payloads are substituted; sent as-is for the baseline request.
    #[serde(default)]
    pub body_template: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            body_template: String::new(),
        }
    }

    pub fn with_body_template(mut self, template: impl Into<String>) -> Self {
        self.body_template = template.into();
        self
    }

    /// Substitute the payload marker in the body template. Templates without
    /// a marker are returned unchanged.
    pub fn render_body(&self, payload: &str) -> String {
        self.body_template.replace("%s", payload)
    }
}

/// Baseline authentication material for the run.
///
/// `bearer_token` is optional richer material handed over by the external
/// authentication manager; when present it is attached as an
/// `Authorization: Bearer` header instead of basic auth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            bearer_token: None,
        }
    }
}

/// Ordered attack-string collections, one sequence per probe family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadSet {
    pub sql: Vec<String>,
    pub xss: Vec<String>,
    pub nosql: Vec<String>,
}

impl Default for PayloadSet {
    fn default() -> Self {
        Self {
            sql: crate::payloads::default_sql_payloads(),
            xss: crate::payloads::default_xss_payloads(),
            nosql: crate::payloads::default_nosql_payloads(),
        }
    }
}

/// Throttling policy for the shared admission gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionConfig {
    /// Sustained ceiling for outbound requests per second.
    pub requests_per_second: i32,

    /// Peak number of simultaneously outstanding HTTP exchanges.
    pub max_in_flight: i32,
}

pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 5;

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND as i32,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT as i32,
        }
    }
}

impl AdmissionConfig {
    /// Effective rate, with non-positive values replaced by the default.
    pub fn effective_rps(&self) -> u32 {
        if self.requests_per_second <= 0 {
            DEFAULT_REQUESTS_PER_SECOND
        } else {
            self.requests_per_second as u32
        }
    }

    /// Effective concurrency ceiling, with non-positive values replaced by
    /// the default.
    pub fn effective_max_in_flight(&self) -> usize {
        if self.max_in_flight <= 0 {
            DEFAULT_MAX_IN_FLIGHT
        } else {
            self.max_in_flight as usize
        }
    }
}

/// Validated run configuration, produced upstream by config loading or the
/// OpenAPI-driven generator. The orchestrator rejects configurations that
/// violate the contract (empty endpoint or payload lists) before any
/// probing starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    pub endpoints: Vec<Endpoint>,

    pub credentials: Credentials,

    #[serde(default)]
    pub payloads: PayloadSet,

    #[serde(default)]
    pub admission: AdmissionConfig,

    /// Extra headers attached to probe requests that carry credentials.
    #[serde(default)]
    pub custom_headers: HashMap<String, String>,

    /// Opt-in: also run the NoSQL injection probe. Off by default; it is
    /// not part of the standard seven-probe fan-out.
    #[serde(default)]
    pub include_nosql: bool,
}

impl ScanConfig {
    pub fn new(endpoints: Vec<Endpoint>, credentials: Credentials) -> Self {
        Self {
            endpoints,
            credentials,
            payloads: PayloadSet::default(),
            admission: AdmissionConfig::default(),
            custom_headers: HashMap::new(),
            include_nosql: false,
        }
    }
}

/// One probe's verdict for one endpoint. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    pub probe_name: String,
    pub passed: bool,
    pub message: String,

    /// Weight subtracted from the endpoint score when `passed` is false.
    pub weight: i32,
}

impl ProbeOutcome {
    pub fn pass(probe_name: &str, weight: i32, message: impl Into<String>) -> Self {
        Self {
            probe_name: probe_name.to_string(),
            passed: true,
            message: message.into(),
            weight,
        }
    }

    pub fn fail(probe_name: &str, weight: i32, message: impl Into<String>) -> Self {
        Self {
            probe_name: probe_name.to_string(),
            passed: false,
            message: message.into(),
            weight,
        }
    }
}

/// Aggregate result for one endpoint: the unclamped score and the verdict
/// of every applicable probe, sorted by probe name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointResult {
    pub url: String,
    pub score: i32,
    pub outcomes: Vec<ProbeOutcome>,
    pub scanned_at: String,
}

impl EndpointResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            score: BASE_SCORE,
            outcomes: Vec::new(),
            scanned_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn failed_probes(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_body_substitutes_marker() {
        let ep = Endpoint::new("http://t/api", "POST").with_body_template(r#"{"q":"%s"}"#);
        assert_eq!(ep.render_body("' OR '1'='1"), r#"{"q":"' OR '1'='1"}"#);
    }

    #[test]
    fn render_body_without_marker_is_identity() {
        let ep = Endpoint::new("http://t/api", "POST").with_body_template(r#"{"q":"static"}"#);
        assert_eq!(ep.render_body("ignored"), r#"{"q":"static"}"#);
    }

    #[test]
    fn admission_defaults_replace_non_positive_values() {
        let cfg = AdmissionConfig {
            requests_per_second: 0,
            max_in_flight: -3,
        };
        assert_eq!(cfg.effective_rps(), DEFAULT_REQUESTS_PER_SECOND);
        assert_eq!(cfg.effective_max_in_flight(), DEFAULT_MAX_IN_FLIGHT);
    }

    #[test]
    fn admission_positive_values_pass_through() {
        let cfg = AdmissionConfig {
            requests_per_second: 50,
            max_in_flight: 12,
        };
        assert_eq!(cfg.effective_rps(), 50);
        assert_eq!(cfg.effective_max_in_flight(), 12);
    }
}
