// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Registry
 * Probe catalogue, shared execution context, and dispatch
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
pub mod auth;
pub mod auth_bypass;
pub mod headers;
pub mod injection;
pub mod method;
pub mod tampering;
pub mod xss;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::admission::AdmissionController;
use crate::errors::{ProbeError, ProbeResult};
use crate::http_client::{HttpClient, HttpResponse, ProbeRequest};
use crate::types::{Credentials, Endpoint, PayloadSet, ProbeOutcome};

/// The probe families the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Auth,
    HttpMethod,
    SqlInjection,
    NoSqlInjection,
    Xss,
    HeaderSecurity,
    AuthBypass,
    ParameterTampering,
}

/// Catalogue entry: name and weight are data, not code. Adding a probe to
/// a run means adding a row here, not a new branch in the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSpec {
    pub name: &'static str,
    pub weight: i32,
    pub kind: ProbeKind,
}

/// Standard fan-out: the seven probes every endpoint gets.
pub const DEFAULT_PROBES: &[ProbeSpec] = &[
    ProbeSpec { name: "Auth", weight: 30, kind: ProbeKind::Auth },
    ProbeSpec { name: "HTTP-Method", weight: 20, kind: ProbeKind::HttpMethod },
    ProbeSpec { name: "SQL-Injection", weight: 50, kind: ProbeKind::SqlInjection },
    ProbeSpec { name: "XSS", weight: 40, kind: ProbeKind::Xss },
    ProbeSpec { name: "Header-Security", weight: 25, kind: ProbeKind::HeaderSecurity },
    ProbeSpec { name: "Auth-Bypass", weight: 35, kind: ProbeKind::AuthBypass },
    ProbeSpec { name: "Parameter-Tampering", weight: 30, kind: ProbeKind::ParameterTampering },
];

/// Opt-in probe, enabled per run via `ScanConfig::include_nosql`.
pub const NOSQL_PROBE: ProbeSpec = ProbeSpec {
    name: "NoSQL-Injection",
    weight: 50,
    kind: ProbeKind::NoSqlInjection,
};

/// The catalogue applicable to one run.
pub fn probe_set(include_nosql: bool) -> Vec<ProbeSpec> {
    let mut probes = DEFAULT_PROBES.to_vec();
    if include_nosql {
        probes.push(NOSQL_PROBE);
    }
    probes
}

/// Shared state every probe task borrows: HTTP client, admission gate,
/// credentials, payloads, and the run-wide cancellation signal. Cheap to
/// clone; all heavy members are behind `Arc`.
#[derive(Clone)]
pub struct ProbeContext {
    pub client: Arc<HttpClient>,
    pub admission: Arc<AdmissionController>,
    pub credentials: Credentials,
    pub payloads: Arc<PayloadSet>,
    pub custom_headers: Arc<HashMap<String, String>>,
    cancel: watch::Receiver<bool>,
}

impl ProbeContext {
    pub fn new(
        client: Arc<HttpClient>,
        admission: Arc<AdmissionController>,
        credentials: Credentials,
        payloads: Arc<PayloadSet>,
        custom_headers: Arc<HashMap<String, String>>,
        cancel: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client,
            admission,
            credentials,
            payloads,
            custom_headers,
            cancel,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Send one probe exchange through the admission gate. Waiting for a
    /// slot races against cancellation so an aborted run drains quickly
    /// instead of finishing its queue.
    pub async fn send(&self, request: ProbeRequest) -> Result<HttpResponse, ProbeError> {
        if self.is_cancelled() {
            return Err(ProbeError::Inconclusive("scan cancelled".to_string()));
        }

        // A closed channel means cancellation can never be requested; that
        // branch is disabled rather than treated as a stop signal.
        let mut cancel = self.cancel.clone();
        let _permit = tokio::select! {
            permit = self.admission.acquire() => permit,
            Ok(_) = cancel.wait_for(|&stop| stop) => {
                return Err(ProbeError::Inconclusive("scan cancelled".to_string()));
            }
        };

        self.client
            .execute(&request)
            .await
            .map_err(|e| ProbeError::Inconclusive(format!("request failed: {:#}", e)))
    }

    /// Baseline request for an endpoint: its own method, its template body
    /// untouched, run credentials and custom headers attached.
    pub fn authenticated_request(&self, endpoint: &Endpoint) -> ProbeRequest {
        let mut request = ProbeRequest::new(&endpoint.method, &endpoint.url)
            .with_headers(self.custom_headers.iter());
        if !endpoint.body_template.is_empty() {
            request = request.with_body(endpoint.body_template.clone());
        }
        self.attach_credentials(request)
    }

    pub fn attach_credentials(&self, request: ProbeRequest) -> ProbeRequest {
        if let Some(token) = &self.credentials.bearer_token {
            request.with_bearer(token)
        } else {
            request.with_basic_auth(&self.credentials.username, &self.credentials.password)
        }
    }
}

/// Run one catalogue entry against one endpoint. Never panics and never
/// escapes an error: every execution collapses into exactly one outcome.
pub async fn run_probe(spec: &ProbeSpec, ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeOutcome {
    debug!("[Probe] {} starting on {}", spec.name, endpoint.url);

    let verdict: ProbeResult = match spec.kind {
        ProbeKind::Auth => auth::run(ctx, endpoint).await,
        ProbeKind::HttpMethod => method::run(ctx, endpoint).await,
        ProbeKind::SqlInjection => injection::run_sql(ctx, endpoint).await,
        ProbeKind::NoSqlInjection => injection::run_nosql(ctx, endpoint).await,
        ProbeKind::Xss => xss::run(ctx, endpoint).await,
        ProbeKind::HeaderSecurity => headers::run(ctx, endpoint).await,
        ProbeKind::AuthBypass => auth_bypass::run(ctx, endpoint).await,
        ProbeKind::ParameterTampering => tampering::run(ctx, endpoint).await,
    };

    match verdict {
        Ok(()) => ProbeOutcome::pass(spec.name, spec.weight, "No issues detected"),
        Err(err) => {
            warn!("[Probe] {} failed on {}: {}", spec.name, endpoint.url, err);
            ProbeOutcome::fail(spec.name, spec.weight, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalogue_holds_seven_probes() {
        assert_eq!(DEFAULT_PROBES.len(), 7);
        let total: i32 = DEFAULT_PROBES.iter().map(|p| p.weight).sum();
        assert_eq!(total, 230);
    }

    #[test]
    fn nosql_is_opt_in() {
        assert_eq!(probe_set(false).len(), 7);
        let with_nosql = probe_set(true);
        assert_eq!(with_nosql.len(), 8);
        assert!(with_nosql.iter().any(|p| p.name == "NoSQL-Injection"));
    }

    #[test]
    fn probe_names_are_unique() {
        let mut names: Vec<_> = probe_set(true).iter().map(|p| p.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
    }
}
