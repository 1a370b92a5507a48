// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Orchestrator
 * Per-endpoint fan-out, join barrier, scoring, cancellation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::admission::AdmissionController;
use crate::errors::ScanError;
use crate::http_client::HttpClient;
use crate::probes::{self, ProbeContext, ProbeSpec};
use crate::scorer;
use crate::types::{Endpoint, EndpointResult, ProbeOutcome, ScanConfig};

/// Drives one scan run: validates the configuration, fans out one task
/// per applicable probe per endpoint, joins them, and reduces outcomes
/// to scored per-endpoint results.
///
/// Logging goes through `tracing` only; subscriber installation and
/// lifecycle belong to the embedding application.
pub struct ProbeOrchestrator {
    client: Arc<HttpClient>,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
}

impl ProbeOrchestrator {
    pub fn new() -> Result<Self> {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            cancel_tx,
            cancel_rx,
        })
    }

    /// Signal every running and queued probe task to wind down. In-flight
    /// exchanges finish; tasks still waiting for admission abandon their
    /// probe and record an inconclusive outcome.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// The sole programmatic boundary: run every applicable probe against
    /// every endpoint and return one result per endpoint, in input order.
    ///
    /// The only run-level failures are contract violations detected before
    /// any probing starts; probe failures of any kind surface as outcomes,
    /// never as errors from this function.
    pub async fn execute_scan(&self, config: &ScanConfig) -> Result<Vec<EndpointResult>> {
        validate(config)?;

        let admission = Arc::new(AdmissionController::new(config.admission));
        let ctx = ProbeContext::new(
            Arc::clone(&self.client),
            admission,
            config.credentials.clone(),
            Arc::new(config.payloads.clone()),
            Arc::new(config.custom_headers.clone()),
            self.cancel_rx.clone(),
        );
        let probe_set = probes::probe_set(config.include_nosql);

        info!(
            "[Orchestrator] Scanning {} endpoints with {} probes each",
            config.endpoints.len(),
            probe_set.len()
        );

        let mut endpoint_tasks: JoinSet<(usize, EndpointResult)> = JoinSet::new();
        for (index, endpoint) in config.endpoints.iter().enumerate() {
            let ctx = ctx.clone();
            let endpoint = endpoint.clone();
            let probe_set = probe_set.clone();
            endpoint_tasks.spawn(async move {
                let result = scan_endpoint(&ctx, &endpoint, &probe_set).await;
                (index, result)
            });
        }

        // Results come back in completion order; slot them by input index.
        let mut slots: Vec<Option<EndpointResult>> = vec![None; config.endpoints.len()];
        while let Some(joined) = endpoint_tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("[Orchestrator] Endpoint task panicked: {}", e),
            }
        }

        let results = config
            .endpoints
            .iter()
            .zip(slots)
            .map(|(endpoint, slot)| slot.unwrap_or_else(|| aborted_result(endpoint, &probe_set)))
            .collect();

        Ok(results)
    }
}

fn validate(config: &ScanConfig) -> Result<(), ScanError> {
    if config.endpoints.is_empty() {
        return Err(ScanError::Configuration(
            "endpoint list is empty".to_string(),
        ));
    }
    if config.payloads.sql.is_empty() || config.payloads.xss.is_empty() {
        return Err(ScanError::Configuration(
            "SQL and XSS payload lists must be non-empty".to_string(),
        ));
    }
    if config.include_nosql && config.payloads.nosql.is_empty() {
        return Err(ScanError::Configuration(
            "NoSQL probe enabled but NoSQL payload list is empty".to_string(),
        ));
    }
    Ok(())
}

/// Fan out one task per probe and join them all before the result is
/// read. Each task writes to its own pre-sized slot, so no shared
/// mutable outcome list exists.
async fn scan_endpoint(
    ctx: &ProbeContext,
    endpoint: &Endpoint,
    probe_set: &[ProbeSpec],
) -> EndpointResult {
    let mut tasks: JoinSet<(usize, ProbeOutcome)> = JoinSet::new();
    for (slot, spec) in probe_set.iter().enumerate() {
        let ctx = ctx.clone();
        let endpoint = endpoint.clone();
        let spec = *spec;
        tasks.spawn(async move {
            let outcome = probes::run_probe(&spec, &ctx, &endpoint).await;
            (slot, outcome)
        });
    }

    let mut slots: Vec<Option<ProbeOutcome>> = vec![None; probe_set.len()];
    while let Some(joined) = tasks.join_next().await {
        if let Ok((slot, outcome)) = joined {
            slots[slot] = Some(outcome);
        }
    }

    // A panicked probe task still owes the endpoint an outcome.
    let mut outcomes: Vec<ProbeOutcome> = slots
        .into_iter()
        .enumerate()
        .map(|(slot, outcome)| {
            outcome.unwrap_or_else(|| {
                let spec = &probe_set[slot];
                ProbeOutcome::fail(spec.name, spec.weight, "probe task aborted")
            })
        })
        .collect();

    // Completion order is nondeterministic; reports want a stable order.
    outcomes.sort_by(|a, b| a.probe_name.cmp(&b.probe_name));

    let mut result = EndpointResult::new(&endpoint.url);
    result.score = scorer::score(&outcomes);
    result.outcomes = outcomes;

    info!(
        "[Orchestrator] {} scored {} ({})",
        result.url,
        result.score,
        scorer::risk_assessment(result.score)
    );
    result
}

fn aborted_result(endpoint: &Endpoint, probe_set: &[ProbeSpec]) -> EndpointResult {
    let mut result = EndpointResult::new(&endpoint.url);
    result.outcomes = probe_set
        .iter()
        .map(|spec| ProbeOutcome::fail(spec.name, spec.weight, "endpoint task aborted"))
        .collect();
    result.score = scorer::score(&result.outcomes);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Credentials, PayloadSet};

    fn config_with(endpoints: Vec<Endpoint>) -> ScanConfig {
        ScanConfig::new(endpoints, Credentials::basic("admin", "password"))
    }

    #[tokio::test]
    async fn empty_endpoint_list_fails_fast() {
        let orchestrator = ProbeOrchestrator::new().unwrap();
        let config = config_with(vec![]);
        let err = orchestrator.execute_scan(&config).await.unwrap_err();
        assert!(err.to_string().contains("endpoint list is empty"));
    }

    #[tokio::test]
    async fn empty_payload_list_fails_fast() {
        let orchestrator = ProbeOrchestrator::new().unwrap();
        let mut config = config_with(vec![Endpoint::new("http://t.example/api", "GET")]);
        config.payloads = PayloadSet {
            sql: vec![],
            xss: vec!["<script>alert(1)</script>".to_string()],
            nosql: vec![],
        };
        let err = orchestrator.execute_scan(&config).await.unwrap_err();
        assert!(err.to_string().contains("payload lists"));
    }

    #[test]
    fn validation_requires_nosql_payloads_only_when_enabled() {
        let mut config = config_with(vec![Endpoint::new("http://t.example/api", "GET")]);
        config.payloads.nosql = vec![];
        assert!(validate(&config).is_ok());

        config.include_nosql = true;
        assert!(validate(&config).is_err());
    }
}
