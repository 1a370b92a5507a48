// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Injection Probes
 * SQL and NoSQL injection detection via baseline differencing
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::errors::{InjectionKind, ProbeError, ProbeResult};
use crate::http_client::HttpResponse;
use crate::probes::ProbeContext;
use crate::types::Endpoint;

/// Database error signatures. A match in a payload response is a detection
/// on its own, with no baseline comparison needed.
static SQL_ERROR_SIGNATURES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)SQL syntax",
        r"(?i)syntax error.*(?:SQL|query)",
        r"(?i)unclosed quotation mark",
        r"(?i)quoted string not properly terminated",
        r"ORA-\d{5}",
        r"(?i)warning.*mysql_",
        r"(?i)warning.*\Wpg_",
        r"(?i)PostgreSQL.*ERROR",
        r"(?i)SQLite.*(?:error|exception)",
        r"\[SQLITE_ERROR\]",
        r"(?i)ODBC.*SQL Server",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static NOSQL_ERROR_SIGNATURES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"MongoError",
        r"MongoServerError",
        r"E11000 duplicate key",
        r"(?i)CastError.*ObjectId",
        r"BSONTypeError",
        r"(?i)\$where.*not allowed",
        r"(?i)unknown (?:top level )?operator:?\s*\$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub async fn run_sql(ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeResult {
    let payloads = ctx.payloads.sql.clone();
    run(ctx, endpoint, InjectionKind::Sql, &payloads).await
}

pub async fn run_nosql(ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeResult {
    let payloads = ctx.payloads.nosql.clone();
    run(ctx, endpoint, InjectionKind::NoSql, &payloads).await
}

/// Shared pattern for both injection families: one baseline exchange with
/// the template untouched, then one exchange per payload, stopping at the
/// first indicator match.
async fn run(
    ctx: &ProbeContext,
    endpoint: &Endpoint,
    kind: InjectionKind,
    payloads: &[String],
) -> ProbeResult {
    let baseline = ctx.send(ctx.authenticated_request(endpoint)).await?;

    // An unauthorized baseline gives the diff heuristics nothing to diff
    // against; the probe cannot reach a verdict.
    if matches!(baseline.status_code, 401 | 403) {
        return Err(ProbeError::Inconclusive(format!(
            "baseline request returned {}, cannot evaluate {} injection",
            baseline.status_code, kind
        )));
    }

    for payload in payloads {
        let request = ctx
            .attach_credentials(
                crate::http_client::ProbeRequest::new(&endpoint.method, &endpoint.url)
                    .with_body(endpoint.render_body(payload)),
            )
            .with_headers(ctx.custom_headers.iter());

        let response = ctx.send(request).await?;

        if let Some(evidence) = match_indicators(kind, payload, &baseline, &response) {
            return Err(ProbeError::InjectionDetected {
                kind,
                payload: payload.clone(),
                evidence,
            });
        }
        debug!("[{}Injection] Payload clean on {}: {}", kind, endpoint.url, payload);
    }

    Ok(())
}

/// Indicator heuristics shared by both families. Returns the evidence
/// string for the first indicator that fires.
fn match_indicators(
    kind: InjectionKind,
    payload: &str,
    baseline: &HttpResponse,
    response: &HttpResponse,
) -> Option<String> {
    let signatures = match kind {
        InjectionKind::Sql => &*SQL_ERROR_SIGNATURES,
        InjectionKind::NoSql => &*NOSQL_ERROR_SIGNATURES,
    };
    for signature in signatures.iter() {
        if let Some(m) = signature.find(&response.body) {
            return Some(format!("database error signature {:?} in response", m.as_str()));
        }
    }

    if length_diverges(baseline.body.len(), response.body.len()) {
        return Some(format!(
            "response length {} diverges more than 2x from baseline {}",
            response.body.len(),
            baseline.body.len()
        ));
    }

    let baseline_braces = brace_count(&baseline.body);
    let response_braces = brace_count(&response.body);
    if baseline_braces != response_braces {
        return Some(format!(
            "structural change: {} braces vs {} in baseline",
            response_braces, baseline_braces
        ));
    }

    if kind == InjectionKind::NoSql && response.body.contains(payload) {
        return Some("raw operator payload reflected unescaped".to_string());
    }

    None
}

/// More than 2x apart in either direction. Two empty bodies never diverge.
fn length_diverges(baseline: usize, response: usize) -> bool {
    if baseline == response {
        return false;
    }
    let (small, large) = if baseline < response {
        (baseline, response)
    } else {
        (response, baseline)
    };
    large > small.saturating_mul(2)
}

fn brace_count(body: &str) -> usize {
    body.chars().filter(|c| *c == '{' || *c == '}').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status_code: status,
            headers: HashMap::new(),
            set_cookie: vec![],
            body: body.to_string(),
        }
    }

    #[test]
    fn sql_error_signature_fires() {
        let baseline = response(200, "baseline");
        let hit = response(200, "You have an error in your SQL syntax");
        let evidence = match_indicators(InjectionKind::Sql, "' OR '1'='1", &baseline, &hit);
        assert!(evidence.unwrap().contains("signature"));
    }

    #[test]
    fn identical_shape_is_clean() {
        let baseline = response(200, r#"{"items":[1,2,3]}"#);
        let same = response(200, r#"{"items":[4,5,6]}"#);
        assert!(match_indicators(InjectionKind::Sql, "safe", &baseline, &same).is_none());
    }

    #[test]
    fn length_divergence_fires_in_both_directions() {
        assert!(length_diverges(10, 21));
        assert!(length_diverges(21, 10));
        assert!(!length_diverges(10, 20));
        assert!(!length_diverges(0, 0));
    }

    #[test]
    fn brace_difference_fires() {
        let baseline = response(200, r#"{"ok":true}"#);
        let broken = response(200, r#""ok":true"#);
        let evidence = match_indicators(InjectionKind::Sql, "'", &baseline, &broken);
        assert!(evidence.unwrap().contains("structural"));
    }

    #[test]
    fn nosql_reflection_fires_only_for_nosql() {
        let payload = r#"{"$gt": ""}"#;
        // Equal brace counts and comparable lengths so only the raw
        // reflection indicator can fire.
        let baseline = response(200, r#"{"result": {"id": "aa"}}"#);
        let reflected = response(200, r#"{"q": {"$gt": ""}, "b": 1}"#);
        assert_eq!(brace_count(&baseline.body), brace_count(&reflected.body));

        let nosql = match_indicators(InjectionKind::NoSql, payload, &baseline, &reflected);
        assert!(nosql.unwrap().contains("reflected"));

        let sql = match_indicators(InjectionKind::Sql, payload, &baseline, &reflected);
        assert!(sql.is_none());
    }
}
