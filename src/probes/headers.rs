// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Header Security Probe
 * Response header hygiene: hardening, disclosure, CORS, cookie flags
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use crate::errors::{ProbeError, ProbeResult};
use crate::http_client::HttpResponse;
use crate::probes::ProbeContext;
use crate::types::Endpoint;

/// Hardening headers every API response should carry.
const RECOMMENDED_HEADERS: &[&str] = &[
    "Strict-Transport-Security",
    "Content-Security-Policy",
    "X-Content-Type-Options",
    "X-Frame-Options",
    "X-XSS-Protection",
];

/// Headers that leak implementation details to an attacker.
const DISCLOSURE_HEADERS: &[&str] = &["Server", "X-Powered-By"];

/// One authenticated exchange; every issue found is collected and joined
/// into a single failure message rather than reported piecemeal.
pub async fn run(ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeResult {
    let response = ctx.send(ctx.authenticated_request(endpoint)).await?;

    let issues = collect_issues(&response);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ProbeError::HeaderSecurity(issues.join("; ")))
    }
}

fn collect_issues(response: &HttpResponse) -> Vec<String> {
    let mut issues = Vec::new();

    for name in RECOMMENDED_HEADERS {
        if response.header(name).is_none() {
            issues.push(format!("missing {}", name));
        }
    }

    for name in DISCLOSURE_HEADERS {
        if let Some(value) = response.header(name) {
            issues.push(format!("information disclosure: {}: {}", name, value));
        }
    }

    if let Some(origin) = response.header("Access-Control-Allow-Origin") {
        if origin.trim() == "*" {
            issues.push("Access-Control-Allow-Origin allows any origin".to_string());
        }
    }

    for cookie in &response.set_cookie {
        let lower = cookie.to_lowercase();
        let name = cookie.split('=').next().unwrap_or("cookie");
        for flag in ["secure", "httponly", "samesite"] {
            if !lower.contains(flag) {
                issues.push(format!("cookie {} missing {} flag", name, flag));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response_with(headers: &[(&str, &str)], cookies: &[&str]) -> HttpResponse {
        HttpResponse {
            status_code: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
            set_cookie: cookies.iter().map(|c| c.to_string()).collect(),
            body: String::new(),
        }
    }

    fn hardened() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Strict-Transport-Security", "max-age=63072000"),
            ("Content-Security-Policy", "default-src 'self'"),
            ("X-Content-Type-Options", "nosniff"),
            ("X-Frame-Options", "DENY"),
            ("X-XSS-Protection", "1; mode=block"),
        ]
    }

    #[test]
    fn fully_hardened_response_passes() {
        let headers = hardened();
        let response = response_with(&headers, &["sid=1; Secure; HttpOnly; SameSite=Strict"]);
        assert!(collect_issues(&response).is_empty());
    }

    #[test]
    fn all_issue_classes_are_collected_together() {
        let response = response_with(
            &[("Server", "nginx"), ("Access-Control-Allow-Origin", "*")],
            &[],
        );
        let issues = collect_issues(&response);
        assert_eq!(issues.iter().filter(|i| i.starts_with("missing")).count(), 5);
        assert!(issues.iter().any(|i| i.contains("Server: nginx")));
        assert!(issues.iter().any(|i| i.contains("any origin")));
    }

    #[test]
    fn lax_cookie_is_flagged_per_missing_attribute() {
        let headers = hardened();
        let response = response_with(&headers, &["sid=abc; Path=/"]);
        let issues = collect_issues(&response);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.contains("cookie sid")));
    }
}
