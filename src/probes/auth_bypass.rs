// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Auth Bypass Probe
 * Missing, wrong, and header-spoofed credential variants
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use tracing::debug;

use crate::errors::{ProbeError, ProbeResult};
use crate::http_client::ProbeRequest;
use crate::probes::ProbeContext;
use crate::types::Endpoint;

/// Headers some gateways and reverse proxies trust for access decisions.
const SPOOFABLE_HEADERS: &[(&str, SpoofValue)] = &[
    ("X-Forwarded-For", SpoofValue::Loopback),
    ("X-Original-URL", SpoofValue::OriginalUrl),
    ("X-Rewrite-URL", SpoofValue::OriginalUrl),
    ("X-Originating-IP", SpoofValue::Loopback),
];

#[derive(Clone, Copy)]
enum SpoofValue {
    Loopback,
    OriginalUrl,
}

/// Three variants, all of which must be rejected: no credentials, wrong
/// credentials, and no credentials with spoofable trust headers. The
/// first variant the endpoint accepts short-circuits the probe.
pub async fn run(ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeResult {
    let base = || {
        let mut request = ProbeRequest::new(&endpoint.method, &endpoint.url);
        if !endpoint.body_template.is_empty() {
            request = request.with_body(endpoint.body_template.clone());
        }
        request
    };

    // (a) no credentials at all
    let response = ctx.send(base()).await?;
    if response.is_success() {
        return Err(ProbeError::AuthBypassDetected {
            variant: "missing credentials".to_string(),
            detail: format!("unauthenticated request returned {}", response.status_code),
        });
    }

    // (b) deliberately wrong credentials
    let response = ctx
        .send(base().with_basic_auth("invalid", "invalid-password-zz"))
        .await?;
    if response.is_success() {
        return Err(ProbeError::AuthBypassDetected {
            variant: "wrong credentials".to_string(),
            detail: format!("bogus basic auth returned {}", response.status_code),
        });
    }

    // (c) no credentials, spoofable trust headers attached
    let mut spoofed = base();
    for (name, value) in SPOOFABLE_HEADERS {
        let value = match value {
            SpoofValue::Loopback => "127.0.0.1",
            SpoofValue::OriginalUrl => endpoint.url.as_str(),
        };
        spoofed = spoofed.with_header(name, value);
    }
    let response = ctx.send(spoofed).await?;
    if response.is_success() {
        return Err(ProbeError::AuthBypassDetected {
            variant: "spoofed headers (X-Forwarded-For / X-Original-URL / X-Rewrite-URL / X-Originating-IP)"
                .to_string(),
            detail: format!("header-spoofed request returned {}", response.status_code),
        });
    }

    debug!("[AuthBypass] All bypass variants rejected on {}", endpoint.url);
    Ok(())
}
