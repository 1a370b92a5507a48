// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Reflected XSS Probe
 * Detects unescaped payload reflection in executable contexts
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use tracing::debug;

use crate::errors::{ProbeError, ProbeResult};
use crate::http_client::ProbeRequest;
use crate::probes::ProbeContext;
use crate::types::Endpoint;

/// One baseline exchange, then one per XSS payload substituted into the
/// body template. A detection requires the payload verbatim in the probe
/// response, absent from the baseline, and sitting in an executable
/// context; HTML-escaped reflection passes.
pub async fn run(ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeResult {
    let baseline = ctx.send(ctx.authenticated_request(endpoint)).await?;

    for payload in ctx.payloads.xss.iter() {
        let request = ctx
            .attach_credentials(
                ProbeRequest::new(&endpoint.method, &endpoint.url)
                    .with_body(endpoint.render_body(payload)),
            )
            .with_headers(ctx.custom_headers.iter());

        let response = ctx.send(request).await?;

        if !response.body.contains(payload.as_str()) || baseline.body.contains(payload.as_str()) {
            debug!("[XSS] Payload not newly reflected on {}: {}", endpoint.url, payload);
            continue;
        }

        if let Some(context) = executable_context(&response.body, payload) {
            return Err(ProbeError::XssDetected {
                payload: payload.clone(),
                evidence: format!("reflected unescaped in {} context", context),
            });
        }
    }

    Ok(())
}

/// The reflection only counts when it can execute: inside a script block,
/// behind an event handler, or placed directly in the tag stream.
fn executable_context(body: &str, payload: &str) -> Option<&'static str> {
    if body.contains(&format!("<script>{}</script>", payload)) {
        return Some("script block");
    }
    for handler in ["onload=", "onerror=", "onclick="] {
        for quote in ["\"", "'", ""] {
            if body.contains(&format!("{}{}{}", handler, quote, payload)) {
                return Some("event handler");
            }
        }
    }
    if body.contains(&format!("<{}>", payload)) || body.contains(&format!(">{}<", payload)) {
        return Some("tag");
    }
    None
}
