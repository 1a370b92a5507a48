// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - HTTP Method Probe
 * Checks that the endpoint serves its declared method
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use crate::errors::{ProbeError, ProbeResult};
use crate::probes::ProbeContext;
use crate::types::Endpoint;

/// The endpoint's declared method must actually be served. A 404 or 405
/// means the method/path pair does not exist as advertised; any other
/// non-success status leaves the probe without a verdict.
pub async fn run(ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeResult {
    let response = ctx.send(ctx.authenticated_request(endpoint)).await?;

    if response.is_success() {
        return Ok(());
    }

    match response.status_code {
        404 | 405 => Err(ProbeError::MethodNotAllowed(format!(
            "{} {} returned {}",
            endpoint.method, endpoint.url, response.status_code
        ))),
        status => Err(ProbeError::Inconclusive(format!(
            "unexpected status {} for {} {}",
            status, endpoint.method, endpoint.url
        ))),
    }
}
