// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Auth Probe
 * Verifies that the configured credentials are accepted
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use crate::errors::{ProbeError, ProbeResult};
use crate::probes::ProbeContext;
use crate::types::Endpoint;

/// The endpoint must accept the run's credentials. A 401 or 403 with
/// valid credentials is a hard failure; any other non-success status is
/// inconclusive rather than an auth finding.
pub async fn run(ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeResult {
    let response = ctx.send(ctx.authenticated_request(endpoint)).await?;

    if response.is_success() {
        return Ok(());
    }

    match response.status_code {
        401 | 403 => Err(ProbeError::AuthFailure(format!(
            "valid credentials rejected with status {}",
            response.status_code
        ))),
        status => Err(ProbeError::Inconclusive(format!(
            "unexpected status {} for authenticated request",
            status
        ))),
    }
}
