// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Luotain Probe Engine
 * HTTP API endpoint security probing and risk scoring
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod admission;
pub mod errors;
pub mod http_client;
pub mod payloads;
pub mod scorer;
pub mod types;

// Probe implementations and catalogue
pub mod probes;

// Scan driver
pub mod orchestrator;

pub use errors::{ProbeError, ScanError};
pub use orchestrator::ProbeOrchestrator;
pub use types::{Credentials, Endpoint, EndpointResult, ProbeOutcome, ScanConfig};
