// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Error Taxonomy
 * Closed verdict type for probe failures, with thiserror
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use thiserror::Error;

/// Which injection family a detection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionKind {
    Sql,
    NoSql,
}

impl std::fmt::Display for InjectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectionKind::Sql => write!(f, "SQL"),
            InjectionKind::NoSql => write!(f, "NoSQL"),
        }
    }
}

/// Typed probe failure. Every variant maps one-to-one to a finding class,
/// so callers can match exhaustively instead of inspecting tag strings.
///
/// `Inconclusive` covers everything that prevented the probe from reaching
/// a verdict: transport failures, cancelled runs, and baselines the probe
/// could not evaluate against (e.g. an unauthorized baseline for the
/// injection probes). It still fails the probe and is never dropped.
#[derive(Error, Debug, Clone)]
pub enum ProbeError {
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("{kind} injection detected with payload {payload:?}: {evidence}")]
    InjectionDetected {
        kind: InjectionKind,
        payload: String,
        evidence: String,
    },

    #[error("reflected XSS detected with payload {payload:?}: {evidence}")]
    XssDetected { payload: String, evidence: String },

    #[error("header security issues: {0}")]
    HeaderSecurity(String),

    #[error("authentication bypass via {variant}: {detail}")]
    AuthBypassDetected { variant: String, detail: String },

    #[error("parameter tampering (IDOR): {0}")]
    ParameterTampering(String),

    #[error("probe inconclusive: {0}")]
    Inconclusive(String),
}

impl ProbeError {
    /// True when the probe never reached a verdict, as opposed to a
    /// confirmed finding.
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, ProbeError::Inconclusive(_))
    }
}

/// Run-level errors. Probe failures never surface here; the only way a
/// scan aborts is a configuration that violates the caller contract.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for one probe execution: `Ok(())` is a pass.
pub type ProbeResult = Result<(), ProbeError>;
