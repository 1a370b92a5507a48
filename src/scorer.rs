// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Endpoint Scorer
 * Deterministic weight reduction over probe outcomes
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use crate::types::{ProbeOutcome, BASE_SCORE};

/// Start at the base score and subtract each failed probe's weight once.
/// The scorer never inspects why a probe failed, only that it did, and
/// the result is deliberately unclamped: heavily vulnerable endpoints go
/// negative and stay comparable.
pub fn score(outcomes: &[ProbeOutcome]) -> i32 {
    let penalty: i32 = outcomes
        .iter()
        .filter(|o| !o.passed)
        .map(|o| o.weight)
        .sum();
    BASE_SCORE - penalty
}

/// Human-readable banding for reports. Negative scores are not a special
/// case, they are simply deep in the high-risk band.
pub fn risk_assessment(score: i32) -> &'static str {
    match score {
        s if s >= 90 => "Low risk",
        s if s >= 70 => "Moderate risk",
        s if s >= 40 => "High risk",
        _ => "Critical risk",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_passing_keeps_base_score() {
        let outcomes = vec![
            ProbeOutcome::pass("Auth", 30, "ok"),
            ProbeOutcome::pass("XSS", 40, "ok"),
        ];
        assert_eq!(score(&outcomes), 100);
    }

    #[test]
    fn failed_weights_subtract_exactly_once() {
        let outcomes = vec![
            ProbeOutcome::fail("Auth", 30, "rejected"),
            ProbeOutcome::pass("HTTP-Method", 20, "ok"),
            ProbeOutcome::fail("SQL-Injection", 50, "detected"),
        ];
        assert_eq!(score(&outcomes), 20);
    }

    #[test]
    fn score_goes_negative_without_clamping() {
        let outcomes = vec![
            ProbeOutcome::fail("Auth", 30, "x"),
            ProbeOutcome::fail("HTTP-Method", 20, "x"),
            ProbeOutcome::fail("SQL-Injection", 50, "x"),
            ProbeOutcome::fail("XSS", 40, "x"),
            ProbeOutcome::fail("Header-Security", 25, "x"),
            ProbeOutcome::fail("Auth-Bypass", 35, "x"),
            ProbeOutcome::fail("Parameter-Tampering", 30, "x"),
        ];
        assert_eq!(score(&outcomes), -130);
        assert_eq!(risk_assessment(-130), "Critical risk");
    }

    #[test]
    fn risk_bands() {
        assert_eq!(risk_assessment(100), "Low risk");
        assert_eq!(risk_assessment(75), "Moderate risk");
        assert_eq!(risk_assessment(45), "High risk");
        assert_eq!(risk_assessment(0), "Critical risk");
    }
}
