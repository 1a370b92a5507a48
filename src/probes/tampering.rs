// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Parameter Tampering Probe
 * Body mutation reconnaissance and decisive path-identifier swap (IDOR)
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use crate::errors::{ProbeError, ProbeResult};
use crate::http_client::ProbeRequest;
use crate::probes::ProbeContext;
use crate::types::Endpoint;

static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Two informational mutations (numeric body swap, unexpected extra field)
/// that are logged but never fail the probe on their own, then the
/// decisive check: swapping a digit in the path must not yield another
/// object. A 2xx on the swapped path confirms an insecure direct object
/// reference.
pub async fn run(ctx: &ProbeContext, endpoint: &Endpoint) -> ProbeResult {
    // (a) numeric literal swap in the body, reconnaissance only
    if let Some(mutated) = swap_numeric_literal(&endpoint.body_template) {
        let request = ctx
            .attach_credentials(ProbeRequest::new(&endpoint.method, &endpoint.url).with_body(mutated))
            .with_headers(ctx.custom_headers.iter());
        let response = ctx.send(request).await?;
        info!(
            "[Tampering] Numeric body mutation on {} returned {}",
            endpoint.url, response.status_code
        );
    }

    // (b) unexpected extra field, reconnaissance only
    if let Some(padded) = append_extra_field(&endpoint.body_template) {
        let request = ctx
            .attach_credentials(ProbeRequest::new(&endpoint.method, &endpoint.url).with_body(padded))
            .with_headers(ctx.custom_headers.iter());
        let response = ctx.send(request).await?;
        info!(
            "[Tampering] Extra-field mutation on {} returned {}",
            endpoint.url, response.status_code
        );
    }

    // (c) decisive: neighbouring path identifier must not be served
    let Some(swapped_url) = swap_path_digit(&endpoint.url) else {
        debug!("[Tampering] No path identifier to swap on {}", endpoint.url);
        return Ok(());
    };

    let request = ctx
        .attach_credentials(ProbeRequest::new(&endpoint.method, &swapped_url))
        .with_headers(ctx.custom_headers.iter());
    let response = ctx.send(request).await?;

    if response.is_success() {
        return Err(ProbeError::ParameterTampering(format!(
            "swapped object path {} returned {}",
            swapped_url, response.status_code
        )));
    }

    Ok(())
}

/// Replace the first numeric literal in the body with a different one.
fn swap_numeric_literal(body: &str) -> Option<String> {
    let m = NUMERIC_LITERAL.find(body)?;
    let replacement = if m.as_str() == "999999" { "888888" } else { "999999" };
    let mut mutated = String::with_capacity(body.len() + replacement.len());
    mutated.push_str(&body[..m.start()]);
    mutated.push_str(replacement);
    mutated.push_str(&body[m.end()..]);
    Some(mutated)
}

/// Splice an unexpected field into a JSON object body.
fn append_extra_field(body: &str) -> Option<String> {
    let trimmed = body.trim_end();
    if !trimmed.ends_with('}') {
        return None;
    }
    let insert_at = trimmed.rfind('}')?;
    let separator = if trimmed[..insert_at].trim_end().ends_with('{') {
        ""
    } else {
        ","
    };
    Some(format!(
        "{}{}\"unexpectedField\":\"tamper-check\"{}",
        &trimmed[..insert_at],
        separator,
        &trimmed[insert_at..]
    ))
}

/// Replace the last digit in the URL path with a different digit. Query
/// and fragment are untouched.
fn swap_path_digit(raw_url: &str) -> Option<String> {
    let url = Url::parse(raw_url).ok()?;
    let path = url.path();

    let (index, digit) = path
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_ascii_digit())?;
    let replacement = if digit == '9' { '0' } else { (digit as u8 + 1) as char };

    let mut new_path = String::with_capacity(path.len());
    new_path.push_str(&path[..index]);
    new_path.push(replacement);
    new_path.push_str(&path[index + 1..]);

    let mut swapped = url.clone();
    swapped.set_path(&new_path);
    Some(swapped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_last_path_digit() {
        let swapped = swap_path_digit("http://t.example/items/1").unwrap();
        assert_eq!(swapped, "http://t.example/items/2");
    }

    #[test]
    fn nine_wraps_to_zero() {
        let swapped = swap_path_digit("http://t.example/items/9").unwrap();
        assert_eq!(swapped, "http://t.example/items/0");
    }

    #[test]
    fn digitless_path_is_skipped() {
        assert!(swap_path_digit("http://t.example/items/latest").is_none());
    }

    #[test]
    fn query_digits_are_not_path_identifiers() {
        assert!(swap_path_digit("http://t.example/items?page=2").is_none());
    }

    #[test]
    fn numeric_literal_swap_changes_value() {
        let mutated = swap_numeric_literal(r#"{"id":42,"name":"x"}"#).unwrap();
        assert_eq!(mutated, r#"{"id":999999,"name":"x"}"#);
        assert!(swap_numeric_literal(r#"{"name":"x"}"#).is_none());
    }

    #[test]
    fn extra_field_is_spliced_into_json_objects() {
        let padded = append_extra_field(r#"{"id":1}"#).unwrap();
        assert_eq!(padded, r#"{"id":1,"unexpectedField":"tamper-check"}"#);
        let empty = append_extra_field("{}").unwrap();
        assert_eq!(empty, r#"{"unexpectedField":"tamper-check"}"#);
        assert!(append_extra_field("plain text").is_none());
    }
}
