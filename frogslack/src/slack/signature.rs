//! Slack request signature verification.
//!
//! Slack signs every request using HMAC-SHA256 over `v0:<timestamp>:<body>`.
//! Reference: https://api.slack.com/authentication/verifying-requests-from-slack

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::VerificationError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

const VERSION: &str = "v0";

/// Verify the signature headers of an inbound Slack request.
///
/// `body` must be the exact bytes received, before any form decoding.
/// A `max_age_seconds` of 0 disables the timestamp freshness check.
pub fn verify_request(
    signing_secret: Option<&str>,
    headers: &HeaderMap,
    body: &[u8],
    max_age_seconds: u64,
) -> Result<(), VerificationError> {
    let timestamp = header_value(headers, TIMESTAMP_HEADER);
    let signature = header_value(headers, SIGNATURE_HEADER);
    let secret = signing_secret.unwrap_or_default();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let result = match (timestamp, signature) {
        (Some(ts), Some(sig)) => {
            verify_slack_signature_at(secret, ts, sig, body, max_age_seconds, now)
        }
        (None, _) => Err(VerificationError::MissingHeader(TIMESTAMP_HEADER)),
        (_, None) => Err(VerificationError::MissingHeader(SIGNATURE_HEADER)),
    };

    if let Err(e) = &result {
        warn!(
            error = %e,
            timestamp = timestamp.unwrap_or_default(),
            signature_length = signature.map(str::len).unwrap_or(0),
            body_length = body.len(),
            has_signing_secret = !secret.is_empty(),
            "slack_signature_rejected"
        );
    }

    result
}

/// Verify a Slack signature against an explicit clock reading.
pub fn verify_slack_signature_at(
    signing_secret: &str,
    timestamp: &str,
    signature: &str,
    body: &[u8],
    max_age_seconds: u64,
    now: u64,
) -> Result<(), VerificationError> {
    if signing_secret.is_empty() {
        return Err(VerificationError::MissingSecret);
    }

    let request_time: u64 = timestamp
        .parse()
        .map_err(|_| VerificationError::InvalidTimestamp(timestamp.to_string()))?;

    if max_age_seconds > 0 {
        let age_seconds = now.abs_diff(request_time);
        if age_seconds > max_age_seconds {
            return Err(VerificationError::StaleTimestamp {
                age_seconds,
                max_age_seconds,
            });
        }
    }

    if !signature.starts_with("v0=") {
        return Err(VerificationError::MalformedSignature);
    }

    let expected = compute_signature(signing_secret, timestamp, body)?;

    // Byte-for-byte on the lowercase hex form, in constant time
    if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
        Ok(())
    } else {
        Err(VerificationError::Mismatch)
    }
}

/// Compute the `v0=<hex>` signature Slack would send for this request.
pub fn compute_signature(
    signing_secret: &str,
    timestamp: &str,
    body: &[u8],
) -> Result<String, VerificationError> {
    let mac = signing_mac(signing_secret, timestamp, body)?;
    Ok(format!("{}={}", VERSION, hex::encode(mac.finalize().into_bytes())))
}

fn signing_mac(
    signing_secret: &str,
    timestamp: &str,
    body: &[u8],
) -> Result<HmacSha256, VerificationError> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|_| VerificationError::MissingSecret)?;

    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);

    Ok(mac)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "e6b19c573432dcc6b075501d51b51bb8";
    const BODY: &[u8] = b"token=barf&team_id=T0001&command=%2Ffrog";
    const NOW: u64 = 1_700_000_000;

    fn timestamp() -> String {
        NOW.to_string()
    }

    fn signed() -> String {
        compute_signature(SECRET, &timestamp(), BODY).unwrap()
    }

    #[test]
    fn test_compute_signature_known_vector() {
        // Example request from Slack's signing documentation.
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        let signature =
            compute_signature("8f742231b10e8888abcd99yyyzzz85a5", "1531420618", body).unwrap();
        assert_eq!(
            signature,
            "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503"
        );
    }

    #[test]
    fn test_verify_valid() {
        assert!(verify_slack_signature_at(SECRET, &timestamp(), &signed(), BODY, 300, NOW).is_ok());
    }

    #[test]
    fn test_verify_body_mutation() {
        let signature = signed();
        for i in 0..BODY.len() {
            let mut body = BODY.to_vec();
            body[i] ^= 0x01;
            let result = verify_slack_signature_at(SECRET, &timestamp(), &signature, &body, 300, NOW);
            assert!(
                matches!(result, Err(VerificationError::Mismatch)),
                "mutated byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_verify_signature_mutation() {
        let signature = signed();
        // Skip the "v0=" prefix; flipping those bytes is covered by the malformed case.
        for i in 3..signature.len() {
            let original = signature.as_bytes()[i];
            let swapped = if original == b'0' { b'1' } else { b'0' };
            let case_flipped = if original.is_ascii_lowercase() {
                original.to_ascii_uppercase()
            } else {
                original.to_ascii_lowercase()
            };

            for replacement in [swapped, case_flipped] {
                if replacement == original {
                    continue;
                }
                let mut bytes = signature.clone().into_bytes();
                bytes[i] = replacement;
                let mutated = String::from_utf8(bytes).unwrap();
                assert!(
                    verify_slack_signature_at(SECRET, &timestamp(), &mutated, BODY, 300, NOW).is_err(),
                    "mutated signature {:?} was accepted",
                    mutated
                );
            }
        }
    }

    #[test]
    fn test_verify_uppercase_digest_rejected() {
        let signature = signed();
        let upper = format!("v0={}", signature[3..].to_ascii_uppercase());
        assert_ne!(upper, signature);
        assert!(matches!(
            verify_slack_signature_at(SECRET, &timestamp(), &upper, BODY, 300, NOW),
            Err(VerificationError::Mismatch)
        ));
    }

    #[test]
    fn test_verify_trailing_bytes_rejected() {
        let extended = format!("{}00", signed());
        assert!(matches!(
            verify_slack_signature_at(SECRET, &timestamp(), &extended, BODY, 300, NOW),
            Err(VerificationError::Mismatch)
        ));
    }

    #[test]
    fn test_verify_secret_mutation() {
        let signature = signed();
        let mut secret = SECRET.to_string().into_bytes();
        secret[0] = b'f';
        let secret = String::from_utf8(secret).unwrap();
        assert!(matches!(
            verify_slack_signature_at(&secret, &timestamp(), &signature, BODY, 300, NOW),
            Err(VerificationError::Mismatch)
        ));
    }

    #[test]
    fn test_verify_timestamp_mutation() {
        let signature = signed();
        let shifted = (NOW + 1).to_string();
        assert!(matches!(
            verify_slack_signature_at(SECRET, &shifted, &signature, BODY, 300, NOW),
            Err(VerificationError::Mismatch)
        ));
    }

    #[test]
    fn test_verify_missing_secret() {
        assert!(matches!(
            verify_slack_signature_at("", &timestamp(), &signed(), BODY, 300, NOW),
            Err(VerificationError::MissingSecret)
        ));
    }

    #[test]
    fn test_verify_invalid_timestamp() {
        assert!(matches!(
            verify_slack_signature_at(SECRET, "not-a-number", &signed(), BODY, 300, NOW),
            Err(VerificationError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_verify_malformed_signature() {
        let ts = timestamp();
        for bad in ["", "v1=abcd", "abcdef", "V0=abcd"] {
            assert!(
                matches!(
                    verify_slack_signature_at(SECRET, &ts, bad, BODY, 300, NOW),
                    Err(VerificationError::MalformedSignature)
                ),
                "{:?} was not reported as malformed",
                bad
            );
        }
        for wrong in ["v0=", "v0=zz"] {
            assert!(matches!(
                verify_slack_signature_at(SECRET, &ts, wrong, BODY, 300, NOW),
                Err(VerificationError::Mismatch)
            ));
        }
    }

    #[test]
    fn test_verify_stale() {
        let old = (NOW - 301).to_string();
        let signature = compute_signature(SECRET, &old, BODY).unwrap();
        assert!(matches!(
            verify_slack_signature_at(SECRET, &old, &signature, BODY, 300, NOW),
            Err(VerificationError::StaleTimestamp { age_seconds: 301, .. })
        ));

        // Future timestamps are held to the same window.
        let future = (NOW + 301).to_string();
        let signature = compute_signature(SECRET, &future, BODY).unwrap();
        assert!(verify_slack_signature_at(SECRET, &future, &signature, BODY, 300, NOW).is_err());
    }

    #[test]
    fn test_verify_freshness_disabled() {
        // Year 2000
        let old = "946684800";
        let signature = compute_signature(SECRET, old, BODY).unwrap();
        assert!(verify_slack_signature_at(SECRET, old, &signature, BODY, 0, NOW).is_ok());
    }

    #[test]
    fn test_verify_request_headers() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .to_string();
        let signature = compute_signature(SECRET, &now, BODY).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, now.parse().unwrap());
        headers.insert(SIGNATURE_HEADER, signature.parse().unwrap());

        assert!(verify_request(Some(SECRET), &headers, BODY, 300).is_ok());
        assert!(matches!(
            verify_request(None, &headers, BODY, 300),
            Err(VerificationError::MissingSecret)
        ));

        headers.remove(SIGNATURE_HEADER);
        assert!(matches!(
            verify_request(Some(SECRET), &headers, BODY, 300),
            Err(VerificationError::MissingHeader(SIGNATURE_HEADER))
        ));
    }
}
