//! Stripe webhook signature verification.
//!
//! Implements secure verification of Stripe webhook signatures using HMAC-SHA256.
//! Includes timestamp validation to prevent replay attacks.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};

use crate::config::{PaymentConfig, WebhookConfig};

use super::errors::WebhookError;
use super::event::WebhookEvent;

type HmacSha256 = Hmac<Sha256>;

/// Default maximum age for webhook events (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Default allowed clock skew for future events (1 minute).
pub const DEFAULT_MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
///
/// Signature values are kept as received; a `v1` that is not valid hex
/// simply never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// The `t=` value exactly as sent. This is what the sender signed.
    pub signed_timestamp: String,
    /// v1 signatures (HMAC-SHA256). More than one appears during secret rotation.
    pub v1_signatures: Vec<String>,
    /// Optional v0 legacy signature. Never trusted.
    pub v0_signature: Option<String>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    ///
    /// Empty segments, segments without `=` and unknown keys are skipped.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedSignature` if there is no usable
    /// timestamp or no `v1` entry.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<(i64, String)> = None;
        let mut v1_signatures: Vec<String> = Vec::new();
        let mut v0_signature: Option<String> = None;

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "t" => {
                    let parsed = value.parse().map_err(|_| malformed("invalid timestamp"))?;
                    timestamp = Some((parsed, value.to_string()));
                }
                "v1" => v1_signatures.push(value.to_string()),
                "v0" => v0_signature = Some(value.to_string()),
                _ => {}
            }
        }

        let (timestamp, signed_timestamp) =
            timestamp.ok_or_else(|| malformed("missing timestamp"))?;
        if v1_signatures.is_empty() {
            return Err(malformed("missing v1 signature"));
        }

        Ok(SignatureHeader {
            timestamp,
            signed_timestamp,
            v1_signatures,
            v0_signature,
        })
    }
}

fn malformed(reason: &str) -> WebhookError {
    WebhookError::MalformedSignature(reason.to_string())
}

/// Everything the verifier needs, resolved from configuration at startup.
#[derive(Debug, Clone)]
pub struct WebhookVerifierConfig {
    pub secret: SecretString,
    pub tolerance_secs: i64,
    pub max_clock_skew_secs: i64,
}

impl WebhookVerifierConfig {
    pub fn new(payment: &PaymentConfig, webhook: &WebhookConfig) -> Self {
        Self {
            secret: payment.stripe_webhook_secret.clone(),
            tolerance_secs: webhook.tolerance_secs,
            max_clock_skew_secs: webhook.max_clock_skew_secs,
        }
    }
}

/// Verifier for Stripe webhook signatures.
///
/// Built once at startup from configuration; holds the secret for the
/// lifetime of the process.
pub struct WebhookVerifier {
    /// The webhook signing secret from the Stripe dashboard.
    secret: SecretString,
    /// Maximum accepted event age in seconds.
    tolerance_secs: i64,
    /// Maximum accepted distance into the future in seconds.
    max_clock_skew_secs: i64,
}

impl WebhookVerifier {
    /// Creates a verifier with the default 5 minute tolerance.
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            max_clock_skew_secs: DEFAULT_MAX_CLOCK_SKEW_SECS,
        }
    }

    /// Creates a verifier from resolved configuration.
    pub fn from_config(config: WebhookVerifierConfig) -> Self {
        Self::new(config.secret)
            .with_tolerance_secs(config.tolerance_secs)
            .with_max_clock_skew_secs(config.max_clock_skew_secs)
    }

    /// Override the replay tolerance window.
    pub fn with_tolerance_secs(mut self, secs: i64) -> Self {
        self.tolerance_secs = secs;
        self
    }

    /// Override the future clock skew allowance.
    pub fn with_max_clock_skew_secs(mut self, secs: i64) -> Self {
        self.max_clock_skew_secs = secs;
        self
    }

    /// The configured tolerance window in seconds.
    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs
    }

    /// Verifies the webhook signature against the current time and decodes the event.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - No header supplied
    /// - `MalformedSignature` - Header could not be parsed
    /// - `SignatureMismatch` - No v1 signature matched
    /// - `TimestampOutOfRange` - Event is older than the tolerance window
    /// - `TimestampInFuture` - Event timestamp is beyond the clock skew allowance
    /// - `MalformedEvent` - Signature valid but payload is not an event
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookEvent, WebhookError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) with an explicit "now" in Unix seconds.
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        now: i64,
    ) -> Result<WebhookEvent, WebhookError> {
        let header = signature_header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let header = SignatureHeader::parse(header)?;

        let expected = self.compute_signature(&header.signed_timestamp, payload)?;
        if !matches_any(&expected, &header.v1_signatures) {
            return Err(WebhookError::SignatureMismatch);
        }

        self.validate_timestamp(header.timestamp, now)?;

        serde_json::from_slice(payload).map_err(|e| WebhookError::MalformedEvent(e.to_string()))
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let age = now.saturating_sub(timestamp);

        if age > self.tolerance_secs {
            return Err(WebhookError::TimestampOutOfRange { age_secs: age });
        }

        if age < -self.max_clock_skew_secs {
            return Err(WebhookError::TimestampInFuture {
                ahead_secs: age.saturating_neg(),
            });
        }

        Ok(())
    }

    /// HMAC-SHA256 over `timestamp || "." || payload`, using the header's
    /// timestamp text and the raw payload bytes.
    fn compute_signature(&self, timestamp: &str, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::SignatureMismatch)?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Constant-time comparison against every candidate; no early exit on a match.
/// Candidates that are not hex never match.
fn matches_any(expected: &[u8], candidates: &[String]) -> bool {
    candidates
        .iter()
        .filter_map(|candidate| hex::decode(candidate).ok())
        .fold(Choice::from(0), |acc, candidate| {
            acc | expected.ct_eq(candidate.as_slice())
        })
        .into()
}

/// Produces a `Stripe-Signature` header value for `payload` signed at `timestamp`.
///
/// Mirrors what Stripe sends; used by tests and local tooling that replays events.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return format!("t={}", timestamp),
    };
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    )
}
