//! Reputation-service response decoding
//!
//! The service responds with small XML documents. Every verdict response maps
//! to exactly one [`Verdict`] variant: a reported error message becomes
//! `AnalysisError`, a numeric code goes through the fixed mapping table, and
//! anything unparseable becomes `Unknown(None)`.

use filegate_core::Verdict;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct VerdictEnvelope {
    #[serde(rename = "get-verdict-info")]
    verdict_info: Option<VerdictInfo>,
    #[serde(rename = "error-message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerdictInfo {
    #[serde(default)]
    md5: Option<String>,
    #[serde(default)]
    sha256: Option<String>,
    verdict: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitEnvelope {
    #[serde(rename = "error-message")]
    error_message: Option<String>,
}

/// Decode a verdict-query response body into a normalized verdict.
///
/// Total: never fails. Malformed XML and missing fields map to
/// `Unknown(None)` rather than an error, since the service did answer.
pub fn decode_verdict_response(body: &str) -> Verdict {
    let envelope: VerdictEnvelope = match quick_xml::de::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable verdict response");
            return Verdict::Unknown(None);
        }
    };

    if let Some(message) = envelope
        .error_message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
    {
        tracing::warn!(error = %message, "reputation service reported an error");
        return Verdict::AnalysisError;
    }

    let info = match envelope.verdict_info {
        Some(info) => info,
        None => return Verdict::Unknown(None),
    };

    if let Some(hash) = info.sha256.as_deref().or(info.md5.as_deref()) {
        tracing::debug!(hash = %hash, "verdict response correlated");
    }

    match info.verdict.as_deref().map(str::trim) {
        Some(raw) => raw
            .parse::<i32>()
            .map(Verdict::from_code)
            .unwrap_or(Verdict::Unknown(None)),
        None => Verdict::Unknown(None),
    }
}

/// Decode a submission response body.
///
/// A non-empty `error-message` field is a rejection; everything else
/// (including bodies we cannot parse) counts as accepted, matching the
/// service contract where success bodies vary but errors are explicit.
pub fn decode_submit_response(body: &str) -> Result<(), String> {
    let envelope: SubmitEnvelope = match quick_xml::de::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) => return Ok(()),
    };

    match envelope
        .error_message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
    {
        Some(message) => Err(message.to_string()),
        None => Ok(()),
    }
}
