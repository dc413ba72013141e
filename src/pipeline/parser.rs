use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error};

use crate::errors::ReportError;
use crate::models::{Candidate, Report, ReportEnvelope};
use crate::utils::truncation::truncate_for_log;

/// Finish reason the provider reports when output was suppressed for safety.
pub const FINISH_REASON_SAFETY: &str = "SAFETY";

// A fence tagged `json`, lazily captured body, closing fence.
static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").unwrap());

// Any fence; only consulted when no `json` fence exists.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").unwrap());

/// Reject envelopes that cannot hold a report before looking at any text.
///
/// A prompt-level block wins over everything else, then a missing candidate.
pub fn check_envelope(envelope: &ReportEnvelope) -> Result<&Candidate, ReportError> {
    if let Some(reason) = envelope.block_reason() {
        return Err(ReportError::PromptBlocked(reason.to_string()));
    }
    envelope.first_candidate().ok_or(ReportError::NoCandidate)
}

/// Raw model text: the direct accessor when non-empty, else the first
/// candidate's text parts joined with no separator.
pub fn extract_text(envelope: &ReportEnvelope) -> String {
    match envelope.text.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => envelope
            .first_candidate()
            .map(Candidate::parts_text)
            .unwrap_or_default(),
    }
}

/// Interior of the first `json` fence, else of the first fence of any kind,
/// else the whole text. All three are trimmed.
pub fn extract_json_payload(raw: &str) -> &str {
    let body = JSON_FENCE_RE
        .captures(raw)
        .or_else(|| FENCE_RE.captures(raw))
        .and_then(|cap| cap.get(1));
    match body {
        Some(body) => body.as_str().trim(),
        None => raw.trim(),
    }
}

pub fn parse_report(payload: &str) -> Result<Report, ReportError> {
    serde_json::from_str(payload).map_err(|e| ReportError::InvalidJson(e.to_string()))
}

/// Run the ordered decision table over an envelope.
///
/// 1. prompt block reason  -> `PromptBlocked`
/// 2. no candidate         -> `NoCandidate`
/// 3. empty text + SAFETY  -> `SafetyBlocked`
/// 4. empty text           -> `EmptyResponse`
/// 5. unparsable payload   -> `InvalidJson`
pub fn parse_envelope(envelope: &ReportEnvelope) -> Result<Report, ReportError> {
    let candidate = check_envelope(envelope)?;

    let raw = extract_text(envelope);
    if raw.is_empty() {
        let finish_reason = candidate.finish_reason.clone();
        if finish_reason.as_deref() == Some(FINISH_REASON_SAFETY) {
            return Err(ReportError::SafetyBlocked);
        }
        return Err(ReportError::EmptyResponse { finish_reason });
    }

    let payload = extract_json_payload(&raw);
    debug!(raw_len = raw.len(), payload_len = payload.len(), "Extracted report payload");

    parse_report(payload).inspect_err(|e| {
        error!(error = %e, raw = %truncate_for_log(&raw), "Failed to parse report JSON");
    })
}
