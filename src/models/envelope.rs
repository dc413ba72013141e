use serde::Deserialize;

/// Raw `generateContent` response as returned by the provider.
///
/// Every field is optional: the response shape varies with blocking,
/// truncation and grounding, and the parser decides what a missing piece
/// means rather than the decoder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    /// Direct text accessor, present in SDK-serialized envelopes.
    pub text: Option<String>,
    pub candidates: Option<Vec<Candidate>>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Content {
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u64>,
    pub candidates_token_count: Option<u64>,
    pub total_token_count: Option<u64>,
}

impl ReportEnvelope {
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.as_ref()?.first()
    }

    /// Prompt-level block reason, ignoring blank values.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()?
            .block_reason
            .as_deref()
            .filter(|r| !r.is_empty())
    }
}

impl Candidate {
    /// Concatenation of every part that carries text, in order.
    pub fn parts_text(&self) -> String {
        self.content
            .as_ref()
            .and_then(|c| c.parts.as_ref())
            .map(|parts| parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }

    pub fn grounding_chunks(&self) -> &[GroundingChunk] {
        self.grounding_metadata
            .as_ref()
            .and_then(|m| m.grounding_chunks.as_deref())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_envelope() {
        let envelope: ReportEnvelope = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "hola"}], "role": "model"},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [{"web": {"uri": "https://a", "title": "A"}}],
                    "webSearchQueries": ["salud colombia"]
                }
            }],
            "promptFeedback": {"blockReason": "OTHER"},
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 20, "totalTokenCount": 30}
        }))
        .unwrap();

        let candidate = envelope.first_candidate().unwrap();
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(candidate.parts_text(), "hola");
        assert_eq!(candidate.grounding_chunks().len(), 1);
        assert_eq!(envelope.block_reason(), Some("OTHER"));
        assert_eq!(envelope.usage_metadata.unwrap().total_token_count, Some(30));
    }

    #[test]
    fn test_decode_empty_object() {
        let envelope: ReportEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.first_candidate().is_none());
        assert!(envelope.block_reason().is_none());
    }

    #[test]
    fn test_null_fields_decode_as_absent() {
        let envelope: ReportEnvelope = serde_json::from_value(json!({
            "text": null,
            "candidates": [{"content": null, "groundingMetadata": null}],
            "promptFeedback": {"blockReason": ""}
        }))
        .unwrap();
        let candidate = envelope.first_candidate().unwrap();
        assert_eq!(candidate.parts_text(), "");
        assert!(candidate.grounding_chunks().is_empty());
        assert!(envelope.block_reason().is_none());
    }

    #[test]
    fn test_parts_text_skips_parts_without_text() {
        let candidate: Candidate = serde_json::from_value(json!({
            "content": {"parts": [{"text": "a"}, {"functionCall": {}}, {"text": "b"}]}
        }))
        .unwrap();
        assert_eq!(candidate.parts_text(), "ab");
    }
}
