use serde::{Deserialize, Deserializer, Serialize};

/// Tone of a finding from the pharmaceutical industry's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "Positivo", alias = "Positive")]
    Positive,
    #[serde(rename = "Negativo", alias = "Negative")]
    Negative,
    #[serde(rename = "Neutral")]
    Neutral,
}

impl Sentiment {
    /// Spanish label, as written on the wire and in exports.
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positivo",
            Sentiment::Negative => "Negativo",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode an explicit `null` the same way as a missing key.
pub(crate) fn default_on_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One reported fact or event within a topical section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub title: String,
    pub summary: String,
    /// Outlet or institution the finding comes from.
    #[serde(default, deserialize_with = "default_on_null")]
    pub source: String,
    #[serde(default, deserialize_with = "default_on_null")]
    pub source_url: String,
    pub sentiment: Sentiment,
    #[serde(default, deserialize_with = "default_on_null")]
    pub pharma_impact: String,
    #[serde(default, deserialize_with = "default_on_null")]
    pub key_actor: String,
    /// Set for narrative or policy shifts by the President or senior officials.
    #[serde(default, deserialize_with = "default_on_null")]
    pub is_high_priority: bool,
}
