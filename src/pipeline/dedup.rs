use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{GroundingChunk, ReportEnvelope, Source, UNTITLED_SOURCE};

/// Collapse grounding chunks into unique sources keyed by uri.
///
/// Chunks without a uri are dropped. A repeated uri keeps the position of
/// its first appearance and takes the title of its last one.
pub fn dedupe_sources(chunks: &[GroundingChunk]) -> Vec<Source> {
    let mut sources: Vec<Source> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for chunk in chunks {
        let web = chunk.web.as_ref();
        let uri = web.and_then(|w| w.uri.as_deref()).unwrap_or_default();
        if uri.is_empty() {
            continue;
        }
        let title = web
            .and_then(|w| w.title.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_SOURCE)
            .to_string();

        match positions.entry(uri.to_string()) {
            Entry::Occupied(e) => sources[*e.get()].title = title,
            Entry::Vacant(e) => {
                e.insert(sources.len());
                sources.push(Source { uri: uri.to_string(), title });
            }
        }
    }
    sources
}

/// Sources cited by the first candidate. Missing metadata yields none.
pub fn sources_from_envelope(envelope: &ReportEnvelope) -> Vec<Source> {
    envelope
        .first_candidate()
        .map(|c| dedupe_sources(c.grounding_chunks()))
        .unwrap_or_default()
}
