use serde::{Deserialize, Serialize};

/// Title given to grounding citations that arrive without one.
pub const UNTITLED_SOURCE: &str = "Fuente sin título";

/// A web page the model consulted while grounding the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Identity key.
    pub uri: String,
    pub title: String,
}

impl Source {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.uri
        } else {
            &self.title
        }
    }
}
