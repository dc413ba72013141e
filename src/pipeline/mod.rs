pub mod parser;
pub mod dedup;
pub mod generate;

pub use parser::{extract_json_payload, extract_text, parse_envelope};
pub use dedup::{dedupe_sources, sources_from_envelope};
pub use generate::{
    generate_report, process_envelope, GeneratedReport, GenerationFailure, ReportOutcome,
};
