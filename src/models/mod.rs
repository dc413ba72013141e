pub mod envelope;
pub mod finding;
pub mod report;
pub mod source;

pub use envelope::*;
pub use finding::*;
pub use report::*;
pub use source::*;
