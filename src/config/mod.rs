pub mod credentials;
pub mod env;
pub mod parser;
pub mod schema;
pub mod settings;
pub mod types;

pub use types::*;
pub use parser::parse_config;
pub use settings::{Overrides, Settings};
