pub mod error;
pub mod http;
pub mod logger;
pub mod parser;
pub mod runner;
pub mod utils;
pub mod variable;

// Re-export commonly used types
pub use error::{HttperError, Result};
pub use parser::{parse_document, parse_file, parse_request};
