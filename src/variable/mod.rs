pub mod config;
pub mod resolver;
pub mod types;

pub use config::EnvironmentLoader;
pub use resolver::VariableResolver;
pub use types::{Environment, EnvironmentMap};
