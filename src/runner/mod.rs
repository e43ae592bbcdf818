pub mod executor;
pub mod reporter;
pub mod types;

pub use executor::RequestExecutor;
pub use reporter::RunReporter;
pub use types::{RunResult, RunSummary};
