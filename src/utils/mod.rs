pub mod formatter;
pub mod save;

pub use formatter::{ResponseFormat, ResponseFormatter};
pub use save::{DEFAULT_SAVE_DIR, save_response};
