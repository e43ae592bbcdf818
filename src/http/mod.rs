pub mod body;
pub mod client;
pub mod multipart;
pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types for convenient access
pub use body::RequestBody;
pub use client::{Client, ClientOptions};
pub use multipart::MultipartBody;
pub use request::{Credentials, Request};
pub use response::Response;
pub use types::{Method, Protocol, Status};
