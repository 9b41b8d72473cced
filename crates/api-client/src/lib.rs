pub mod backend;
pub mod client;
pub mod error;
pub mod retry;

pub use backend::SessionBackend;
pub use client::ApiClient;
pub use error::ApiError;
pub use retry::RetryConfig;
pub use sessionlens_api;
