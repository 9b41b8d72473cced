/// Errors surfaced by [`crate::ApiClient`] beyond plain transport failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{status}: {body}")]
    Status { status: u16, body: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
