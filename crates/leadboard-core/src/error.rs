use thiserror::Error;

/// Boxed transport cause carried by [`Error::Network`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every failure a pipeline run can end with.
///
/// Any of these aborts the run; callers never see a partial summary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(#[source] BoxError),

    #[error("remote API returned {status}: {message}")]
    RemoteApi { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn network(cause: impl Into<BoxError>) -> Self {
        Self::Network(cause.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
