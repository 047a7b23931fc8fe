use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClassifierError>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Could not reach the service: connection refused, DNS failure, or
    /// request timeout. The caller retries by rerunning the pipeline.
    #[error("Classification service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The service answered 2xx but the payload did not match the expected
    /// shape. Logged separately from transport failures for diagnosis.
    #[error("Malformed classification response: {0}")]
    MalformedResponse(String),

    #[error("Classification service error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        ClassifierError::ServiceUnavailable(err.to_string())
    }
}
