//! Tagged result of a single fetch attempt

use crate::render::RenderError;

/// What the retry controller should do after one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The attempt produced a value
    Success(T),

    /// Transient failure, try again after the retry delay
    Retryable(String),

    /// The proxy tunnel failed, restart the session without the proxy
    ProxyFallback(String),

    /// The session is unusable
    Fatal(String),
}

impl<T> FetchOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T> From<RenderError> for FetchOutcome<T> {
    fn from(error: RenderError) -> Self {
        let message = error.to_string();
        match error {
            RenderError::Crash(_) => Self::Fatal(message),
            RenderError::Tunnel(_) => Self::ProxyFallback(message),
            _ if message.to_lowercase().contains("tunnel") => Self::ProxyFallback(message),
            _ => Self::Retryable(message),
        }
    }
}

impl<T> From<Result<T, RenderError>> for FetchOutcome<T> {
    fn from(result: Result<T, RenderError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => error.into(),
        }
    }
}
