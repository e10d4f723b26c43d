use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's `{message}` body field
    /// when one could be extracted.
    #[error("server returned {status}")]
    Server {
        status: reqwest::StatusCode,
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The server-provided message when there is one, otherwise the caller's
    /// generic fallback. Transport failures carry no server message.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ApiError::Server {
                message: Some(msg), ..
            } => msg,
            _ => fallback,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
