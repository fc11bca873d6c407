use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("request rejected by server")]
    Rejected {
        status: StatusCode,
        /// The server's human-readable `message` field, when the error body
        /// carried one.
        message: Option<String>,
    },
    #[error("network error during request")]
    Transport {
        #[from]
        source: reqwest::Error,
    },
}

impl SessionError {
    /// The text to surface to the user: the server's message verbatim when
    /// present, otherwise the caller's generic fallback.
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            SessionError::Rejected {
                message: Some(message),
                ..
            } => message,
            _ => fallback,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SessionError::Rejected { status, .. } => Some(*status),
            SessionError::Transport { source } => source.status(),
        }
    }
}
