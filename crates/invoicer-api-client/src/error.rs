use std::path::PathBuf;

/// Errors returned by the API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Could not reach the invoice service: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API request failed with status {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("File too large: {} is over {max} bytes", .path.display())]
    FileTooLarge { path: PathBuf, max: u64 },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Message supplied by the server in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Text to show the user: the server's message when present, otherwise
    /// this error's own description.
    pub fn user_message(&self) -> String {
        match self.server_message().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_connect() {
            ClientError::Connect(err.to_string())
        } else if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks for a string `message` field, then `error`. Non-JSON bodies yield
/// `None`.
pub(crate) fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(String::from)
}
