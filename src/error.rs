use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 401 from the backend. Carries the response body verbatim.
    #[error("{0}")]
    Unauthorized(String),

    /// 404 on an entity fetch. The backend answers this way when the session
    /// token no longer resolves, so callers treat it as a stale session.
    #[error("Not found")]
    NotFound,

    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Class {0} not found")]
    ClassNotFound(i32),

    #[error("Project {0} not found")]
    ProjectNotFound(i64),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Terminal status string for a user-facing surface.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "Network error".to_string(),
            ClientError::Unauthorized(body) if body.trim().is_empty() => {
                "You may need to login first.".to_string()
            }
            ClientError::Unauthorized(body) => body.clone(),
            ClientError::NotFound => "Session expired. Please log in again.".to_string(),
            ClientError::Rejected { body, .. } if body.trim().is_empty() => {
                "Request failed".to_string()
            }
            ClientError::Rejected { body, .. } => body.clone(),
            ClientError::InvalidResponse(_) => "Unexpected response from server".to_string(),
            ClientError::NotSignedIn => "Please log in.".to_string(),
            ClientError::BadRequest(msg) => msg.clone(),
            ClientError::ClassNotFound(_) => "Class not found".to_string(),
            ClientError::ProjectNotFound(_) => "Project not found".to_string(),
            ClientError::Config(msg) => msg.clone(),
        }
    }

    /// 401 and 404 both mean the local identity may be out of date.
    pub fn is_session_signal(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::NotFound)
    }
}
