use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::WorkKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub student_name: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub interpretation: Option<String>,
    pub question: String,
    #[serde(default)]
    pub work: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Whether a comment reflects server data or a local optimistic append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentState {
    #[default]
    Confirmed,
    /// Appended after a successful post but not yet seen in an authoritative
    /// fetch. Carries a synthesized negative id.
    PendingConfirmation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub account_name: Option<String>,
    pub comment: String,
    pub created_at: String,
    #[serde(skip)]
    pub state: CommentState,
}

impl Comment {
    pub fn is_pending(&self) -> bool {
        self.state == CommentState::PendingConfirmation
    }
}

/// Body of `POST /api/comment`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest {
    pub question_id: i64,
    pub comment: String,
}

/// What `POST /api/comment` answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentReceipt {
    /// The deployed backend returns only the creation timestamp.
    Timestamp(String),
    Record { id: i64, created_at: String },
}

#[derive(Deserialize)]
struct CommentRecordBody {
    id: i64,
    created_at: String,
}

impl CommentReceipt {
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<CommentRecordBody>(body) {
            Ok(record) => CommentReceipt::Record {
                id: record.id,
                created_at: record.created_at,
            },
            Err(_) => CommentReceipt::Timestamp(body.trim().trim_matches('"').to_string()),
        }
    }
}

/// Body of `POST /api/ask`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub class_id: i32,
    pub work_type: WorkKind,
    pub error: String,
    pub interpretation: String,
    pub question: String,
}

impl AskRequest {
    pub fn new(
        class_id: i32,
        work_type: WorkKind,
        error: &str,
        interpretation: &str,
        question: &str,
    ) -> Result<Self, ClientError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ClientError::BadRequest("Question is required".to_string()));
        }

        Ok(Self {
            class_id,
            work_type,
            error: error.trim().to_string(),
            interpretation: interpretation.trim().to_string(),
            question: question.to_string(),
        })
    }
}
