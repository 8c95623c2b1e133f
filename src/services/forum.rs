use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::api::CodeabodeApi;
use crate::error::ClientError;
use crate::models::{AskRequest, Comment, CommentReceipt, CommentRequest, CommentState, Question};
use crate::session::Session;

/// Outcome of comparing optimistic comments with an authoritative fetch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reconciliation {
    pub confirmed: usize,
    /// Pending comments the server did not return. They are gone from the
    /// board after the fetch.
    pub unconfirmed: Vec<Comment>,
}

pub struct ForumService {
    api: Arc<dyn CodeabodeApi>,
    session: Arc<Session>,
    board: RwLock<Vec<Question>>,
    last_temp_id: Mutex<i64>,
}

impl ForumService {
    pub fn new(api: Arc<dyn CodeabodeApi>, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            board: RwLock::new(Vec::new()),
            last_temp_id: Mutex::new(0),
        }
    }

    pub fn questions(&self) -> Vec<Question> {
        self.board.read().clone()
    }

    pub fn pending_comments(&self) -> Vec<Comment> {
        self.board
            .read()
            .iter()
            .flat_map(|q| q.comments.iter())
            .filter(|c| c.is_pending())
            .cloned()
            .collect()
    }

    /// Replaces the board with server data and reconciles any comments that
    /// were still pending confirmation.
    pub async fn load_questions(&self) -> Result<Reconciliation, ClientError> {
        self.session.require_identity()?;

        let fresh = match self.api.get_questions().await {
            Ok(questions) => questions,
            Err(e) => {
                if matches!(e, ClientError::Unauthorized(_)) {
                    self.session.refresh();
                }
                return Err(e);
            }
        };

        let count = fresh.len();
        let report = {
            let mut board = self.board.write();
            let report = reconcile(&board, &fresh);
            *board = fresh;
            report
        };
        for comment in &report.unconfirmed {
            warn!(
                "comment {:?} by {:?} was not confirmed by the server",
                comment.comment, comment.account_name
            );
        }

        info!(
            "loaded {} questions ({} pending comments confirmed)",
            count, report.confirmed
        );
        Ok(report)
    }

    pub async fn ask(&self, request: &AskRequest) -> Result<(), ClientError> {
        self.session.require_identity()?;
        self.api.ask(request).await?;
        info!("question submitted for class {}", request.class_id);
        Ok(())
    }

    /// Posts a comment and appends it to the board right away, authored by
    /// the signed-in identity.
    ///
    /// The backend answers with a bare timestamp, so the appended comment
    /// gets a negative placeholder id and stays
    /// [`CommentState::PendingConfirmation`] until the next
    /// [`ForumService::load_questions`].
    pub async fn post_comment(&self, question_id: i64, text: &str) -> Result<Comment, ClientError> {
        let body = text.trim();
        if body.is_empty() {
            return Err(ClientError::BadRequest("Comment is empty".to_string()));
        }
        let author = self.session.require_identity()?;

        let request = CommentRequest {
            question_id,
            comment: body.to_string(),
        };
        let receipt = self.api.comment(&request).await?;

        let comment = match receipt {
            CommentReceipt::Timestamp(created_at) => Comment {
                id: self.next_temp_id(),
                account_name: Some(author),
                comment: request.comment,
                created_at,
                state: CommentState::PendingConfirmation,
            },
            CommentReceipt::Record { id, created_at } => Comment {
                id,
                account_name: Some(author),
                comment: request.comment,
                created_at,
                state: CommentState::Confirmed,
            },
        };

        {
            let mut board = self.board.write();
            match board.iter_mut().find(|q| q.id == question_id) {
                Some(question) => question.comments.push(comment.clone()),
                None => warn!(
                    "question {} not on the board, comment {} is not tracked",
                    question_id, comment.id
                ),
            }
        }
        Ok(comment)
    }

    /// `-(now in ms)`, kept strictly below every id handed out before.
    fn next_temp_id(&self) -> i64 {
        let mut last = self.last_temp_id.lock();
        let candidate = -Utc::now().timestamp_millis().max(1);
        let id = if candidate < *last { candidate } else { *last - 1 };
        *last = id;
        id
    }
}

/// Matches each pending comment on `board` against the same question in
/// `fresh`, by author and body. A server comment confirms at most one pending
/// comment, and comments already confirmed on `board` never count.
fn reconcile(board: &[Question], fresh: &[Question]) -> Reconciliation {
    let mut report = Reconciliation::default();
    let mut claimed: HashSet<i64> = board
        .iter()
        .flat_map(|q| q.comments.iter())
        .filter(|c| !c.is_pending())
        .map(|c| c.id)
        .collect();

    for question in board {
        let server_comments = fresh
            .iter()
            .find(|q| q.id == question.id)
            .map(|q| q.comments.as_slice())
            .unwrap_or(&[]);

        for comment in question.comments.iter().filter(|c| c.is_pending()) {
            let found = server_comments.iter().find(|c| {
                !claimed.contains(&c.id)
                    && c.comment == comment.comment
                    && c.account_name == comment.account_name
            });

            match found {
                Some(server) => {
                    claimed.insert(server.id);
                    report.confirmed += 1;
                }
                None => report.unconfirmed.push(comment.clone()),
            }
        }
    }
    report
}
