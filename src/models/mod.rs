pub mod forum;
pub mod project;
pub mod student;

pub use forum::{AskRequest, Comment, CommentReceipt, CommentRequest, CommentState, Question};
pub use project::{Project, ProjectDisplay, ProjectStatus, PublishReceipt, PublishRequest};
pub use student::{ProgressSummary, Student, StudentClass, StudentSummary, WorkKind, WorkSubmission};
