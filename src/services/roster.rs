use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::api::CodeabodeApi;
use crate::cache::StudentCache;
use crate::error::ClientError;
use crate::models::{Student, StudentSummary, WorkKind, WorkSubmission};
use crate::session::Session;

/// Prompt and submission for one class entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassWork {
    pub content: String,
    pub submission: Option<String>,
}

pub struct RosterService {
    api: Arc<dyn CodeabodeApi>,
    session: Arc<Session>,
    students: Arc<StudentCache>,
    listing: RwLock<Vec<StudentSummary>>,
}

impl RosterService {
    pub fn new(api: Arc<dyn CodeabodeApi>, session: Arc<Session>, students: Arc<StudentCache>) -> Self {
        Self {
            api,
            session,
            students,
            listing: RwLock::new(Vec::new()),
        }
    }

    /// Fetches the students visible to the signed-in account. A 401 means
    /// the token expired, so the session is resynchronized.
    pub async fn list_students(&self) -> Result<Vec<StudentSummary>, ClientError> {
        self.session.require_identity()?;

        match self.api.list_students().await {
            Ok(students) => {
                info!("loaded {} students", students.len());
                *self.listing.write() = students.clone();
                Ok(students)
            }
            Err(e) => {
                if matches!(e, ClientError::Unauthorized(_)) {
                    warn!("student list rejected, refreshing session");
                    self.session.refresh();
                }
                Err(e)
            }
        }
    }

    /// Students from the last successful list whose name contains `query`,
    /// ignoring case.
    pub fn filter_students(&self, query: &str) -> Vec<StudentSummary> {
        let needle = query.to_lowercase();
        self.listing
            .read()
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Cache first; falls back to [`RosterService::reload_student`].
    pub async fn student(&self, id: i32) -> Result<Student, ClientError> {
        if let Some(cached) = self.students.get(&id) {
            debug!("student {} served from cache", id);
            return Ok(cached);
        }
        self.reload_student(id).await
    }

    /// Always hits the backend and replaces the cached record.
    pub async fn reload_student(&self, id: i32) -> Result<Student, ClientError> {
        self.session.require_identity()?;

        match self.api.get_student(id).await {
            Ok(student) => {
                self.students.set_one(id, student.clone());
                Ok(student)
            }
            Err(e) => {
                if e.is_session_signal() {
                    warn!("student {} fetch answered {}, refreshing session", id, e);
                    self.session.refresh();
                }
                Err(e)
            }
        }
    }

    pub async fn class_work(
        &self,
        student_id: i32,
        class_id: i32,
        kind: WorkKind,
    ) -> Result<ClassWork, ClientError> {
        let student = self.student(student_id).await?;
        let class = student
            .class(class_id)
            .ok_or(ClientError::ClassNotFound(class_id))?;

        Ok(ClassWork {
            content: class.content(kind).unwrap_or_default().to_string(),
            submission: class.submission(kind).map(str::to_string),
        })
    }

    /// Submits work for a class. On success the cached student, if any, is
    /// replaced by a copy carrying the new submission.
    pub async fn submit_work(
        &self,
        student_id: i32,
        class_id: i32,
        kind: WorkKind,
        work: String,
    ) -> Result<(), ClientError> {
        self.session.require_identity()?;

        let submission = WorkSubmission { class_id, work };
        self.api.submit_work(kind, &submission).await?;
        info!("submitted {} for class {}", kind, class_id);

        let updated = self.students.update(&student_id, |student| {
            if let Some(class) = student.class_mut(class_id) {
                class.set_submission(kind, submission.work.clone());
            }
        });
        if !updated {
            debug!("student {} not cached, submission not mirrored", student_id);
        }
        Ok(())
    }
}
