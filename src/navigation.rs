//! Single-slot "back" destination, independent of any browser history.
//!
//! Each view records where its back action leads when it mounts and clears
//! the slot when it unmounts. [`Navigation::enter`] ties the two together
//! through a guard.

use std::fmt;

use parking_lot::RwLock;

use crate::session::Session;

#[derive(Debug, Default)]
pub struct Navigation {
    parent_path: RwLock<Option<String>>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parent_path(&self, path: Option<String>) {
        *self.parent_path.write() = path;
    }

    pub fn parent_path(&self) -> Option<String> {
        self.parent_path.read().clone()
    }

    /// Sets the parent path for as long as the returned guard lives.
    #[must_use = "the parent path is cleared when the guard is dropped"]
    pub fn enter(&self, path: impl Into<String>) -> ParentPathGuard<'_> {
        self.set_parent_path(Some(path.into()));
        ParentPathGuard { navigation: self }
    }
}

pub struct ParentPathGuard<'a> {
    navigation: &'a Navigation,
}

impl Drop for ParentPathGuard<'_> {
    fn drop(&mut self) {
        self.navigation.set_parent_path(None);
    }
}

/// What the header shows in its leading slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderAffordance {
    Back(String),
    Welcome(Option<String>),
}

impl fmt::Display for HeaderAffordance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderAffordance::Back(_) => f.write_str("← Back"),
            HeaderAffordance::Welcome(Some(name)) => write!(f, "Welcome, {}!", name),
            HeaderAffordance::Welcome(None) => f.write_str("Welcome to Codeabode"),
        }
    }
}

pub fn header(navigation: &Navigation, session: &Session) -> HeaderAffordance {
    match navigation.parent_path() {
        Some(path) => HeaderAffordance::Back(path),
        None => HeaderAffordance::Welcome(session.identity()),
    }
}

pub mod paths {
    use crate::models::WorkKind;

    pub fn home() -> String {
        "/".to_string()
    }

    pub fn student(student_id: i32) -> String {
        format!("/student?id={}", student_id)
    }

    pub fn work(class_id: i32, kind: WorkKind, student_id: i32) -> String {
        format!("/work?c={}&t={}&s={}", class_id, kind.code(), student_id)
    }

    pub fn forum() -> String {
        "/forum".to_string()
    }

    pub fn projects() -> String {
        "/projects".to_string()
    }

    pub fn project(project_id: i64) -> String {
        format!("/projects/view?id={}", project_id)
    }
}
