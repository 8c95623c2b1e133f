use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub current_level: String,
    pub final_goal: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub classes: Vec<StudentClass>,
    #[serde(default)]
    pub future_concepts: Vec<String>,
    #[serde(default)]
    pub current_class: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentClass {
    pub class_id: i32,
    #[serde(default)]
    pub status: String,
    pub name: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub stretch_methods: Option<Vec<String>>,
    #[serde(default)]
    pub skills_tested: Option<Vec<String>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub classwork: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub hw: Option<String>,
    #[serde(default)]
    pub hw_notes: Option<String>,
    #[serde(default)]
    pub classwork_submission: Option<String>,
    #[serde(default)]
    pub homework_submission: Option<String>,
}

const COMPLETED_STATUSES: [&str; 3] = ["completed", "done", "finished"];

impl StudentClass {
    pub fn is_completed(&self) -> bool {
        let status = self.status.to_lowercase();
        COMPLETED_STATUSES.contains(&status.as_str())
    }

    pub fn content(&self, kind: WorkKind) -> Option<&str> {
        match kind {
            WorkKind::Classwork => self.classwork.as_deref(),
            WorkKind::Homework => self.hw.as_deref(),
        }
    }

    pub fn submission(&self, kind: WorkKind) -> Option<&str> {
        match kind {
            WorkKind::Classwork => self.classwork_submission.as_deref(),
            WorkKind::Homework => self.homework_submission.as_deref(),
        }
    }

    pub fn set_submission(&mut self, kind: WorkKind, work: String) {
        match kind {
            WorkKind::Classwork => self.classwork_submission = Some(work),
            WorkKind::Homework => self.homework_submission = Some(work),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSummary {
    pub total: usize,
    pub completed: usize,
    pub percent: u32,
    pub methods: usize,
    pub stretch: usize,
    pub skills: usize,
}

impl Student {
    pub fn class(&self, class_id: i32) -> Option<&StudentClass> {
        self.classes.iter().find(|c| c.class_id == class_id)
    }

    pub fn class_mut(&mut self, class_id: i32) -> Option<&mut StudentClass> {
        self.classes.iter_mut().find(|c| c.class_id == class_id)
    }

    pub fn is_current(&self, class_id: i32) -> bool {
        self.current_class == Some(class_id)
    }

    pub fn progress(&self) -> ProgressSummary {
        let total = self.classes.len();
        let mut summary = ProgressSummary {
            total,
            ..ProgressSummary::default()
        };

        for class in &self.classes {
            if class.is_completed() {
                summary.completed += 1;
            }
            summary.methods += class.methods.len();
            summary.stretch += class.stretch_methods.as_ref().map_or(0, Vec::len);
            summary.skills += class.skills_tested.as_ref().map_or(0, Vec::len);
        }

        if total > 0 {
            summary.percent = ((summary.completed as f64 / total as f64) * 100.0).round() as u32;
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkKind {
    Classwork,
    Homework,
}

impl WorkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkKind::Classwork => "classwork",
            WorkKind::Homework => "homework",
        }
    }

    /// Short form used in `/work?t=` query strings.
    pub fn code(&self) -> &'static str {
        match self {
            WorkKind::Classwork => "cw",
            WorkKind::Homework => "hw",
        }
    }
}

impl fmt::Display for WorkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cw" | "classwork" => Ok(WorkKind::Classwork),
            "hw" | "homework" => Ok(WorkKind::Homework),
            other => Err(ClientError::BadRequest(format!("Unknown work type: {}", other))),
        }
    }
}

/// Body of `POST /api/submit/{classwork|homework}`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkSubmission {
    pub class_id: i32,
    pub work: String,
}
