use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::WorkKind;

pub const DEFAULT_DEPLOY_METHOD: &str = "pygbag";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Building,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub views: i64,
    pub status: ProjectStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub url: String,
}

/// What a project page can show for the current build status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectDisplay {
    Playable(String),
    Building,
    Failed,
}

impl Project {
    pub fn is_ready(&self) -> bool {
        self.status == ProjectStatus::Ready
    }

    pub fn author(&self) -> &str {
        self.author_name.as_deref().unwrap_or("Anonymous")
    }

    pub fn display(&self) -> ProjectDisplay {
        match self.status {
            ProjectStatus::Ready => ProjectDisplay::Playable(self.url.clone()),
            ProjectStatus::Pending | ProjectStatus::Building => ProjectDisplay::Building,
            ProjectStatus::Failed => ProjectDisplay::Failed,
        }
    }
}

/// Body of `POST /api/submit_project`.
#[derive(Debug, Clone, Serialize)]
pub struct PublishRequest {
    pub class_id: i32,
    pub work_type: WorkKind,
    pub title: String,
    pub description: String,
    pub deploy_method: String,
}

impl PublishRequest {
    /// Trims the free-text fields and rejects an empty title or description.
    pub fn new(
        class_id: i32,
        work_type: WorkKind,
        title: &str,
        description: &str,
    ) -> Result<Self, ClientError> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(ClientError::BadRequest(
                "Title and description are required".to_string(),
            ));
        }

        Ok(Self {
            class_id,
            work_type,
            title: title.to_string(),
            description: description.to_string(),
            deploy_method: DEFAULT_DEPLOY_METHOD.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishReceipt {
    pub id: i64,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub url: Option<String>,
}
