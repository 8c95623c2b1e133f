use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::CodeabodeApi;
use crate::cache::ProjectCache;
use crate::error::ClientError;
use crate::models::{Project, ProjectStatus, PublishRequest};
use crate::session::Session;

/// Community project listing, viewing and publishing.
pub struct ShowcaseService {
    api: Arc<dyn CodeabodeApi>,
    session: Arc<Session>,
    projects: Arc<ProjectCache>,
    /// Project ids in the order of the last listing.
    listing: RwLock<Vec<i64>>,
}

impl ShowcaseService {
    pub fn new(api: Arc<dyn CodeabodeApi>, session: Arc<Session>, projects: Arc<ProjectCache>) -> Self {
        Self {
            api,
            session,
            projects,
            listing: RwLock::new(Vec::new()),
        }
    }

    /// Fetches every project and replaces the cache with the result.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let projects = self.api.list_projects().await?;
        info!("loaded {} projects", projects.len());
        self.projects.set_all(projects.clone());
        *self.listing.write() = projects.iter().map(|p| p.id).collect();
        Ok(projects)
    }

    /// Cached projects whose build finished, in the order of the last
    /// listing.
    pub fn ready_projects(&self) -> Vec<Project> {
        self.listing
            .read()
            .iter()
            .filter_map(|id| self.projects.get(id))
            .filter(Project::is_ready)
            .collect()
    }

    /// Cache first. There is no single-project endpoint, so a miss
    /// refetches the whole list.
    pub async fn project(&self, id: i64) -> Result<Project, ClientError> {
        if let Some(cached) = self.projects.get(&id) {
            debug!("project {} served from cache", id);
            return Ok(cached);
        }

        self.list_projects()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(ClientError::ProjectNotFound(id))
    }

    /// Fire-and-forget view count bump for a ready project. Returns the
    /// spawned task, or `None` when the project is not playable yet.
    pub fn record_view(&self, project: &Project) -> Option<JoinHandle<()>> {
        if !project.is_ready() {
            return None;
        }

        let api = self.api.clone();
        let id = project.id;
        Some(tokio::spawn(async move {
            if let Err(e) = api.record_project_view(id).await {
                debug!("view count for project {} not recorded: {}", id, e);
            }
        }))
    }

    /// Publishes a project and caches a `pending` record for it so the
    /// detail view does not need a refetch.
    pub async fn publish(&self, request: &PublishRequest) -> Result<Project, ClientError> {
        let author = self.session.require_identity()?;

        let receipt = self.api.submit_project(request).await?;
        info!("published project {} ({})", receipt.id, request.title);

        let project = Project {
            id: receipt.id,
            title: request.title.clone(),
            description: request.description.clone(),
            author_name: Some(author),
            views: 0,
            status: receipt.status.unwrap_or(ProjectStatus::Pending),
            created_at: Utc::now().to_rfc3339(),
            url: receipt.url.unwrap_or_default(),
        };
        self.projects.add(project.clone());
        Ok(project)
    }
}
