use std::sync::Arc;

use crate::api::{CodeabodeApi, HttpApi};
use crate::cache::{ProjectCache, StudentCache};
use crate::config::ClientConfig;
use crate::cookies::{CookieStore, MemoryCookieStore};
use crate::error::ClientError;
use crate::navigation::{self, HeaderAffordance, Navigation};
use crate::services::{ForumService, RosterService, ShowcaseService};
use crate::session::Session;

/// Everything one loaded application instance shares. Build it once and
/// hand references to the views.
#[derive(Clone)]
pub struct ClientState {
    pub api: Arc<dyn CodeabodeApi>,
    pub session: Arc<Session>,
    pub students: Arc<StudentCache>,
    pub projects: Arc<ProjectCache>,
    pub navigation: Arc<Navigation>,
    pub roster: Arc<RosterService>,
    pub forum: Arc<ForumService>,
    pub showcase: Arc<ShowcaseService>,
}

impl ClientState {
    pub fn new(api: Arc<dyn CodeabodeApi>, cookies: Arc<dyn CookieStore>) -> Self {
        let session = Arc::new(Session::new(api.clone(), cookies));
        let students = Arc::new(StudentCache::new());
        let projects = Arc::new(ProjectCache::new());

        let roster = Arc::new(RosterService::new(api.clone(), session.clone(), students.clone()));
        let forum = Arc::new(ForumService::new(api.clone(), session.clone()));
        let showcase = Arc::new(ShowcaseService::new(api.clone(), session.clone(), projects.clone()));

        session.check_auth();

        Self {
            api,
            session,
            students,
            projects,
            navigation: Arc::new(Navigation::new()),
            roster,
            forum,
            showcase,
        }
    }

    /// HTTP-backed state with a fresh in-memory cookie jar.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let cookies: Arc<dyn CookieStore> = Arc::new(MemoryCookieStore::new());
        let api = Arc::new(HttpApi::new(config, cookies.clone())?);
        Ok(Self::new(api, cookies))
    }

    pub fn header(&self) -> HeaderAffordance {
        navigation::header(&self.navigation, &self.session)
    }
}
