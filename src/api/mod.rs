pub mod dto;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::cookies::{self, CookieStore};
use crate::error::ClientError;
use crate::models::{
    AskRequest, CommentReceipt, CommentRequest, Project, PublishReceipt, PublishRequest, Question,
    Student, StudentSummary, WorkKind, WorkSubmission,
};

/// The backend endpoints the client consumes.
#[async_trait]
pub trait CodeabodeApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<(), ClientError>;
    async fn reset_password(
        &self,
        username: &str,
        password: &str,
        new_password: &str,
    ) -> Result<String, ClientError>;
    async fn list_students(&self) -> Result<Vec<StudentSummary>, ClientError>;
    async fn get_student(&self, id: i32) -> Result<Student, ClientError>;
    async fn submit_work(&self, kind: WorkKind, submission: &WorkSubmission) -> Result<(), ClientError>;
    async fn get_questions(&self) -> Result<Vec<Question>, ClientError>;
    async fn ask(&self, request: &AskRequest) -> Result<(), ClientError>;
    async fn comment(&self, request: &CommentRequest) -> Result<CommentReceipt, ClientError>;
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;
    async fn submit_project(&self, request: &PublishRequest) -> Result<PublishReceipt, ClientError>;
    async fn record_project_view(&self, id: i64) -> Result<(), ClientError>;
}

pub struct HttpApi {
    client: Client,
    config: ClientConfig,
    cookies: Arc<dyn CookieStore>,
}

impl HttpApi {
    pub fn new(config: ClientConfig, cookies: Arc<dyn CookieStore>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            config,
            cookies,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.config.api_url(path));
        match cookies::request_header(self.cookies.as_ref()) {
            Some(header) => request.header(COOKIE, header),
            None => request,
        }
    }

    /// Sends a request, folds `Set-Cookie` headers into the cookie store and
    /// maps non-success statuses onto the error taxonomy.
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|e| {
            warn!("{} request failed: {}", endpoint, e);
            ClientError::Network(e)
        })?;

        for value in response.headers().get_all(SET_COOKIE) {
            match value.to_str() {
                Ok(header) => cookies::apply_set_cookie(self.cookies.as_ref(), header),
                Err(_) => debug!("{}: skipping non-ascii Set-Cookie header", endpoint),
            }
        }

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{} answered {}: {}", endpoint, status, body);

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(body),
            StatusCode::NOT_FOUND => ClientError::NotFound,
            _ => ClientError::Rejected {
                status: status.as_u16(),
                body,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, ClientError> {
        let body_text = response.text().await?;
        serde_json::from_str::<T>(&body_text).map_err(|e| {
            error!("Failed to parse {} response: {}", endpoint, e);
            ClientError::InvalidResponse(format!("Failed to parse {} response: {}", endpoint, e))
        })
    }
}

#[async_trait]
impl CodeabodeApi for HttpApi {
    async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let body = dto::LoginRequest { username, password };
        self.send(self.request(Method::POST, "login").json(&body), "login")
            .await?;
        Ok(())
    }

    async fn reset_password(
        &self,
        username: &str,
        password: &str,
        new_password: &str,
    ) -> Result<String, ClientError> {
        let body = dto::ResetPasswordRequest {
            username,
            password,
            new_password,
        };
        let response = self
            .send(
                self.request(Method::POST, "reset-password").json(&body),
                "reset-password",
            )
            .await?;
        Ok(response.text().await?)
    }

    async fn list_students(&self) -> Result<Vec<StudentSummary>, ClientError> {
        let response = self
            .send(self.request(Method::POST, "list_students"), "list_students")
            .await?;
        Self::decode(response, "list_students").await
    }

    async fn get_student(&self, id: i32) -> Result<Student, ClientError> {
        let path = format!("get_student/{}", id);
        let response = self.send(self.request(Method::POST, &path), "get_student").await?;
        Self::decode(response, "get_student").await
    }

    async fn submit_work(&self, kind: WorkKind, submission: &WorkSubmission) -> Result<(), ClientError> {
        let path = format!("submit/{}", kind.as_str());
        self.send(self.request(Method::POST, &path).json(submission), "submit")
            .await?;
        Ok(())
    }

    async fn get_questions(&self) -> Result<Vec<Question>, ClientError> {
        let response = self
            .send(self.request(Method::GET, "get_questions"), "get_questions")
            .await?;
        Self::decode(response, "get_questions").await
    }

    async fn ask(&self, request: &AskRequest) -> Result<(), ClientError> {
        self.send(self.request(Method::POST, "ask").json(request), "ask")
            .await?;
        Ok(())
    }

    async fn comment(&self, request: &CommentRequest) -> Result<CommentReceipt, ClientError> {
        let response = self
            .send(self.request(Method::POST, "comment").json(request), "comment")
            .await?;
        let body = response.text().await?;
        Ok(CommentReceipt::from_body(&body))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let response = self.send(self.request(Method::GET, "projects"), "projects").await?;
        Self::decode(response, "projects").await
    }

    async fn submit_project(&self, request: &PublishRequest) -> Result<PublishReceipt, ClientError> {
        let response = self
            .send(
                self.request(Method::POST, "submit_project").json(request),
                "submit_project",
            )
            .await?;
        Self::decode(response, "submit_project").await
    }

    async fn record_project_view(&self, id: i64) -> Result<(), ClientError> {
        let path = format!("projects/{}/view", id);
        self.send(self.request(Method::POST, &path), "project view")
            .await?;
        Ok(())
    }
}
