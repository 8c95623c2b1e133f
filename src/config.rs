use std::env;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8090";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn new_from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("CODEABODE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "CODEABODE_BASE_URL must be an http(s) url, got {}",
                base_url
            )));
        }

        Ok(Self::new(base_url))
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Credentials the binary signs in with.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new_from_env() -> Result<Self, ClientError> {
        let username = env::var("CODEABODE_USERNAME")
            .map_err(|_| ClientError::Config("CODEABODE_USERNAME is not set".to_string()))?;
        let password = env::var("CODEABODE_PASSWORD")
            .map_err(|_| ClientError::Config("CODEABODE_PASSWORD is not set".to_string()))?;

        Ok(Self { username, password })
    }
}
