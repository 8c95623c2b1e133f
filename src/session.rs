//! Signed-in identity, derived from the `name` cookie.
//!
//! The session is either signed out or signed in as a display name. The
//! cookie store is the source of truth: [`Session::check_auth`] re-reads it
//! and every transition ends by doing so (or by clearing it).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::api::CodeabodeApi;
use crate::cookies::{CookieStore, NAME_COOKIE, TOKEN_COOKIE};
use crate::error::ClientError;

pub struct Session {
    api: Arc<dyn CodeabodeApi>,
    cookies: Arc<dyn CookieStore>,
    identity: RwLock<Option<String>>,
    loading: AtomicBool,
}

impl Session {
    pub fn new(api: Arc<dyn CodeabodeApi>, cookies: Arc<dyn CookieStore>) -> Self {
        Self {
            api,
            cookies,
            identity: RwLock::new(None),
            loading: AtomicBool::new(true),
        }
    }

    /// Re-derives the identity from the `name` cookie.
    ///
    /// Called on start-up and whenever the host regains focus, so a sign-out
    /// in another window is picked up.
    pub fn check_auth(&self) -> Option<String> {
        let identity = self.cookies.get(NAME_COOKIE).map(|raw| decode_cookie_value(&raw));
        debug!("session identity: {:?}", identity);
        *self.identity.write() = identity.clone();
        self.loading.store(false, Ordering::Release);
        identity
    }

    pub fn refresh(&self) -> Option<String> {
        self.check_auth()
    }

    /// Signs in. The identity comes from the cookie the backend sets, not
    /// from `username`, so a successful login without a `name` cookie leaves
    /// the session signed out.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<String>, ClientError> {
        self.api.login(username, password).await?;
        let identity = self.check_auth();
        match &identity {
            Some(name) => info!("signed in as {}", name),
            None => warn!("login accepted but no name cookie was set"),
        }
        Ok(identity)
    }

    /// Local sign-out; the backend is not contacted.
    pub fn logout(&self) {
        self.cookies.remove(NAME_COOKIE);
        self.cookies.remove(TOKEN_COOKIE);
        *self.identity.write() = None;
        info!("signed out");
    }

    /// Changes the password and returns the backend's message. The backend
    /// expires the session cookies on success, so the identity is re-checked.
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, ClientError> {
        let message = self
            .api
            .reset_password(username, current_password, new_password)
            .await?;
        self.check_auth();
        if message.trim().is_empty() {
            return Ok("Password updated successfully.".to_string());
        }
        Ok(message)
    }

    pub fn identity(&self) -> Option<String> {
        self.identity.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.read().is_some()
    }

    /// True until the first [`Session::check_auth`].
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn require_identity(&self) -> Result<String, ClientError> {
        self.identity().ok_or(ClientError::NotSignedIn)
    }
}

/// `decodeURIComponent`-style decoding; `+` is left alone. Malformed input is
/// returned as-is.
fn decode_cookie_value(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
