//! Client-visible cookie storage.
//!
//! The session identity lives in the `name` cookie and the opaque session
//! token in `token`. Both are read and written through [`CookieStore`] so a
//! test can swap in a [`MemoryCookieStore`] and inspect it directly.

use std::collections::BTreeMap;

use cookie::Cookie;
use parking_lot::RwLock;
use tracing::debug;

pub const NAME_COOKIE: &str = "name";
pub const TOKEN_COOKIE: &str = "token";

pub trait CookieStore: Send + Sync {
    /// Raw (still percent-encoded) value of a cookie.
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str);
    fn remove(&self, name: &str);
    /// Every stored cookie as `(name, value)` pairs.
    fn all(&self) -> Vec<(String, String)>;
}

#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: RwLock<BTreeMap<String, String>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies
            .read()
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.cookies.write().insert(name.to_string(), value.to_string());
    }

    fn remove(&self, name: &str) {
        self.cookies.write().remove(name);
    }

    fn all(&self) -> Vec<(String, String)> {
        self.cookies
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Builds the value of a `Cookie` request header, or `None` when empty.
pub fn request_header(store: &dyn CookieStore) -> Option<String> {
    let pairs = store.all();
    if pairs.is_empty() {
        return None;
    }
    Some(
        pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Applies one `Set-Cookie` header value to the store.
///
/// A cookie with `Max-Age<=0` or an `Expires` in the past is removed, which
/// is how the backend signs a client out.
pub fn apply_set_cookie(store: &dyn CookieStore, header: &str) {
    let parsed = match Cookie::parse(header) {
        Ok(c) => c,
        Err(e) => {
            debug!("ignoring malformed Set-Cookie {:?}: {}", header, e);
            return;
        }
    };

    let expired_by_age = parsed
        .max_age()
        .map(|age| age.is_zero() || age.is_negative())
        .unwrap_or(false);
    let expired_by_date = parsed
        .expires_datetime()
        .map(|at| at.unix_timestamp() <= chrono::Utc::now().timestamp())
        .unwrap_or(false);

    if expired_by_age || expired_by_date || parsed.value().is_empty() {
        debug!("cookie {} cleared by server", parsed.name());
        store.remove(parsed.name());
    } else {
        store.set(parsed.name(), parsed.value());
    }
}
