//! Session mode resolution.
//!
//! The client is "authenticated" iff the external token store holds a token
//! at the moment an operation starts. Nothing is cached: swapping the token
//! mid-session changes the next call's mode, never an in-flight one.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Key under which the access token lives in the external key-value store.
pub const TOKEN_KEY: &str = "access_token";

/// Externally-owned token storage. Implementations must re-read on every
/// call; the resolver never caches what they return.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Token store backed by a JSON key-value file (the localStorage analog).
///
/// The file is read fresh on every call, so another process rotating the
/// token is picked up by the next request. A missing or unreadable file is
/// simply the no-auth state.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let kv: serde_json::Value = serde_json::from_str(&raw).ok()?;
        kv.get(TOKEN_KEY)?
            .as_str()
            .map(str::to_owned)
            .filter(|t| !t.is_empty())
    }
}

/// Process-local token store for embedding and tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Authenticated,
    NoAuth,
}

/// Endpoint pair selected by the session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub list: &'static str,
    pub filter: &'static str,
}

const AUTH_ENDPOINTS: Endpoints = Endpoints {
    list: "/api/messages",
    filter: "/filter_messages",
};

const NOAUTH_ENDPOINTS: Endpoints = Endpoints {
    list: "/api/cards",
    filter: "/noauth/filter_messages",
};

/// Outcome of one mode resolution. Holds the token captured at resolve time
/// so the whole operation runs against a consistent identity.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub mode: SessionMode,
    pub token: Option<String>,
    pub endpoints: Endpoints,
}

impl ResolvedSession {
    pub fn is_authenticated(&self) -> bool {
        self.mode == SessionMode::Authenticated
    }
}

/// Resolve the session mode from the token store at call time.
///
/// Token absence is a valid resolved state, not a failure.
pub fn resolve_mode(tokens: &dyn TokenStore) -> ResolvedSession {
    match tokens.access_token() {
        Some(token) => ResolvedSession {
            mode: SessionMode::Authenticated,
            token: Some(token),
            endpoints: AUTH_ENDPOINTS,
        },
        None => ResolvedSession {
            mode: SessionMode::NoAuth,
            token: None,
            endpoints: NOAUTH_ENDPOINTS,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_token_presence() {
        let store = MemoryTokenStore::default();
        let session = resolve_mode(&store);
        assert_eq!(session.mode, SessionMode::NoAuth);
        assert_eq!(session.endpoints.list, "/api/cards");
        assert_eq!(session.endpoints.filter, "/noauth/filter_messages");

        store.set_token(Some("tok".into()));
        let session = resolve_mode(&store);
        assert!(session.is_authenticated());
        assert_eq!(session.token.as_deref(), Some("tok"));
        assert_eq!(session.endpoints.list, "/api/messages");
        assert_eq!(session.endpoints.filter, "/filter_messages");
    }

    #[test]
    fn file_store_reads_fresh_on_every_call() {
        let dir = std::env::temp_dir().join(format!("monitoria-session-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.json");

        let store = FileTokenStore::new(&path);
        assert_eq!(store.access_token(), None);

        std::fs::write(&path, r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("abc"));

        std::fs::write(&path, r#"{"access_token": ""}"#).unwrap();
        assert_eq!(store.access_token(), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
