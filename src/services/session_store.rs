//! In-flight OAuth sessions, keyed by the `state` string. Process-local by
//! design: a callback must land on the instance that issued the redirect.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::twitter_api::oauth::{OAuth2Client, PkceVerifier};

/// How long a started OAuth flow stays redeemable.
pub const SESSION_TTL_MINUTES: i64 = 10;

/// Everything needed to finish an OAuth flow once the callback arrives.
#[derive(Debug, Clone)]
pub struct OAuthSession {
    pub client: OAuth2Client,
    pub verifier: PkceVerifier,
    pub callback: String,
}

struct StoredSession {
    session: OAuthSession,
    expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    ttl: Duration,
    inner: Mutex<HashMap<String, StoredSession>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(SESSION_TTL_MINUTES))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Stores a session under its state key. A flow restarted for the same
    /// state silently replaces the previous one.
    pub fn put(&self, state: &str, session: OAuthSession) {
        let stored = StoredSession {
            session,
            expires_at: Utc::now() + self.ttl,
        };
        self.inner.lock().unwrap().insert(state.to_string(), stored);
    }

    /// Looks up a live session, lazily dropping it when expired.
    pub fn get(&self, state: &str) -> Option<OAuthSession> {
        let mut sessions = self.inner.lock().unwrap();
        match sessions.get(state) {
            Some(stored) if stored.expires_at > Utc::now() => Some(stored.session.clone()),
            Some(_) => {
                sessions.remove(state);
                None
            }
            None => None,
        }
    }

    /// Removes and returns a live session. Callbacks consume their session
    /// exactly once; a replayed callback finds nothing.
    pub fn take(&self, state: &str) -> Option<OAuthSession> {
        let mut sessions = self.inner.lock().unwrap();
        let stored = sessions.remove(state)?;
        if stored.expires_at > Utc::now() {
            Some(stored.session)
        } else {
            None
        }
    }

    pub fn delete(&self, state: &str) {
        self.inner.lock().unwrap().remove(state);
    }
}
