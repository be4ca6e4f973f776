//! Host-environment side-effect collaborators.

use std::collections::HashMap;
use std::sync::Mutex;

/// Session-scoped storage key the login email is persisted under.
pub const EMAIL_SESSION_KEY: &str = "email";

/// Application root the post-login chain navigates to.
pub const APP_ROOT: &str = "/";

/// Session-scoped storage owned by the host environment. Entries survive a
/// reload within the tab and are cleared at session end.
pub trait SessionStore: Send + Sync {
    fn put(&self, key: &str, value: &str);
}

/// Full-document navigation, not a client-side route change.
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
}

/// Process-memory session store, for tests and headless hosts.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemorySessionStore::new();
        store.put(EMAIL_SESSION_KEY, "a@b.c");
        assert_eq!(store.get(EMAIL_SESSION_KEY).as_deref(), Some("a@b.c"));
        assert_eq!(store.get("missing"), None);
    }
}
