use crate::model::Session;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-caller identity persisted across requests, keyed by an opaque
/// token (carried in a cookie by the HTTP layer). Services never reach
/// into this; they take an already-resolved [`Session`] value.
pub trait SessionStore: Send + Sync {
    /// Stores the session and returns the token that addresses it.
    fn create(&self, session: Session) -> String;
    fn get(&self, token: &str) -> Option<Session>;
    fn destroy(&self, token: &str);
}

static MINTED: AtomicU64 = AtomicU64::new(1);

/// In-process session map. State lives and dies with the process, which
/// matches the single-process deployment model.
#[derive(Default)]
pub struct MemorySessions {
    inner: Mutex<HashMap<String, Session>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessions {
    fn create(&self, session: Session) -> String {
        let token = mint_token(&session.email);
        self.inner
            .lock()
            .unwrap()
            .insert(token.clone(), session);
        token
    }

    fn get(&self, token: &str) -> Option<Session> {
        self.inner.lock().unwrap().get(token).cloned()
    }

    fn destroy(&self, token: &str) {
        self.inner.lock().unwrap().remove(token);
    }
}

fn mint_token(seed: &str) -> String {
    let n = MINTED.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut h = Sha256::new();
    h.update(seed.as_bytes());
    h.update(nanos.to_le_bytes());
    h.update(n.to_le_bytes());
    hex::encode(h.finalize())
}
