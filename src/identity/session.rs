use std::collections::HashMap;
use std::time::{Duration, Instant};
use anyhow::{Result, anyhow};
use base64::Engine;
use parking_lot::RwLock;

use super::principal::Identity;

pub type SessionToken = String;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub identity: Identity,
    pub issued_at: Instant,
    pub expires_at: Instant,
}

// 256-bit random token, base64url without padding. An entropy failure is an
// error, not a zeroed buffer.
fn gen_token() -> Result<String> {
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).map_err(|e| anyhow!(e.to_string()))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
}

/// Issues and resolves opaque bearer tokens. Tokens are held in process
/// memory only; a restart invalidates every outstanding session.
pub struct SessionManager {
    pub ttl: Duration,
    sessions: RwLock<HashMap<SessionToken, Session>>,
}

impl Default for SessionManager {
    fn default() -> Self { Self::new(Duration::from_secs(60 * 60)) }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: RwLock::new(HashMap::new()) }
    }

    pub fn issue(&self, identity: Identity) -> Result<Session> {
        let now = Instant::now();
        let token = gen_token()?;
        let sess = Session {
            token: token.clone(),
            identity: identity.clone(),
            issued_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.write().insert(token, sess.clone());
        tracing::debug!(target: "hostbook::auth", "session.issue user={} ttl_secs={}", identity.email, self.ttl.as_secs());
        Ok(sess)
    }

    pub fn validate(&self, token: &str) -> Option<Identity> {
        let now = Instant::now();
        let mut drop_key: Option<String> = None;
        let out = {
            let map = self.sessions.read();
            if let Some(sess) = map.get(token) {
                if sess.expires_at > now {
                    Some(sess.identity.clone())
                } else {
                    drop_key = Some(token.to_string());
                    None
                }
            } else { None }
        };
        if let Some(k) = drop_key {
            self.sessions.write().remove(&k);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_to_its_identity() {
        let mgr = SessionManager::default();
        let sess = mgr.issue(Identity::new("a@example.com")).unwrap();
        let who = mgr.validate(&sess.token);
        assert_eq!(who, Some(Identity::new("a@example.com")));
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let mgr = SessionManager::default();
        mgr.issue(Identity::new("a@example.com")).unwrap();
        assert_eq!(mgr.validate("no-such-token"), None);
    }

    #[test]
    fn expired_token_is_dropped_on_read() {
        let mgr = SessionManager::new(Duration::ZERO);
        let sess = mgr.issue(Identity::new("a@example.com")).unwrap();
        assert_eq!(mgr.validate(&sess.token), None);
        // second read hits the pruned map, not a stale entry
        assert_eq!(mgr.validate(&sess.token), None);
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let mgr = SessionManager::default();
        let a = mgr.issue(Identity::new("a@example.com")).unwrap();
        let b = mgr.issue(Identity::new("a@example.com")).unwrap();
        assert_ne!(a.token, b.token);
        assert!(a.token.len() >= 40);
    }

    #[test]
    fn token_is_never_the_zeroed_encoding() {
        // base64url of 32 zero bytes is 43 'A's; minting either errors or
        // produces real entropy
        let mgr = SessionManager::default();
        let sess = mgr.issue(Identity::new("a@example.com")).unwrap();
        assert_ne!(sess.token, "A".repeat(43));
    }
}
