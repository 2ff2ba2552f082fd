//! Session identity: the opaque token correlating every request of one
//! visit.
//!
//! Ids look like `session_<base36 millis>_<12 hex>`: the time prefix keeps
//! them roughly sortable in backend logs, the random suffix keeps concurrent
//! visits apart. Uniqueness is probabilistic, not cryptographic.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sy_domain::trace::TraceEvent;
use uuid::Uuid;

/// Opaque session token. Never mutated; rotation yields a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh id.
    pub fn create() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("session_{}_{}", to_base36(millis), &suffix[..12]))
    }

    /// Mint the id that replaces `self` after a matching cycle. Never
    /// returns an id equal to `self`.
    pub fn rotate(&self) -> Self {
        let mut next = Self::create();
        while next == *self {
            next = Self::create();
        }
        TraceEvent::SessionRotated {
            old_session_id: self.0.clone(),
            new_session_id: next.0.clone(),
        }
        .emit();
        next
    }

    /// Wrap an id minted elsewhere (e.g. passed on the command line).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn create_has_expected_shape() {
        let id = SessionId::create();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(parts[2].len(), 12);
    }

    #[test]
    fn create_is_unique_across_a_burst() {
        let ids: HashSet<SessionId> = (0..1000).map(|_| SessionId::create()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn rotate_never_reuses_current() {
        let current = SessionId::create();
        for _ in 0..100 {
            assert_ne!(current.rotate(), current);
        }
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
