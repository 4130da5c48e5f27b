// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! Session records and the store that owns them.
//!
//! The store is the only shared mutable state in the service: a map from
//! opaque token to session record behind a single `RwLock`. Records are
//! immutable after creation — expiry is the read-time predicate
//! `now > expires_at`, never a stored flag — so lookups hand out clones
//! and no background work is needed for correctness. A periodic
//! [`SessionStore::sweep_expired`] only reclaims memory.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::utils::mask_sensitive;

/// Random bytes per token. 128 bits keeps the collision probability
/// negligible and the token unguessable.
const TOKEN_BYTES: usize = 16;

/// A time-bounded grant of access for one authenticated principal.
///
/// Immutable after creation. Whether a session is *currently* valid is
/// always judged against a supplied `now`, so the record itself carries
/// no liveness state.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque unguessable identifier.
    pub token: String,
    /// The authenticated principal.
    pub user_login: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Expiry predicate. The boundary instant `now == expires_at` is
    /// still valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Owns every live session record.
///
/// All operations are safe under concurrent invocation; one lock guards
/// the whole map, which is fine at the session volumes this service sees.
/// A poisoned lock is recovered with `into_inner` rather than propagated —
/// the map itself is never left in a torn state by any operation here.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Generate a fresh token: 128 random bits from the thread-local
    /// CSPRNG, hex-encoded.
    fn generate_token() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Create a session for `user_login` at `now` and return a clone of
    /// the record.
    ///
    /// Token uniqueness is guaranteed for the lifetime of the store: in
    /// the (negligible-probability) event of a collision a new token is
    /// generated under the same lock.
    pub fn create(&self, user_login: &str, now: DateTime<Utc>) -> Session {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let token = loop {
            let candidate = Self::generate_token();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = Session {
            token: token.clone(),
            user_login: user_login.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        sessions.insert(token, session.clone());

        tracing::info!(
            "SESSION_CREATED | user={} token={} expires_at={}",
            session.user_login,
            mask_sensitive(&session.token, 8),
            session.expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );

        session
    }

    /// Look up a session by token, returning a clone of the record.
    ///
    /// Returns the session regardless of expiry; the expiry judgment is
    /// applied in exactly one place, `AuthService::validate`.
    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    /// Remove a session. Idempotent: removing an absent token is not an
    /// error. Returns whether a record was actually removed.
    pub fn delete(&self, token: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);

        if let Some(session) = &removed {
            tracing::info!(
                "SESSION_REMOVED | user={} token={}",
                session.user_login,
                mask_sensitive(token, 8),
            );
        }
        removed.is_some()
    }

    /// Drop every record already expired at `now`. Returns the number
    /// removed. Purely memory hygiene; validation never depends on it.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::info!("SESSION_SWEEP | removed={} remaining={}", removed, sessions.len());
        }
        removed
    }

    /// Number of records currently held, expired or not.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
