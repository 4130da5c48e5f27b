// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! Authentication service: login, logout, session validation.
//!
//! This is the only component that judges credentials and session
//! expiry. The credential check compares both fields in constant time and
//! reports a single symmetric failure, so a caller learns nothing about
//! which half was wrong.

pub mod guard;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;

use crate::clock::Clock;
use crate::config::{Credentials, ServiceConfig};
use crate::errors::{ApiError, ApiResult};
use crate::session::SessionStore;
use crate::utils::mask_sensitive;

pub use guard::SessionGuard;

/// What a successful login hands back to the HTTP layer.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub redirect_url: String,
}

/// The immutable view of a live session returned by validation.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_login: String,
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    /// Constant-time match of both fields. No early exit: the login and
    /// password comparisons always both run, and the combined verdict is
    /// the only observable outcome.
    fn matches(&self, login: &str, password: &str) -> bool {
        let login_ok = self.login.as_bytes().ct_eq(login.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(login_ok & password_ok)
    }
}

/// Login, logout, and the single expiry checkpoint.
pub struct AuthService {
    store: SessionStore,
    credentials: Credentials,
    redirect_url: String,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(config: &ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: SessionStore::new(config.session_ttl_secs),
            credentials: config.credentials.clone(),
            redirect_url: config.redirect_url.clone(),
            clock,
        }
    }

    /// Check the credential pair and, on success, issue a session.
    ///
    /// Rejects with `InvalidCredentials` on any mismatch; no session is
    /// created in that case.
    pub fn login(&self, login: &str, password: &str) -> ApiResult<IssuedSession> {
        if !self.credentials.matches(login, password) {
            tracing::warn!(login = %login, "Login rejected");
            return Err(ApiError::invalid_credentials());
        }

        let now = self.clock.now();
        let session = self.store.create(login, now);
        tracing::info!(login = %login, "Login succeeded");

        Ok(IssuedSession {
            token: session.token,
            redirect_url: self.redirect_url.clone(),
        })
    }

    /// Remove the session. Unconditional and idempotent: an absent token
    /// succeeds identically, so the outcome never reveals whether a token
    /// ever existed.
    pub fn logout(&self, token: &str) {
        self.store.delete(token);
        tracing::info!(token = %mask_sensitive(token, 8), "Logout");
    }

    /// The single expiry checkpoint every protected operation goes
    /// through.
    ///
    /// Unknown and expired tokens are indistinguishable to the caller.
    /// Expired records are dropped here, lazily; see
    /// [`SessionStore::sweep_expired`] for the proactive path.
    pub fn validate(&self, token: &str) -> ApiResult<SessionInfo> {
        let now = self.clock.now();

        let session = match self.store.get(token) {
            Some(session) => session,
            None => return Err(ApiError::unauthorized("token not found")),
        };

        if session.is_expired(now) {
            self.store.delete(token);
            return Err(ApiError::unauthorized("session expired"));
        }

        Ok(SessionInfo {
            user_login: session.user_login,
            expires_at: session.expires_at,
        })
    }

    /// The store, for the periodic sweep task.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
