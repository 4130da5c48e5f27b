// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! The authorization checkpoint for protected operations.
//!
//! Every protected handler calls [`SessionGuard::check`] before touching
//! its own logic, so the token check lives — and is auditable — in
//! exactly one place instead of being repeated per endpoint.

use std::sync::Arc;

use crate::auth::{AuthService, SessionInfo};
use crate::errors::ApiResult;

/// Precondition check placed in front of every protected operation.
#[derive(Clone)]
pub struct SessionGuard {
    auth: Arc<AuthService>,
}

impl SessionGuard {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }

    /// Admit the caller or short-circuit with `Unauthorized`.
    ///
    /// Handlers invoke this as their first statement and `?` the result,
    /// so no business logic runs for an invalid session.
    pub fn check(&self, token: &str) -> ApiResult<SessionInfo> {
        self.auth.validate(token)
    }
}
