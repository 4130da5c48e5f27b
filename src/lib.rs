// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! echogate - session-gated demo API
//!
//! A minimal session-based authentication gate in front of a small set of
//! demo endpoints (canned chat replies, model-parameter settings).
//! Sessions are opaque random tokens with a fixed one-hour lifetime, held
//! in memory for the life of the process.
//!
//! # Core Modules
//!
//! - [`session`] - Session records and the store that owns them
//! - [`auth`] - Login, logout, validation, and the protected-operation guard
//! - [`clock`] - Injectable time source so expiry is testable
//! - [`server`] - HTTP surface (axum)
//! - [`chat`] / [`settings`] - The gated demo operations
//! - [`errors`] - Boundary error type and JSON rendering
//! - [`config`] - Startup configuration

pub mod auth;
pub mod chat;
pub mod clock;
pub mod config;
pub mod errors;
pub mod server;
pub mod session;
pub mod settings;
pub mod utils;

// Re-export the types most callers need
pub use auth::{AuthService, IssuedSession, SessionGuard, SessionInfo};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Credentials, ServiceConfig};
pub use errors::{ApiError, ApiResult, ErrorBody};
pub use server::Server;
pub use session::{Session, SessionStore};
pub use utils::mask_sensitive;
