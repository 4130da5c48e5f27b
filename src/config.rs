// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! Service configuration.
//!
//! Everything the core consumes is fixed at startup: the single credential
//! pair, the session TTL, the post-login redirect target, and the bind
//! address. Values come from `ECHOGATE_*` environment variables with
//! compiled-in defaults, so a bare `echogate` invocation serves the demo
//! credentials out of the box.

use std::env;

/// Default port to listen on.
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address. Localhost only; opt in to network exposure.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Session lifetime in seconds (1 hour).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Where a successful login sends the client next.
pub const DEFAULT_REDIRECT_URL: &str = "/request/model.html";

const DEFAULT_LOGIN: &str = "v_shutenko";
const DEFAULT_PASSWORD: &str = "8nEThznM";

/// The single credential pair the service accepts.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

/// Startup configuration, resolved once and shared read-only.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub credentials: Credentials,
    pub session_ttl_secs: i64,
    pub redirect_url: String,
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials {
                login: DEFAULT_LOGIN.to_string(),
                password: DEFAULT_PASSWORD.to_string(),
            },
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Resolve configuration from `ECHOGATE_*` environment variables,
    /// falling back to the compiled defaults for anything unset.
    ///
    /// Unparseable numeric values are treated as unset and logged, rather
    /// than failing startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            credentials: Credentials {
                login: env_or("ECHOGATE_LOGIN", defaults.credentials.login),
                password: env_or("ECHOGATE_PASSWORD", defaults.credentials.password),
            },
            session_ttl_secs: env_parsed_or("ECHOGATE_SESSION_TTL_SECS", defaults.session_ttl_secs),
            redirect_url: env_or("ECHOGATE_REDIRECT_URL", defaults.redirect_url),
            bind_address: env_or("ECHOGATE_BIND", defaults.bind_address),
            port: env_parsed_or("ECHOGATE_PORT", defaults.port),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default,
    }
}

fn env_parsed_or<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}={:?}, using default", key, value);
            default
        }),
        _ => default,
    }
}
