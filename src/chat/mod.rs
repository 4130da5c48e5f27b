// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! Canned chat replies.
//!
//! Reply selection is case-insensitive keyword containment over a small
//! fixed list; no state is retained between calls. The "time" reply is
//! the only one that reads the clock.

use chrono::{DateTime, Utc};

use crate::errors::{ApiError, ApiResult};

/// Longest accepted chat message, in bytes.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

const GREETING_REPLY: &str = "Hello! How can I help?";
const WEATHER_REPLY: &str = "The weather is fine";
const FALLBACK_REPLY: &str = "Request received";

/// Pick the canned reply for `message` as of `now`.
///
/// Keywords are checked in a fixed order, so a message containing several
/// of them gets the first match.
pub fn reply(message: &str, now: DateTime<Utc>) -> ApiResult<String> {
    if message.trim().is_empty() {
        return Err(ApiError::validation("message", "message must not be empty"));
    }
    if message.len() > MAX_MESSAGE_LENGTH {
        return Err(ApiError::validation(
            "message",
            format!("message exceeds maximum length of {} bytes", MAX_MESSAGE_LENGTH),
        ));
    }

    let lower = message.to_lowercase();
    let answer = if lower.contains("hello") {
        GREETING_REPLY.to_string()
    } else if lower.contains("weather") {
        WEATHER_REPLY.to_string()
    } else if lower.contains("time") {
        format!("It is now {}", now.format("%H:%M"))
    } else {
        FALLBACK_REPLY.to_string()
    };

    Ok(answer)
}
