// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! Small helpers shared across the crate.

/// Mask a sensitive string (session tokens, passwords) for logging.
///
/// Shows only the first `visible_prefix` characters and replaces the rest
/// with "...". Tokens are never written to the log in full.
///
/// # Examples
///
/// ```
/// use echogate::utils::mask_sensitive;
///
/// let token = "9f8a6c41d2e37b05aa14c6d08e92f3b7";
/// assert_eq!(mask_sensitive(token, 8), "9f8a6c41...");
/// ```
pub fn mask_sensitive(input: &str, visible_prefix: usize) -> String {
    if input.len() <= visible_prefix {
        // Shorter than the prefix: still mask, to avoid leaking length
        return format!("{}...", input);
    }

    let prefix: String = input.chars().take(visible_prefix).collect();
    format!("{}...", prefix)
}
