// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! Model-parameter settings validation.
//!
//! Each call validates its integer against the fixed bounds and echoes it
//! back. Nothing is stored against the session: the calls are
//! deliberately stateless.

use std::ops::RangeInclusive;

use crate::errors::{ApiError, ApiResult};

/// Accepted range for the `temperature` parameter.
pub const TEMPERATURE_RANGE: RangeInclusive<i64> = 0..=200;

/// Accepted range for the `top_p` parameter.
pub const TOP_P_RANGE: RangeInclusive<i64> = 0..=100;

/// Validate a temperature value, echoing it back when in range.
pub fn validate_temperature(value: i64) -> ApiResult<i64> {
    check_range("temperature", value, &TEMPERATURE_RANGE)
}

/// Validate a top-p value, echoing it back when in range.
pub fn validate_top_p(value: i64) -> ApiResult<i64> {
    check_range("top_p", value, &TOP_P_RANGE)
}

fn check_range(field: &str, value: i64, range: &RangeInclusive<i64>) -> ApiResult<i64> {
    if !range.contains(&value) {
        return Err(ApiError::validation(
            field,
            format!(
                "value {} is out of range for {} ({}..={})",
                value,
                field,
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(value)
}
