//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Everything here runs before a write is attempted, so a rejected
//! request never touches the data files.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuItemInput, Schedule};

use crate::utils::time::{parse_date, parse_hhmm};

// ── Text length limits ──────────────────────────────────────────────

/// Menu item names
pub const MAX_NAME_LEN: usize = 200;

/// Category keys and labels
pub const MAX_CATEGORY_LEN: usize = 100;

/// Menu item descriptions
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Single tag
pub const MAX_TAG_LEN: usize = 50;

/// Reason shown when an item is manually disabled
pub const MAX_REASON_LEN: usize = 200;

// ── Numeric limits ──────────────────────────────────────────────────

pub const MIN_PRICE: f64 = 0.0;
pub const MAX_PRICE: f64 = 500.0;

/// Decoded inline image size limit (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate price is a finite number in [0, 500]
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || !(MIN_PRICE..=MAX_PRICE).contains(&price) {
        return Err(AppError::with_message(
            ErrorCode::PriceOutOfRange,
            format!("price must be between {MIN_PRICE} and {MAX_PRICE}"),
        )
        .with_detail("field", "price"));
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), AppError> {
    for tag in tags {
        validate_len(tag, "tag", MAX_TAG_LEN)?;
    }
    Ok(())
}

/// Validate an inline image: `data:image/*;base64,...` or raw base64.
///
/// Empty strings are allowed and mean "no image".
pub fn validate_image(image: &str) -> Result<(), AppError> {
    if image.is_empty() {
        return Ok(());
    }

    let payload = match image.strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest
                .split_once(',')
                .ok_or_else(|| AppError::new(ErrorCode::InvalidImage))?;
            if !meta.starts_with("image/") || !meta.ends_with(";base64") {
                return Err(AppError::with_message(
                    ErrorCode::InvalidImage,
                    "image must be a base64 encoded image data URL",
                ));
            }
            data
        }
        None => image,
    };

    // Cheap length check before decoding: 4 encoded chars per 3 bytes
    if payload.len() > MAX_IMAGE_BYTES.div_ceil(3) * 4 {
        return Err(image_too_large());
    }

    let decoded = STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::with_message(ErrorCode::InvalidImage, format!("invalid base64: {e}")))?;
    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(image_too_large());
    }
    Ok(())
}

fn image_too_large() -> AppError {
    AppError::with_message(
        ErrorCode::ImageTooLarge,
        format!("image exceeds {} MB", MAX_IMAGE_BYTES / (1024 * 1024)),
    )
}

/// Validate schedule syntax.
///
/// The evaluator tolerates malformed schedules; writes do not.
/// Overnight windows (end before start) are rejected.
pub fn validate_schedule(schedule: &Schedule) -> Result<(), AppError> {
    let invalid = |msg: String| AppError::with_message(ErrorCode::InvalidSchedule, msg);

    if let Some(days) = &schedule.days
        && let Some(bad) = days.iter().find(|d| **d > 6)
    {
        return Err(invalid(format!("day index {bad} is outside 0-6")));
    }

    if let Some(range) = &schedule.time_range {
        let (Some(start), Some(end)) = (&range.start, &range.end) else {
            return Err(invalid("timeRange needs both start and end".to_string()));
        };
        let start_time =
            parse_hhmm(start).ok_or_else(|| invalid(format!("invalid start time '{start}'")))?;
        let end_time =
            parse_hhmm(end).ok_or_else(|| invalid(format!("invalid end time '{end}'")))?;
        if end_time < start_time {
            return Err(invalid(format!(
                "time window {start}-{end} crosses midnight, which is not supported"
            )));
        }
    }

    if let Some(range) = &schedule.date_range {
        let start = match &range.start {
            Some(s) => Some(parse_date(s).ok_or_else(|| invalid(format!("invalid start date '{s}'")))?),
            None => None,
        };
        let end = match &range.end {
            Some(s) => Some(parse_date(s).ok_or_else(|| invalid(format!("invalid end date '{s}'")))?),
            None => None,
        };
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(invalid(format!("date range ends ({end}) before it starts ({start})")));
        }
    }

    Ok(())
}

/// Validate a full menu item payload
pub fn validate_menu_input(input: &MenuItemInput) -> Result<(), AppError> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&input.category, "category", MAX_CATEGORY_LEN)?;
    validate_optional_text(&input.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_price(input.price)?;
    if let Some(tags) = &input.tags {
        validate_tags(tags)?;
    }
    if let Some(image) = &input.image {
        validate_image(image)?;
    }
    validate_optional_text(&input.unavailable_reason, "unavailableReason", MAX_REASON_LEN)?;
    if let Some(schedule) = &input.schedule {
        validate_schedule(schedule)?;
    }
    Ok(())
}

/// Validate a `#rgb` / `#rrggbb` color
pub fn validate_hex_color(value: &str, field: &str) -> Result<(), AppError> {
    let ok = value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !ok {
        return Err(AppError::with_message(
            ErrorCode::InvalidColor,
            format!("{field} must be a hex color like #1a2b3c"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
