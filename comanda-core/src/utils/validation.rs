//! Input validation helpers
//!
//! Centralized text length constants and validation functions. redb has
//! no built-in length enforcement, so all limits live here.

use shared::error::{CoreError, CoreResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: dish, ingredient, table number, category, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and stock-change reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: unit of measure, actor names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(CoreError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> CoreResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(CoreError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}
