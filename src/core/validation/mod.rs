//! Parameter validation
//!
//! Reports never reject a request because of a bad parameter. Every field is
//! read through [`field_or_default`] or [`optional_field`]: a value that fails
//! its validator is logged and replaced by the field default (or treated as
//! absent), and the rest of the filter is still built.

pub mod filters;
pub mod validators;

use crate::core::error::ValidationError;
use crate::core::params::RawParams;

/// Read a field, substituting `default` when it is absent or invalid
pub fn field_or_default<T, V>(params: &RawParams, field: &str, default: T, validator: V) -> T
where
    V: Fn(&str, &str) -> Result<T, ValidationError>,
{
    optional_field(params, field, validator).unwrap_or(default)
}

/// Read an optional field; absent or invalid values yield `None`
pub fn optional_field<T, V>(params: &RawParams, field: &str, validator: V) -> Option<T>
where
    V: Fn(&str, &str) -> Result<T, ValidationError>,
{
    let raw = params.get(field)?;
    match validator(field, raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(field = %err.field, value = %raw, reason = %err.message, "ignoring invalid report parameter");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validators::{int_range, one_of};
    use super::*;

    #[test]
    fn test_malformed_page_falls_back_to_default() {
        let params = RawParams::parse("page=abc");
        assert_eq!(field_or_default(&params, "page", 1, int_range(1, i64::MAX)), 1);
    }

    #[test]
    fn test_valid_value_is_kept() {
        let params = RawParams::parse("page=4");
        assert_eq!(field_or_default(&params, "page", 1, int_range(1, i64::MAX)), 4);
    }

    #[test]
    fn test_absent_optional_is_none() {
        let params = RawParams::new();
        assert_eq!(optional_field(&params, "nivel", one_of(&["Excelente"])), None);
    }

    #[test]
    fn test_invalid_optional_is_none() {
        let params = RawParams::parse("nivel=Regular");
        assert_eq!(optional_field(&params, "nivel", one_of(&["Excelente"])), None);
    }
}
