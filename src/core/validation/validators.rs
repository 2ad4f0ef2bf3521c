//! Reusable parameter validators
//!
//! Each validator coerces one raw query-string value into a typed value and
//! checks its bounds. Failures carry the field name and the reason so the
//! caller can log them before falling back to a default.

use crate::core::error::ValidationError;

/// Validator: integer within `[min, max]`
pub fn int_range(
    min: i64,
    max: i64,
) -> impl Fn(&str, &str) -> Result<i64, ValidationError> + Send + Sync + Clone {
    move |field: &str, raw: &str| {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::new(field, format!("'{}' is not an integer", raw)))?;
        if value < min || value > max {
            return Err(ValidationError::new(
                field,
                format!("{} is outside [{}, {}]", value, min, max),
            ));
        }
        Ok(value)
    }
}

/// Validator: integer greater than or equal to `min`
pub fn int_min(min: i64) -> impl Fn(&str, &str) -> Result<i64, ValidationError> + Send + Sync + Clone {
    int_range(min, i64::MAX)
}

/// Validator: finite number within `[min, max]`
pub fn float_range(
    min: f64,
    max: f64,
) -> impl Fn(&str, &str) -> Result<f64, ValidationError> + Send + Sync + Clone {
    move |field: &str, raw: &str| {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::new(field, format!("'{}' is not a number", raw)))?;
        if !value.is_finite() {
            return Err(ValidationError::new(field, "number must be finite"));
        }
        if value < min || value > max {
            return Err(ValidationError::new(
                field,
                format!("{} is outside [{}, {}]", value, min, max),
            ));
        }
        Ok(value)
    }
}

/// Validator: finite number greater than or equal to `min`
pub fn float_min(min: f64) -> impl Fn(&str, &str) -> Result<f64, ValidationError> + Send + Sync + Clone {
    float_range(min, f64::MAX)
}

/// Validator: value must be one of a closed set of literal labels
///
/// Returns the allow-listed label itself, never the caller's string.
pub fn one_of(
    allowed: &'static [&'static str],
) -> impl Fn(&str, &str) -> Result<&'static str, ValidationError> + Send + Sync + Clone {
    move |field: &str, raw: &str| {
        allowed.iter().copied().find(|label| *label == raw).ok_or_else(|| {
            ValidationError::new(
                field,
                format!("'{}' is not one of {:?}", raw, allowed),
            )
        })
    }
}

/// Validator: free text, must not be blank once trimmed
pub fn non_blank() -> impl Fn(&str, &str) -> Result<String, ValidationError> + Send + Sync + Clone {
    |field: &str, raw: &str| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(ValidationError::new(field, "value is blank"))
        } else {
            Ok(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === int_range() ===

    #[test]
    fn test_int_range_accepts_bounds() {
        let v = int_range(1, 100);
        assert_eq!(v("limit", "1").unwrap(), 1);
        assert_eq!(v("limit", "100").unwrap(), 100);
        assert_eq!(v("limit", " 42 ").unwrap(), 42);
    }

    #[test]
    fn test_int_range_rejects_out_of_bounds() {
        let v = int_range(1, 100);
        let err = v("limit", "101").unwrap_err();
        assert_eq!(err.field, "limit");
        assert!(v("limit", "0").is_err());
    }

    #[test]
    fn test_int_range_rejects_garbage() {
        let v = int_range(1, 100);
        assert!(v("page", "abc").is_err());
        assert!(v("page", "2.5").is_err());
        assert!(v("page", "").is_err());
    }

    #[test]
    fn test_int_min_has_no_upper_bound() {
        let v = int_min(0);
        assert_eq!(v("minUnidades", "123456789").unwrap(), 123_456_789);
        assert!(v("minUnidades", "-1").is_err());
    }

    // === float_range() ===

    #[test]
    fn test_float_range() {
        let v = float_range(1.0, 5.0);
        assert_eq!(v("minCalificacion", "4.5").unwrap(), 4.5);
        assert!(v("minCalificacion", "0.5").is_err());
        assert!(v("minCalificacion", "5.1").is_err());
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let v = float_min(0.0);
        assert!(v("minIngresos", "NaN").is_err());
        assert!(v("minIngresos", "inf").is_err());
        assert_eq!(v("minIngresos", "500").unwrap(), 500.0);
    }

    // === one_of() ===

    #[test]
    fn test_one_of_returns_static_label() {
        const LABELS: &[&str] = &["ASC", "DESC"];
        let v = one_of(LABELS);
        assert_eq!(v("orderDir", "ASC").unwrap(), "ASC");
        assert!(v("orderDir", "asc").is_err());
        assert!(v("orderDir", "DESC; DROP TABLE x").is_err());
    }

    // === non_blank() ===

    #[test]
    fn test_non_blank_trims() {
        let v = non_blank();
        assert_eq!(v("categoria", "  Libros ").unwrap(), "Libros");
        assert!(v("categoria", "   ").is_err());
    }
}
