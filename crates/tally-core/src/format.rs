//! Display formatting for numeric values.

/// Marker rendered for a result that is not a finite number (division by zero).
pub const UNDEFINED: &str = "undefined";

/// Format a value for display.
///
/// Integral values render without a fractional part, negative zero renders
/// as `0`, and non-finite values render as [`UNDEFINED`].
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    // f64's Display never switches to exponent notation and drops ".0".
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_values_drop_fraction() {
        assert_eq!(format_value(7.0), "7");
        assert_eq!(format_value(-12.0), "-12");
    }

    #[test]
    fn test_fractional_values() {
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(0.05), "0.05");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(format_value(-0.0), "0");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_value(f64::NAN), UNDEFINED);
        assert_eq!(format_value(f64::INFINITY), UNDEFINED);
        assert_eq!(format_value(f64::NEG_INFINITY), UNDEFINED);
    }
}
