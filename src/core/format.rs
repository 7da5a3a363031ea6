//! Compact number formatting for metric cards.

use super::error::{DashboardError, Result};

const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Abbreviates a number to at most three significant digits with a
/// thousands suffix, e.g. `1234.5` becomes `"1.23K"`.
///
/// Fails on NaN/infinite input, and on values that would need a suffix
/// beyond `T`.
pub fn format_magnitude(num: f64) -> Result<String> {
    if !num.is_finite() {
        return Err(DashboardError::NonFiniteValue);
    }

    let mut value = round_significant(num);
    let mut magnitude = 0;
    while value.abs() >= 1000.0 {
        if magnitude == SUFFIXES.len() - 1 {
            return Err(DashboardError::MagnitudeOverflow(num));
        }
        magnitude += 1;
        value /= 1000.0;
    }

    let fixed = format!("{value:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    Ok(format!("{trimmed}{}", SUFFIXES[magnitude]))
}

fn round_significant(num: f64) -> f64 {
    // Scientific notation with two fractional digits keeps three significant ones.
    format!("{num:.2e}").parse().unwrap_or(num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values_have_no_suffix() {
        assert_eq!(format_magnitude(0.0).unwrap(), "0");
        assert_eq!(format_magnitude(999.0).unwrap(), "999");
        assert_eq!(format_magnitude(12.5).unwrap(), "12.5");
        assert_eq!(format_magnitude(0.125).unwrap(), "0.125");
    }

    #[test]
    fn test_thousands_and_millions() {
        assert_eq!(format_magnitude(1000.0).unwrap(), "1K");
        assert_eq!(format_magnitude(1234.5).unwrap(), "1.23K");
        assert_eq!(format_magnitude(2000.0).unwrap(), "2K");
        assert_eq!(format_magnitude(71_000.0).unwrap(), "71K");
        assert_eq!(format_magnitude(1_500_000.0).unwrap(), "1.5M");
        assert_eq!(format_magnitude(1_234_500.0).unwrap(), "1.23M");
        assert_eq!(format_magnitude(3_000_000_000.0).unwrap(), "3B");
        assert_eq!(format_magnitude(4.56e12).unwrap(), "4.56T");
    }

    #[test]
    fn test_rounding_can_carry_into_next_magnitude() {
        assert_eq!(format_magnitude(999.5).unwrap(), "1K");
        assert_eq!(format_magnitude(999_999.0).unwrap(), "1M");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_magnitude(-2500.0).unwrap(), "-2.5K");
        assert_eq!(format_magnitude(-42.0).unwrap(), "-42");
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        assert!(matches!(
            format_magnitude(f64::NAN),
            Err(DashboardError::NonFiniteValue)
        ));
        assert!(matches!(
            format_magnitude(f64::INFINITY),
            Err(DashboardError::NonFiniteValue)
        ));
    }

    #[test]
    fn test_values_beyond_trillions_overflow() {
        assert_eq!(format_magnitude(999e12).unwrap(), "999T");
        assert!(matches!(
            format_magnitude(1.5e15),
            Err(DashboardError::MagnitudeOverflow(_))
        ));
    }
}
