//! Heads-up overlay: status text and the in-progress selection shape

use crate::selection::SelectionRequest;

/// What the host should paint over the 3D view
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Status lines, top to bottom
    pub lines: Vec<String>,
    /// Selection shape being dragged, if any
    pub selection: Option<SelectionRequest>,
}

/// Format `value` with `digits` significant digits, switching to exponent
/// notation for very large or very small magnitudes and trimming trailing
/// zeros (`0.5`, `1`, `-0.707`, `1.23e4`).
pub fn format_significant(value: f32, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = digits.max(1);
    let exponent = value.abs().log10().floor() as i32;

    if exponent < -4 || exponent >= digits as i32 {
        let formatted = format!("{:.*e}", digits - 1, value);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_zeros(mantissa), exp),
            None => formatted,
        }
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(0.0, 3), "0");
        assert_eq!(format_significant(-0.0, 3), "0");
        assert_eq!(format_significant(1.0, 3), "1");
        assert_eq!(format_significant(0.5, 3), "0.5");
        assert_eq!(format_significant(2.5, 3), "2.5");
        assert_eq!(format_significant(-0.70710677, 3), "-0.707");
        assert_eq!(format_significant(359.0, 3), "359");
        assert_eq!(format_significant(12345.0, 3), "1.23e4");
        assert_eq!(format_significant(0.00001234, 3), "1.23e-5");
        assert_eq!(format_significant(f32::INFINITY, 3), "inf");
    }
}
