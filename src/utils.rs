use crate::errors::GainsplitError;

// Validation
pub fn validate_positive_float_parameter(value: f64, parameter: &str) -> Result<(), GainsplitError> {
    validate_float_parameter(value, 0.0, f64::INFINITY, parameter)
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), GainsplitError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(GainsplitError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_positive_int_parameter(value: usize, parameter: &str) -> Result<(), GainsplitError> {
    if value == 0 {
        Err(GainsplitError::InvalidParameter(
            parameter.to_string(),
            "positive integer".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Make a category value usable as a file name. Every run of characters
/// outside `[A-Za-z0-9_-]` becomes a single `_`.
pub fn file_safe_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Reversible file name for a feature or category value. Bytes outside
/// `[A-Za-z0-9_-]` are written as `%XX`, and the empty string as `%`.
pub fn encode_path_segment(value: &str) -> String {
    if value.is_empty() {
        return "%".to_string();
    }
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}
