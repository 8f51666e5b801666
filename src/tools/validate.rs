//! Input checks shared by the tools
//!
//! A failed check rejects the action before any state is touched.

/// Trim and check a food or exercise name.
///
/// Names end up as fields in comma-separated data files, so commas and line
/// breaks are refused.
pub fn name<'a>(kind: &str, value: &'a str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} name cannot be empty", kind));
    }
    if trimmed.contains([',', '\n', '\r']) {
        return Err(format!("{} name cannot contain commas or line breaks", kind));
    }
    Ok(trimmed)
}

/// A finite value greater than zero
pub fn positive(field: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{} must be greater than 0", field))
    }
}

/// A finite value of zero or more
pub fn non_negative(field: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{} cannot be negative", field))
    }
}
