//! Validation of output names and captured output values.

use crate::{BootstrapError, Result};

/// Maximum allowed length for output names.
const MAX_NAME_LENGTH: usize = 255;

/// Characters that would terminate or escape a quoted HCL string.
const UNSAFE_VALUE_CHARS: &str = "\"\\";

/// Validates an output name before it is passed to the provisioning tool.
///
/// Output names are Terraform identifiers: a letter or underscore followed by
/// letters, digits, underscores, or dashes.
///
/// # Errors
///
/// Returns [`BootstrapError::InvalidConfig`] if validation fails.
///
/// # Example
///
/// ```
/// use tfbootstrap::validation::validate_output_name;
///
/// assert!(validate_output_name("tf_state_bucket_name").is_ok());
/// assert!(validate_output_name("region").is_ok());
///
/// assert!(validate_output_name("").is_err());
/// assert!(validate_output_name("-raw").is_err());
/// assert!(validate_output_name("name; rm -rf /").is_err());
/// ```
pub fn validate_output_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BootstrapError::InvalidConfig(
            "output name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(BootstrapError::InvalidConfig(format!(
            "output name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }

    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(BootstrapError::InvalidConfig(format!(
            "output name '{}' is not a valid identifier",
            name
        )));
    }

    Ok(())
}

/// Validates a trimmed output value before it is embedded in the backend block.
///
/// # Errors
///
/// Returns [`BootstrapError::OutputCapture`] if the value is empty or would
/// break out of a quoted string.
pub fn validate_output_value(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BootstrapError::output_capture(name, "output is empty"));
    }

    if value.chars().any(|c| c.is_control()) {
        return Err(BootstrapError::output_capture(
            name,
            "output contains control characters",
        ));
    }

    if value.chars().any(|c| UNSAFE_VALUE_CHARS.contains(c)) {
        return Err(BootstrapError::output_capture(
            name,
            "output contains quote or backslash characters",
        ));
    }

    // Template sequences are interpolated inside HCL strings.
    if value.contains("${") || value.contains("%{") {
        return Err(BootstrapError::output_capture(
            name,
            "output contains a template sequence",
        ));
    }

    Ok(())
}
