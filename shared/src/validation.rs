//! Validation utilities for the Plant Monitoring Platform

use crate::types::IdealRange;

// ============================================================================
// Account Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

// ============================================================================
// Device Validations
// ============================================================================

/// Validate device identifier format (3-64 chars, alphanumeric plus `:-_`)
///
/// Accepts MAC addresses, serial numbers and similar hardware identifiers.
pub fn validate_device_id(device_id: &str) -> Result<(), &'static str> {
    if device_id.len() < 3 {
        return Err("Device ID must be at least 3 characters");
    }
    if device_id.len() > 64 {
        return Err("Device ID must be at most 64 characters");
    }
    if !device_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_'))
    {
        return Err("Device ID may only contain letters, digits, ':', '-' and '_'");
    }
    Ok(())
}

// ============================================================================
// Species Validations
// ============================================================================

/// Validate an ideal range: finite bounds with `min <= max`
pub fn validate_ideal_range(range: &IdealRange) -> Result<(), &'static str> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err("Ideal range bounds must be finite numbers");
    }
    if range.min > range.max {
        return Err("Ideal range minimum must not exceed maximum");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("owner@example.com").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_device_id_accepts_hardware_ids() {
        assert!(validate_device_id("AA:BB:CC:DD:EE:FF").is_ok());
        assert!(validate_device_id("esp32-greenhouse_01").is_ok());
    }

    #[test]
    fn test_validate_device_id_rejects_bad_input() {
        assert!(validate_device_id("ab").is_err());
        assert!(validate_device_id(&"x".repeat(65)).is_err());
        assert!(validate_device_id("has space").is_err());
        assert!(validate_device_id("semi;colon").is_err());
    }

    #[test]
    fn test_validate_ideal_range() {
        assert!(validate_ideal_range(&IdealRange::new(10.0, 20.0)).is_ok());
        assert!(validate_ideal_range(&IdealRange::new(10.0, 10.0)).is_ok());
        assert!(validate_ideal_range(&IdealRange::new(20.0, 10.0)).is_err());
        assert!(validate_ideal_range(&IdealRange::new(f64::NAN, 10.0)).is_err());
        assert!(validate_ideal_range(&IdealRange::new(0.0, f64::INFINITY)).is_err());
    }
}
