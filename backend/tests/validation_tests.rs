//! Validation integration tests
//!
//! Property tests over the shared validation rules used by the account,
//! species and sensor services.

use proptest::prelude::*;

use shared::types::IdealRange;
use shared::validation::{
    validate_device_id, validate_email, validate_ideal_range, validate_password,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_typical_registration_inputs() {
        assert!(validate_email("gardener@example.com").is_ok());
        assert!(validate_password("correct-horse-battery").is_ok());
    }

    #[test]
    fn test_typical_device_ids() {
        assert!(validate_device_id("AA:BB:CC:DD:EE:FF").is_ok());
        assert!(validate_device_id("esp32-balcony_02").is_ok());
        assert!(validate_device_id("sn").is_err());
        assert!(validate_device_id("no spaces allowed").is_err());
    }

    #[test]
    fn test_species_range_bounds() {
        assert!(validate_ideal_range(&IdealRange::new(18.0, 26.0)).is_ok());
        assert!(validate_ideal_range(&IdealRange::new(26.0, 18.0)).is_err());
        assert!(validate_ideal_range(&IdealRange::new(f64::NAN, 26.0)).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for identifier characters the device rules accept.
    fn device_char_strategy() -> impl Strategy<Value = char> {
        prop::sample::select(
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789:-_"
                .chars()
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any identifier built from the allowed alphabet at a legal length
        /// is accepted.
        #[test]
        fn prop_device_id_allowed_alphabet_accepted(
            chars in prop::collection::vec(device_char_strategy(), 3..=64)
        ) {
            let device_id: String = chars.into_iter().collect();
            prop_assert!(validate_device_id(&device_id).is_ok());
        }

        /// Length bounds are enforced regardless of content.
        #[test]
        fn prop_device_id_length_bounds(len in 0usize..200) {
            let device_id = "a".repeat(len);
            let expected_ok = (3..=64).contains(&len);
            prop_assert_eq!(validate_device_id(&device_id).is_ok(), expected_ok);
        }

        /// Short passwords are always rejected, long ones accepted.
        #[test]
        fn prop_password_length_rule(password in ".{0,32}") {
            let expected_ok = password.len() >= 8;
            prop_assert_eq!(validate_password(&password).is_ok(), expected_ok);
        }

        /// Ordered finite bounds always validate; inverted bounds never do.
        #[test]
        fn prop_ideal_range_ordering(a in -100.0..100.0f64, b in -100.0..100.0f64) {
            let (min, max) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(validate_ideal_range(&IdealRange::new(min, max)).is_ok());
            if min < max {
                prop_assert!(validate_ideal_range(&IdealRange::new(max, min)).is_err());
            }
        }
    }
}
