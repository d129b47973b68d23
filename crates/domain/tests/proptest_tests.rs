//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::Coordinate;
use proptest::prelude::*;

// ============================================================================
// Coordinate Property Tests
// ============================================================================

mod coordinate_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_accepted(
            x in -180.0f64..=180.0f64,
            y in -90.0f64..=90.0f64
        ) {
            let result = Coordinate::new(x, y);
            prop_assert!(result.is_ok());

            let c = result.unwrap();
            prop_assert!((c.x() - x).abs() < f64::EPSILON);
            prop_assert!((c.y() - y).abs() < f64::EPSILON);
        }

        #[test]
        fn invalid_longitude_rejected(
            x in prop_oneof![
                (-1000.0f64..-180.1f64),
                (180.1f64..1000.0f64)
            ],
            y in -90.0f64..=90.0f64
        ) {
            prop_assert!(Coordinate::new(x, y).is_err());
        }

        #[test]
        fn invalid_latitude_rejected(
            x in -180.0f64..=180.0f64,
            y in prop_oneof![
                (-1000.0f64..-90.1f64),
                (90.1f64..1000.0f64)
            ]
        ) {
            prop_assert!(Coordinate::new(x, y).is_err());
        }

        #[test]
        fn display_parses_back(
            x in -180.0f64..=180.0f64,
            y in -90.0f64..=90.0f64
        ) {
            let c = Coordinate::new(x, y).unwrap();
            let parsed: Coordinate = c.to_string().parse().unwrap();
            prop_assert_eq!(c, parsed);
        }
    }
}
