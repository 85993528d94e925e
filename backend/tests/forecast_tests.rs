//! Forecast engine integration tests
//!
//! End-to-end tests of the forecast and action recommendation engine:
//! - Trend estimation over the trailing three-day window
//! - Status classification and action selection
//! - Action timing with the prevention margin
//! - Degraded behavior on sparse or missing data

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use shared::forecast::{
    forecast_at, DataQuality, PredictionStatus, Reading, RecommendedAction,
};
use shared::types::{IdealRange, SensorKind};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn reading(hours_ago: i64, value: f64) -> Reading {
    Reading::new(fixed_now() - Duration::hours(hours_ago), value)
}

/// One reading per day at noon with the given daily values, oldest first.
fn daily_readings(values: [f64; 3]) -> Vec<Reading> {
    vec![
        reading(48, values[0]),
        reading(24, values[1]),
        reading(0, values[2]),
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Rising ground moisture projected to cross the maximum gets a
    /// scheduled reduce-watering action, one hour before the crossing.
    #[test]
    fn test_scheduled_action_before_threshold() {
        let readings = daily_readings([10.0, 12.0, 14.0]);
        let range = IdealRange::new(5.0, 15.5);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::GroundMoisture,
            "Ground moisture",
            fixed_now(),
        );

        // Rate is 2.0/day = 1/12 per hour; 1.5 units to the max = 18 hours.
        assert_eq!(prediction.status, PredictionStatus::Scheduled);
        assert_eq!(prediction.action, RecommendedAction::ReduceWatering);
        assert!((prediction.hours_to_threshold.unwrap() - 18.0).abs() < 1e-9);
        assert!((prediction.action_in_hours - 17.0).abs() < 1e-9);
        assert_eq!(
            prediction.action_time.unwrap(),
            fixed_now() + Duration::hours(17)
        );
    }

    /// A threshold closer than the prevention margin collapses to immediate.
    #[test]
    fn test_margin_collapses_to_immediate() {
        let readings = daily_readings([80.0, 60.0, 40.0]);
        let range = IdealRange::new(39.5, 90.0);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::GroundMoisture,
            "Ground moisture",
            fixed_now(),
        );

        // 0.5 units at 20/day leaves 0.6 hours, inside the one-hour margin.
        assert_eq!(prediction.status, PredictionStatus::Immediate);
        assert_eq!(prediction.action, RecommendedAction::Watering);
        assert_eq!(prediction.action_in_hours, 0.0);
        assert_eq!(prediction.action_time, Some(fixed_now()));
    }

    /// Out-of-range values demand immediate action even when the trend is
    /// already improving.
    #[test]
    fn test_out_of_range_improving_still_immediate() {
        let readings = daily_readings([2.0, 4.0, 6.0]);
        let range = IdealRange::new(10.0, 20.0);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::Temperature,
            "Temperature",
            fixed_now(),
        );

        assert_eq!(prediction.status, PredictionStatus::Immediate);
        assert_eq!(prediction.action, RecommendedAction::Heating);
        assert!(prediction.readable_text.contains("Trend is improving"));
    }

    /// A stable in-range value reports no trend.
    #[test]
    fn test_stable_in_range_is_no_trend() {
        let readings = daily_readings([20.0, 20.0, 20.0]);
        let range = IdealRange::new(15.0, 25.0);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::Temperature,
            "Temperature",
            fixed_now(),
        );

        assert_eq!(prediction.status, PredictionStatus::NoTrend);
        assert_eq!(prediction.action, RecommendedAction::None);
        assert!(prediction.readable_text.contains("stable"));
    }

    /// A stable but out-of-range value still requires intervention.
    #[test]
    fn test_stable_out_of_range_is_immediate() {
        let readings = daily_readings([30.0, 30.0, 30.0]);
        let range = IdealRange::new(15.0, 25.0);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::Temperature,
            "Temperature",
            fixed_now(),
        );

        assert_eq!(prediction.status, PredictionStatus::Immediate);
        assert_eq!(prediction.action, RecommendedAction::Cooling);
    }

    /// An in-range trend that stays inside over the look-ahead reports
    /// no threshold reach.
    #[test]
    fn test_slow_trend_inside_horizon_is_no_reach() {
        let readings = daily_readings([20.0, 20.2, 20.4]);
        let range = IdealRange::new(15.0, 25.0);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::AirMoisture,
            "Air moisture",
            fixed_now(),
        );

        // 0.2/day projects to 20.6 in 24 hours, well inside the range.
        assert_eq!(prediction.status, PredictionStatus::NoReach);
        assert_eq!(prediction.action, RecommendedAction::None);
    }

    /// Fewer than the minimum usable readings yields a no-data result
    /// carrying the last raw reading as the current value.
    #[test]
    fn test_insufficient_data_returns_no_data() {
        let readings = vec![reading(3, 18.0), reading(1, 19.0)];
        let range = IdealRange::new(15.0, 25.0);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::Temperature,
            "Temperature",
            fixed_now(),
        );

        assert_eq!(prediction.status, PredictionStatus::NoData);
        assert_eq!(prediction.current_value, 19.0);
        assert!(prediction.trend.values.is_empty());
    }

    /// No readings at all: a defined no-data result with a zero current value.
    #[test]
    fn test_empty_readings_returns_no_data() {
        let range = IdealRange::new(15.0, 25.0);

        let prediction = forecast_at(&[], range, SensorKind::Temperature, "Temperature", fixed_now());

        assert_eq!(prediction.status, PredictionStatus::NoData);
        assert_eq!(prediction.current_value, 0.0);
        assert_eq!(prediction.action, RecommendedAction::None);
    }

    /// A gap day is interpolated and the report flags estimated values.
    #[test]
    fn test_partial_data_flags_estimation_in_report() {
        // Two days ago and today only; yesterday is interpolated to 45.
        let readings = vec![
            reading(50, 50.0),
            reading(48, 50.0),
            reading(2, 40.0),
            reading(0, 40.0),
        ];
        let range = IdealRange::new(35.5, 80.0);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::GroundMoisture,
            "Ground moisture",
            fixed_now(),
        );

        assert_eq!(prediction.trend.values, vec![50.0, 45.0, 40.0]);
        assert_eq!(prediction.status, PredictionStatus::Scheduled);
        assert!(prediction
            .readable_text
            .contains("Some values were estimated"));
    }

    /// The action table maps each forecastable kind and bound to its action.
    #[test]
    fn test_action_table() {
        let cases = [
            (SensorKind::GroundMoisture, [5.0, 3.0, 1.5], 1.0, 50.0, RecommendedAction::Watering),
            (SensorKind::GroundMoisture, [40.0, 50.0, 60.0], 1.0, 55.0, RecommendedAction::ReduceWatering),
            (SensorKind::Temperature, [15.0, 12.0, 9.0], 10.0, 30.0, RecommendedAction::Heating),
            (SensorKind::Temperature, [25.0, 30.0, 35.0], 10.0, 30.0, RecommendedAction::Cooling),
            (SensorKind::AirMoisture, [50.0, 40.0, 30.0], 35.0, 70.0, RecommendedAction::Watering),
            (SensorKind::AirMoisture, [60.0, 70.0, 80.0], 35.0, 70.0, RecommendedAction::Cooling),
        ];

        for (kind, values, min, max, expected) in cases {
            let prediction = forecast_at(
                &daily_readings(values),
                IdealRange::new(min, max),
                kind,
                "Sensor",
                fixed_now(),
            );
            assert_eq!(prediction.action, expected, "kind {:?}", kind);
        }
    }

    /// The current value is the latest raw reading, not today's mean.
    #[test]
    fn test_current_value_is_latest_reading() {
        let readings = vec![
            reading(48, 10.0),
            reading(24, 12.0),
            reading(6, 10.0),
            reading(0, 18.0),
        ];
        let range = IdealRange::new(5.0, 50.0);

        let prediction = forecast_at(
            &readings,
            range,
            SensorKind::GroundMoisture,
            "Ground moisture",
            fixed_now(),
        );

        assert_eq!(prediction.current_value, 18.0);
        // Today's mean is (10 + 18) / 2 = 14 and only drives the trend.
        assert_eq!(prediction.trend.values[2], 14.0);
    }

    /// Identical inputs with the same clock produce identical output.
    #[test]
    fn test_forecast_is_deterministic() {
        let readings = daily_readings([10.0, 12.0, 14.0]);
        let range = IdealRange::new(5.0, 15.5);

        let first = forecast_at(&readings, range, SensorKind::GroundMoisture, "G", fixed_now());
        let second = forecast_at(&readings, range, SensorKind::GroundMoisture, "G", fixed_now());

        assert_eq!(first, second);
        assert_eq!(first.readable_text, second.readable_text);
    }

    /// Quality classification over representative window shapes.
    #[test]
    fn test_data_quality_classes() {
        let range = IdealRange::new(0.0, 100.0);

        // All three days covered.
        let good = forecast_at(
            &daily_readings([10.0, 12.0, 14.0]),
            range,
            SensorKind::GroundMoisture,
            "G",
            fixed_now(),
        );
        assert_ne!(good.status, PredictionStatus::NoData);

        // One day, five readings: usable but partial.
        let one_day_many: Vec<Reading> =
            (0..5).map(|i| reading(i, 20.0 + i as f64)).collect();
        let partial = forecast_at(
            &one_day_many,
            range,
            SensorKind::GroundMoisture,
            "G",
            fixed_now(),
        );
        assert_ne!(partial.status, PredictionStatus::NoData);

        // One day, two readings: insufficient.
        let sparse = vec![reading(1, 20.0), reading(0, 21.0)];
        let no_data = forecast_at(&sparse, range, SensorKind::GroundMoisture, "G", fixed_now());
        assert_eq!(no_data.status, PredictionStatus::NoData);
    }

    /// Status and quality wire names match the public API contract.
    #[test]
    fn test_wire_serialization_names() {
        assert_eq!(
            serde_json::to_string(&PredictionStatus::NoReach).unwrap(),
            "\"no_reach\""
        );
        assert_eq!(
            serde_json::to_string(&RecommendedAction::ReduceWatering).unwrap(),
            "\"reduceWatering\""
        );
        assert_eq!(
            serde_json::to_string(&DataQuality::Insufficient).unwrap(),
            "\"insufficient\""
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for finite sensor values in a plausible physical range.
    fn value_strategy() -> impl Strategy<Value = f64> {
        -50.0..150.0f64
    }

    /// Strategy for readings spread over the trailing window.
    fn readings_strategy() -> impl Strategy<Value = Vec<Reading>> {
        prop::collection::vec((0i64..72, value_strategy()), 0..30).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(hours_ago, value)| reading(hours_ago, value))
                .collect()
        })
    }

    /// Strategy for a valid ideal range (min <= max).
    fn range_strategy() -> impl Strategy<Value = IdealRange> {
        (value_strategy(), 0.0..80.0f64).prop_map(|(min, width)| IdealRange::new(min, min + width))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The engine is total: every input maps to a defined prediction.
        #[test]
        fn prop_forecast_is_total(
            readings in readings_strategy(),
            range in range_strategy()
        ) {
            let prediction = forecast_at(
                &readings,
                range,
                SensorKind::GroundMoisture,
                "Ground moisture",
                fixed_now(),
            );

            prop_assert!(prediction.action_in_hours.is_finite());
            prop_assert!(!prediction.readable_text.is_empty());
        }

        /// Action timing is never negative and never schedules in the past.
        #[test]
        fn prop_action_timing_non_negative(
            readings in readings_strategy(),
            range in range_strategy()
        ) {
            let prediction = forecast_at(
                &readings,
                range,
                SensorKind::Temperature,
                "Temperature",
                fixed_now(),
            );

            prop_assert!(prediction.action_in_hours >= 0.0);
            if let Some(action_time) = prediction.action_time {
                prop_assert!(action_time >= fixed_now());
            }
        }

        /// A scheduled action always carries a future action time and a
        /// positive time to threshold.
        #[test]
        fn prop_scheduled_has_future_action_time(
            readings in readings_strategy(),
            range in range_strategy()
        ) {
            let prediction = forecast_at(
                &readings,
                range,
                SensorKind::AirMoisture,
                "Air moisture",
                fixed_now(),
            );

            if prediction.status == PredictionStatus::Scheduled {
                prop_assert!(prediction.action_time.unwrap() > fixed_now());
                prop_assert!(prediction.hours_to_threshold.unwrap() > 0.0);
                prop_assert!(prediction.action != RecommendedAction::None);
            }
        }

        /// An out-of-range current value never yields a scheduled or
        /// no-reach status.
        #[test]
        fn prop_out_of_range_never_scheduled(
            readings in readings_strategy(),
            range in range_strategy()
        ) {
            let prediction = forecast_at(
                &readings,
                range,
                SensorKind::GroundMoisture,
                "Ground moisture",
                fixed_now(),
            );

            if prediction.status != PredictionStatus::NoData
                && !range.contains(prediction.current_value)
            {
                prop_assert_eq!(prediction.status, PredictionStatus::Immediate);
            }
        }

        /// The trend always carries exactly three daily values once there is
        /// enough data to analyze.
        #[test]
        fn prop_trend_has_three_days(
            readings in readings_strategy(),
            range in range_strategy()
        ) {
            let prediction = forecast_at(
                &readings,
                range,
                SensorKind::Temperature,
                "Temperature",
                fixed_now(),
            );

            if prediction.status == PredictionStatus::NoData {
                prop_assert!(prediction.trend.values.is_empty());
            } else {
                prop_assert_eq!(prediction.trend.values.len(), 3);
            }
        }
    }
}
