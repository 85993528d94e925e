//! Forecast and action recommendation engine
//!
//! Aggregates a plant sensor's recent readings into a daily trend, classifies
//! the current and projected value against the species' ideal range, and
//! recommends a corrective action (watering, heating, cooling, reduced
//! watering) together with its timing and a rendered explanation.
//!
//! The computation is pure and total: every input, including an empty reading
//! list, maps to a defined [`Prediction`]. The wall clock is read once per
//! call ([`forecast`]) or injected by the caller ([`forecast_at`]), which
//! keeps calendar-day bucketing and action timing internally consistent and
//! makes results reproducible in tests.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{IdealRange, SensorKind};

/// Hours subtracted from the projected time-to-threshold so the action fires
/// before the bound is actually crossed.
pub const PREVENT_MARGIN_HOURS: f64 = 1.0;

/// Margin applied (negatively) when the value is moving back toward the ideal
/// range from outside it.
pub const OVERSHOOT_MARGIN_HOURS: f64 = 1.0;

/// Trailing window of calendar days used for trend estimation.
const TREND_WINDOW_DAYS: usize = 3;

/// How far ahead (in hours) an in-range value is projected when deciding
/// whether the trend will breach a bound.
const PROJECTION_HORIZON_HOURS: f64 = 24.0;

/// Rates and deltas below this are treated as zero to avoid degenerate
/// divisions.
const RATE_EPSILON: f64 = 1e-9;

/// One timestamped sensor reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Outcome classification of a forecast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    /// Action is required now (value out of range, or margin already spent).
    Immediate,
    /// Action is recommended at `action_time`.
    Scheduled,
    /// Not enough readings in the window to analyze.
    NoData,
    /// Negligible rate of change; nothing predicted.
    NoTrend,
    /// Value in range and the trend does not project a breach within the
    /// look-ahead horizon.
    NoReach,
}

/// Corrective action recommended to the plant owner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecommendedAction {
    Watering,
    Heating,
    Cooling,
    ReduceWatering,
    None,
}

impl RecommendedAction {
    /// Human-readable label used in rendered explanations.
    pub fn label(&self) -> &'static str {
        match self {
            RecommendedAction::Watering => "watering",
            RecommendedAction::Heating => "heating",
            RecommendedAction::Cooling => "cooling",
            RecommendedAction::ReduceWatering => "reduce watering",
            RecommendedAction::None => "action",
        }
    }
}

/// How complete the trailing window was.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    /// Every day in the window had at least one reading.
    Good,
    /// Some days were estimated; predictions are lower confidence.
    Partial,
    /// Too little data to analyze at all.
    Insufficient,
}

/// Linear trend estimated from the daily aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    /// Mean of the two day-over-day deltas.
    pub avg_day_change: f64,
    /// `avg_day_change / 24`.
    pub hour_change: f64,
    /// Daily mean values, oldest first: two days ago, yesterday, today.
    pub values: Vec<f64>,
}

/// Full forecast output for one sensor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub status: PredictionStatus,
    pub action: RecommendedAction,
    /// Hours from "now" until the recommended action; 0 for immediate.
    pub action_in_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_to_threshold: Option<f64>,
    /// Value of the most recent raw reading, not a daily mean.
    pub current_value: f64,
    pub ideal_range: IdealRange,
    pub trend: Trend,
    pub readable_text: String,
}

/// Which bound of the ideal range is violated or projected to be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Min,
    Max,
}

/// Daily aggregation result over the trailing window.
struct DailyAggregation {
    /// Mean per day, oldest first. Empty when there were no readings at all.
    values: Vec<f64>,
    quality: DataQuality,
}

/// Compute a forecast using the current wall clock.
///
/// "Now" is read exactly once and held fixed for the whole computation.
pub fn forecast(
    readings: &[Reading],
    ideal_range: IdealRange,
    kind: SensorKind,
    display_name: &str,
) -> Prediction {
    forecast_at(readings, ideal_range, kind, display_name, Utc::now())
}

/// Compute a forecast against an explicit "now".
///
/// Deterministic: identical inputs and the same `now` produce a byte-identical
/// [`Prediction`], including the rendered text.
pub fn forecast_at(
    readings: &[Reading],
    ideal_range: IdealRange,
    kind: SensorKind,
    display_name: &str,
    now: DateTime<Utc>,
) -> Prediction {
    let aggregation = aggregate_daily(readings, now);

    if aggregation.quality == DataQuality::Insufficient {
        return no_data_prediction(readings, ideal_range, display_name);
    }

    let values = aggregation.values;
    let (two_days_ago, yesterday, today) = (values[0], values[1], values[2]);

    // Most recent raw reading wins for the current value; the daily means
    // only drive the trend. Stable sort by timestamp descending, first
    // element taken.
    let mut by_recency: Vec<&Reading> = readings.iter().collect();
    by_recency.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let current_value = by_recency.first().map(|r| r.value).unwrap_or(today);

    let diff1 = yesterday - two_days_ago;
    let diff2 = today - yesterday;
    let avg_day_change = (diff1 + diff2) / 2.0;
    let hour_change = avg_day_change / 24.0;

    let trend = Trend {
        avg_day_change,
        hour_change,
        values,
    };

    let in_range = ideal_range.contains(current_value);
    let target = target_bound(current_value, ideal_range, hour_change);
    let action = match target {
        Some(bound) => action_for(kind, bound),
        None => RecommendedAction::None,
    };

    let base = Prediction {
        status: PredictionStatus::NoTrend,
        action: RecommendedAction::None,
        action_in_hours: 0.0,
        action_time: None,
        hours_to_threshold: None,
        current_value,
        ideal_range,
        trend,
        readable_text: String::new(),
    };

    // Stable value: no usable rate of change.
    if hour_change.abs() < RATE_EPSILON {
        if !in_range && action != RecommendedAction::None {
            let text = format!(
                "{}: Current value is {:.2}, ideal range is {:.2} - {:.2}.\n\
                 No trend detected (stable), but value is out of range - immediate intervention required.",
                display_name, current_value, ideal_range.min, ideal_range.max
            );
            return Prediction {
                status: PredictionStatus::Immediate,
                action,
                action_time: Some(now),
                readable_text: text,
                ..base
            };
        }
        let text = format!(
            "{}: Current value is {:.2}, ideal range is {:.2} - {:.2}.\n\
             No trend detected (stable) - no predicted changes.",
            display_name, current_value, ideal_range.min, ideal_range.max
        );
        return Prediction {
            readable_text: text,
            ..base
        };
    }

    if !in_range {
        // Out of range always means immediate action, whether or not the
        // trend is improving; only the explanation differs.
        return out_of_range_prediction(base, action, hour_change, display_name, now);
    }

    let Some(bound) = target else {
        // In range, moving, but the 24-hour projection stays inside.
        let text = format!(
            "{}: Current value is {:.2}, ideal range is {:.2} - {:.2}.\n\
             Trend: {:.4} per hour. No predicted threshold reach.",
            display_name, current_value, ideal_range.min, ideal_range.max, hour_change
        );
        return Prediction {
            status: PredictionStatus::NoReach,
            readable_text: text,
            ..base
        };
    };

    // In range, trend projected to breach a bound within the horizon.
    let threshold = match bound {
        Bound::Min => ideal_range.min,
        Bound::Max => ideal_range.max,
    };
    let delta = (threshold - current_value).abs();
    let margin_hours = margin_for(bound, hour_change);

    let hours_left = if delta > RATE_EPSILON && hour_change.abs() > RATE_EPSILON {
        (delta / hour_change).abs()
    } else {
        0.0
    };
    let action_in_hours = (hours_left - margin_hours).max(0.0);

    let (status, action_time) = if action_in_hours <= 0.0 {
        (PredictionStatus::Immediate, now)
    } else {
        (
            PredictionStatus::Scheduled,
            now + Duration::milliseconds((action_in_hours * 3_600_000.0).round() as i64),
        )
    };

    let text = render_report(
        display_name,
        aggregation.quality,
        &base.trend,
        current_value,
        ideal_range,
        bound,
        hours_left,
        status,
        action,
        action_in_hours,
    );

    Prediction {
        status,
        action,
        action_in_hours,
        action_time: Some(action_time),
        hours_to_threshold: Some(hours_left),
        readable_text: text,
        ..base
    }
}

/// Degraded result when the window holds too little data to analyze.
fn no_data_prediction(
    readings: &[Reading],
    ideal_range: IdealRange,
    display_name: &str,
) -> Prediction {
    // Chronologically last reading; later input entries win timestamp ties.
    let current_value = readings
        .iter()
        .reduce(|best, r| if r.timestamp >= best.timestamp { r } else { best })
        .map(|r| r.value)
        .unwrap_or(0.0);

    let text = format!(
        "Insufficient data for analysis of {}. Need at least some sensor readings from the last {} days.",
        display_name, TREND_WINDOW_DAYS
    );

    Prediction {
        status: PredictionStatus::NoData,
        action: RecommendedAction::None,
        action_in_hours: 0.0,
        action_time: None,
        hours_to_threshold: None,
        current_value,
        ideal_range,
        trend: Trend {
            avg_day_change: 0.0,
            hour_change: 0.0,
            values: Vec::new(),
        },
        readable_text: text,
    }
}

/// Immediate-action result for a value already outside the ideal range.
fn out_of_range_prediction(
    base: Prediction,
    action: RecommendedAction,
    hour_change: f64,
    display_name: &str,
    now: DateTime<Utc>,
) -> Prediction {
    let below = base.current_value < base.ideal_range.min;
    let improving = if below {
        hour_change > 0.0
    } else {
        hour_change < 0.0
    };

    let position = if below {
        "Value is below ideal range."
    } else {
        "Value is above ideal range."
    };
    let trend_note = if improving {
        "Trend is improving, but immediate action is still required to bring value into range faster."
    } else {
        "Trend is moving away from ideal range."
    };

    let text = format!(
        "{}: Current value is {:.2}, ideal range is {:.2} - {:.2}.\n{} {}\nAction '{}' required immediately.",
        display_name,
        base.current_value,
        base.ideal_range.min,
        base.ideal_range.max,
        position,
        trend_note,
        action.label()
    );

    Prediction {
        status: PredictionStatus::Immediate,
        action,
        action_time: Some(now),
        readable_text: text,
        ..base
    }
}

/// Which bound the value has violated or, if in range, is projected to
/// violate within [`PROJECTION_HORIZON_HOURS`].
fn target_bound(current_value: f64, range: IdealRange, hour_change: f64) -> Option<Bound> {
    if range.contains(current_value) {
        let projected = current_value + hour_change * PROJECTION_HORIZON_HOURS;
        if hour_change < 0.0 && projected < range.min {
            Some(Bound::Min)
        } else if hour_change > 0.0 && projected > range.max {
            Some(Bound::Max)
        } else {
            None
        }
    } else if current_value < range.min {
        Some(Bound::Min)
    } else {
        Some(Bound::Max)
    }
}

/// Corrective action per sensor kind and targeted bound.
///
/// Non-forecastable kinds map to `None`; callers are expected to have
/// filtered them out before invoking the engine.
fn action_for(kind: SensorKind, bound: Bound) -> RecommendedAction {
    match (kind, bound) {
        (SensorKind::GroundMoisture, Bound::Min) => RecommendedAction::Watering,
        (SensorKind::GroundMoisture, Bound::Max) => RecommendedAction::ReduceWatering,
        (SensorKind::Temperature, Bound::Min) => RecommendedAction::Heating,
        (SensorKind::Temperature, Bound::Max) => RecommendedAction::Cooling,
        (SensorKind::AirMoisture, Bound::Min) => RecommendedAction::Watering,
        (SensorKind::AirMoisture, Bound::Max) => RecommendedAction::Cooling,
        _ => RecommendedAction::None,
    }
}

/// Margin to subtract from the projected time-to-threshold.
///
/// The overshoot arms (moving back toward range from outside it) cannot be
/// combined with an in-range current value, and the out-of-range path never
/// reaches this function, so they are unreachable for valid inputs. Kept for
/// robustness against inconsistent inputs.
fn margin_for(bound: Bound, hour_change: f64) -> f64 {
    match bound {
        Bound::Max if hour_change < 0.0 => -OVERSHOOT_MARGIN_HOURS,
        Bound::Min if hour_change > 0.0 => -OVERSHOOT_MARGIN_HOURS,
        _ => PREVENT_MARGIN_HOURS,
    }
}

/// Aggregate raw readings into per-day means over the trailing window.
///
/// Days without readings are estimated: mean of the nearest earlier and later
/// day means when both exist, otherwise the one that exists is carried over,
/// otherwise the previously emitted value, otherwise the mean of every raw
/// reading supplied.
fn aggregate_daily(readings: &[Reading], now: DateTime<Utc>) -> DailyAggregation {
    if readings.is_empty() {
        return DailyAggregation {
            values: Vec::new(),
            quality: DataQuality::Insufficient,
        };
    }

    let today = now.date_naive();

    // Bucket sums/counts indexed by days-back from today (0 = today).
    let mut sums = [0.0_f64; TREND_WINDOW_DAYS];
    let mut counts = [0_usize; TREND_WINDOW_DAYS];
    for reading in readings {
        let days_back = (today - reading.timestamp.date_naive()).num_days();
        if (0..TREND_WINDOW_DAYS as i64).contains(&days_back) {
            sums[days_back as usize] += reading.value;
            counts[days_back as usize] += 1;
        }
    }

    let mean_at = |days_back: usize| -> Option<f64> {
        (counts[days_back] > 0).then(|| sums[days_back] / counts[days_back] as f64)
    };

    let mut values = Vec::with_capacity(TREND_WINDOW_DAYS);
    let mut days_with_data = 0;

    // Oldest first: days_back = 2, 1, 0.
    for days_back in (0..TREND_WINDOW_DAYS).rev() {
        if let Some(mean) = mean_at(days_back) {
            days_with_data += 1;
            values.push(mean);
            continue;
        }

        // Nearest earlier day with data (further back in time).
        let before = (days_back + 1..TREND_WINDOW_DAYS).find_map(|d| mean_at(d));
        // Nearest later day with data (closer to today).
        let after = (0..days_back).rev().find_map(|d| mean_at(d));

        let estimated = match (before, after) {
            (Some(b), Some(a)) => (b + a) / 2.0,
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => values.last().copied().unwrap_or_else(|| {
                readings.iter().map(|r| r.value).sum::<f64>() / readings.len() as f64
            }),
        };
        values.push(estimated);
    }

    let quality = if days_with_data >= TREND_WINDOW_DAYS {
        DataQuality::Good
    } else if days_with_data >= 2 || (days_with_data >= 1 && readings.len() >= 5) {
        DataQuality::Partial
    } else {
        DataQuality::Insufficient
    };

    DailyAggregation { values, quality }
}

/// Render the full multi-line report for the projected-breach path.
#[allow(clippy::too_many_arguments)]
fn render_report(
    display_name: &str,
    quality: DataQuality,
    trend: &Trend,
    current_value: f64,
    range: IdealRange,
    bound: Bound,
    hours_left: f64,
    status: PredictionStatus,
    action: RecommendedAction,
    action_in_hours: f64,
) -> String {
    let mut lines = Vec::new();
    lines.push(format!("{}:", display_name));

    if quality == DataQuality::Partial {
        lines.push(
            "Note: Limited historical data available. Some values were estimated.".to_string(),
        );
    }

    lines.push(format!(
        "Recent daily averages (2 days ago, yesterday, today): {:.2}, {:.2}, {:.2}",
        trend.values[0], trend.values[1], trend.values[2]
    ));
    lines.push(format!("Current reading: {:.2}", current_value));
    lines.push(format!("Ideal range: {:.2} - {:.2}", range.min, range.max));
    lines.push(format!("Average daily change: {:.3}", trend.avg_day_change));
    lines.push(format!("Average hourly rate: {:.4}", trend.hour_change));
    lines.push(String::new());

    if hours_left > RATE_EPSILON {
        let threshold_label = match bound {
            Bound::Min => format!("minimum ({:.2})", range.min),
            Bound::Max => format!("maximum ({:.2})", range.max),
        };
        lines.push(format!(
            "Expected to reach {} in {:.2} hours.",
            threshold_label, hours_left
        ));
    }

    match status {
        PredictionStatus::Immediate => lines.push(format!(
            "RECOMMENDATION: Perform '{}' action NOW.",
            action.label()
        )),
        PredictionStatus::Scheduled => lines.push(format!(
            "RECOMMENDATION: Schedule '{}' action in {:.2} hours.",
            action.label(),
            action_in_hours
        )),
        _ => lines.push("Current value is in ideal range, trend is favorable/stable.".to_string()),
    }

    lines.join("\n")
}
