//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a sensor measures.
///
/// Wire names match the device vocabulary (`groundMoisture` etc.). Only the
/// temperature and moisture kinds feed the forecast engine; the others are
/// recorded and displayed but never forecast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SensorKind {
    Temperature,
    AirMoisture,
    GroundMoisture,
    Pressure,
    Light,
    Ph,
}

impl SensorKind {
    /// All kinds a device may register as.
    pub const ALL: [SensorKind; 6] = [
        SensorKind::Temperature,
        SensorKind::AirMoisture,
        SensorKind::GroundMoisture,
        SensorKind::Pressure,
        SensorKind::Light,
        SensorKind::Ph,
    ];

    /// Kinds the forecast engine knows how to act on.
    pub fn is_forecastable(&self) -> bool {
        matches!(
            self,
            SensorKind::Temperature | SensorKind::AirMoisture | SensorKind::GroundMoisture
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::AirMoisture => "airMoisture",
            SensorKind::GroundMoisture => "groundMoisture",
            SensorKind::Pressure => "pressure",
            SensorKind::Light => "light",
            SensorKind::Ph => "ph",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = UnknownSensorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(SensorKind::Temperature),
            "airMoisture" => Ok(SensorKind::AirMoisture),
            "groundMoisture" => Ok(SensorKind::GroundMoisture),
            "pressure" => Ok(SensorKind::Pressure),
            "light" => Ok(SensorKind::Light),
            "ph" => Ok(SensorKind::Ph),
            other => Err(UnknownSensorKind(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized sensor kind string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown sensor kind: {0}")]
pub struct UnknownSensorKind(pub String);

/// Closed interval `[min, max]` considered healthy for a sensor kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IdealRange {
    pub min: f64,
    pub max: f64,
}

impl IdealRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Boundary-inclusive membership check.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-species ideal conditions for the three forecastable sensor kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdealConditions {
    pub temperature: IdealRange,
    pub air_moisture: IdealRange,
    pub ground_moisture: IdealRange,
}

impl IdealConditions {
    /// Ideal range for a sensor kind, `None` for kinds without configured
    /// conditions (those sensors are skipped by the prediction fan-out).
    pub fn range_for(&self, kind: SensorKind) -> Option<IdealRange> {
        match kind {
            SensorKind::Temperature => Some(self.temperature),
            SensorKind::AirMoisture => Some(self.air_moisture),
            SensorKind::GroundMoisture => Some(self.ground_moisture),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_kind_round_trips_through_str() {
        for kind in SensorKind::ALL {
            assert_eq!(kind.as_str().parse::<SensorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn sensor_kind_unknown_is_rejected() {
        assert!("soilPh".parse::<SensorKind>().is_err());
    }

    #[test]
    fn forecastable_kinds() {
        assert!(SensorKind::Temperature.is_forecastable());
        assert!(SensorKind::AirMoisture.is_forecastable());
        assert!(SensorKind::GroundMoisture.is_forecastable());
        assert!(!SensorKind::Pressure.is_forecastable());
        assert!(!SensorKind::Light.is_forecastable());
        assert!(!SensorKind::Ph.is_forecastable());
    }

    #[test]
    fn range_contains_is_boundary_inclusive() {
        let range = IdealRange::new(10.0, 20.0);
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(range.contains(15.0));
        assert!(!range.contains(9.999));
        assert!(!range.contains(20.001));
    }

    #[test]
    fn conditions_lookup_by_kind() {
        let conditions = IdealConditions {
            temperature: IdealRange::new(18.0, 26.0),
            air_moisture: IdealRange::new(40.0, 60.0),
            ground_moisture: IdealRange::new(30.0, 70.0),
        };
        assert_eq!(
            conditions.range_for(SensorKind::Temperature),
            Some(IdealRange::new(18.0, 26.0))
        );
        assert_eq!(conditions.range_for(SensorKind::Light), None);
    }
}
