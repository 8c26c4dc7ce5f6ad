//! Weather-derived migraine risk scoring.
//!
//! Four independent component scores (temperature, UV index, humidity, air
//! pressure) are summed and clamped to the 0-5 scale shown on the dashboard.
//! The component maxima add up to 7, so the scale saturates: any raw total
//! of 5 or more is reported as level 5.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::WeatherReading;

/// Migraine risk on the fixed 0-5 dashboard scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow = 0,
    Low = 1,
    Moderate = 2,
    Elevated = 3,
    High = 4,
    VeryHigh = 5,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 6] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::Elevated,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    /// Clamp a raw component total onto the scale.
    pub fn from_raw_total(total: u8) -> Self {
        match total {
            0 => RiskLevel::VeryLow,
            1 => RiskLevel::Low,
            2 => RiskLevel::Moderate,
            3 => RiskLevel::Elevated,
            4 => RiskLevel::High,
            _ => RiskLevel::VeryHigh,
        }
    }

    /// Numeric level, 0..=5
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very low",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Elevated => "Elevated",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very high",
        }
    }

    /// Pre-authored advisory shown next to the level
    pub fn advisory(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => {
                "Very low risk. Weather conditions are calm, so enjoy your day."
            }
            RiskLevel::Low => {
                "Low risk. Conditions look mostly stable. Keep up your usual routine and stay hydrated."
            }
            RiskLevel::Moderate => {
                "Moderate risk. Some weather factors are unsettled. Drink plenty of water and take regular breaks."
            }
            RiskLevel::Elevated => {
                "Today's migraine risk is slightly elevated. Try to keep your environment quiet and stay well-rested."
            }
            RiskLevel::High => {
                "High risk. Several weather triggers are active. Avoid bright light, keep plans light and have your medication at hand."
            }
            RiskLevel::VeryHigh => {
                "Very high risk. Stay in a dark, quiet room if you can and rest at the first sign of symptoms."
            }
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5 ({})", self.value(), self.label())
    }
}

/// Per-factor contributions before clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    pub temperature: u8,
    pub uv: u8,
    pub humidity: u8,
    pub pressure: u8,
}

impl ComponentScores {
    pub fn from_reading(reading: &WeatherReading) -> Self {
        Self {
            temperature: temperature_score(reading.temperature_celsius),
            uv: uv_score(reading.uv_index),
            humidity: humidity_score(reading.humidity_percent),
            pressure: pressure_score(reading.air_pressure_hpa),
        }
    }

    /// Unclamped sum, 0..=7
    pub fn raw_total(&self) -> u8 {
        self.temperature + self.uv + self.humidity + self.pressure
    }
}

/// Result of scoring one reading. Recomputed on every call, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub advisory: &'static str,
    pub component_scores: ComponentScores,
}

impl RiskAssessment {
    /// True when the raw total exceeded the top of the scale and was clamped.
    ///
    /// A raw total of exactly 5 is not saturated.
    pub fn is_saturated(&self) -> bool {
        self.component_scores.raw_total() > RiskLevel::VeryHigh.value()
    }
}

/// `< 5` or `> 25` °C scores 2, `< 10` or `> 20` °C scores 1.
pub fn temperature_score(celsius: f64) -> u8 {
    if celsius < 5.0 || celsius > 25.0 {
        2
    } else if celsius < 10.0 || celsius > 20.0 {
        1
    } else {
        0
    }
}

/// UV 8+ scores 2, UV 6-7 scores 1.
pub fn uv_score(uv_index: u32) -> u8 {
    if uv_index >= 8 {
        2
    } else if uv_index >= 6 {
        1
    } else {
        0
    }
}

/// Humidity `< 30` or `> 80` percent scores 1.
pub fn humidity_score(humidity_percent: u8) -> u8 {
    if humidity_percent < 30 || humidity_percent > 80 {
        1
    } else {
        0
    }
}

/// `< 1005` or `> 1025` hPa scores 2, `< 1010` or `> 1020` hPa scores 1.
pub fn pressure_score(air_pressure_hpa: u32) -> u8 {
    if air_pressure_hpa < 1005 || air_pressure_hpa > 1025 {
        2
    } else if air_pressure_hpa < 1010 || air_pressure_hpa > 1020 {
        1
    } else {
        0
    }
}

/// Score a reading. Pure and total: no I/O, no shared state.
pub fn assess_risk(reading: &WeatherReading) -> RiskAssessment {
    let component_scores = ComponentScores::from_reading(reading);
    let level = RiskLevel::from_raw_total(component_scores.raw_total());

    RiskAssessment {
        level,
        advisory: level.advisory(),
        component_scores,
    }
}
