//! Weather-derived migraine risk for the migraine tracker
//!
//! Fetches current conditions from the Open-Meteo API, scores them on a
//! 0-5 risk scale and picks the advisory and tip of the day shown on the
//! dashboard.

pub mod alert;
pub mod location;
pub mod provider;
pub mod risk;
pub mod service;
pub mod tips;
pub mod types;

pub use alert::{weather_alert, WeatherAlert};
pub use location::{FixedLocation, LocationSource};
pub use provider::{ClientSettings, WeatherClient, WeatherSource};
pub use risk::{assess_risk, ComponentScores, RiskAssessment, RiskLevel};
pub use service::{get_risk_for_location, RefreshOutcome, RiskRefresher, RiskSnapshot};
pub use tips::{tip_of_the_day, tips, tips_in, Tip, TipCategory};
pub use types::*;
