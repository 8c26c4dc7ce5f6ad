//! Weather alerts raised when the assessed risk reaches a threshold.
//!
//! Only builds the alert content; delivering it is up to the caller.

use serde::Serialize;

use crate::risk::{RiskAssessment, RiskLevel};

pub const ALERT_TITLE: &str = "Weather Alert";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherAlert {
    pub title: &'static str,
    pub body: String,
    pub level: RiskLevel,
}

/// Returns an alert when `assessment.level >= threshold`.
pub fn weather_alert(assessment: &RiskAssessment, threshold: RiskLevel) -> Option<WeatherAlert> {
    if assessment.level < threshold {
        return None;
    }

    Some(WeatherAlert {
        title: ALERT_TITLE,
        body: format!(
            "Weather conditions could be a trigger for you today. Risk {}. {}",
            assessment.level, assessment.advisory
        ),
        level: assessment.level,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::risk::assess_risk;
    use crate::types::WeatherReading;
    use chrono::Utc;

    #[test]
    fn test_alert_at_threshold() {
        // 2 + 2 + 0 + 0 = 4
        let assessment = assess_risk(&WeatherReading::new(28.0, 9, 50, 1015, "Lugano", Utc::now()));
        assert_eq!(assessment.level, RiskLevel::High);

        let alert = weather_alert(&assessment, RiskLevel::High).unwrap();
        assert_eq!(alert.title, "Weather Alert");
        assert_eq!(alert.level, RiskLevel::High);
        assert!(alert.body.contains("4/5"));
        assert!(alert.body.contains(RiskLevel::High.advisory()));
    }

    #[test]
    fn test_no_alert_below_threshold() {
        let assessment = assess_risk(&WeatherReading::new(15.0, 2, 50, 1015, "Lugano", Utc::now()));
        assert!(weather_alert(&assessment, RiskLevel::High).is_none());
    }

    #[test]
    fn test_zero_threshold_always_alerts() {
        let assessment = assess_risk(&WeatherReading::new(15.0, 2, 50, 1015, "Lugano", Utc::now()));
        assert!(weather_alert(&assessment, RiskLevel::VeryLow).is_some());
    }
}
