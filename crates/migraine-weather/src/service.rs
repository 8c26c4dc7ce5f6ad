//! Dashboard-facing risk service.
//!
//! Keeps at most one fetch in flight per refresher: starting a new refresh
//! cancels the previous one, and a response that arrives after a newer
//! refresh started is discarded.

use parking_lot::Mutex;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::provider::WeatherSource;
use crate::risk::{assess_risk, RiskAssessment};
use crate::types::{FetchError, Location, WeatherReading};

/// Reading plus the assessment computed from it
#[derive(Debug, Clone, Serialize)]
pub struct RiskSnapshot {
    pub reading: WeatherReading,
    pub assessment: RiskAssessment,
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Completed(Result<RiskSnapshot, FetchError>),
    /// A newer refresh (or an explicit cancel) overtook this one
    Superseded,
}

/// Fetch a reading and score it.
///
/// The engine only runs on a successful fetch; errors are returned as-is.
pub async fn get_risk_for_location<S: WeatherSource>(
    source: &S,
    latitude: f64,
    longitude: f64,
    label: Option<&str>,
) -> Result<RiskAssessment, FetchError> {
    let reading = source.fetch_reading(latitude, longitude, label).await?;
    Ok(assess_risk(&reading))
}

#[derive(Debug, Default)]
struct RefreshState {
    generation: u64,
    in_flight: Option<CancellationToken>,
}

pub struct RiskRefresher<S> {
    source: S,
    state: Mutex<RefreshState>,
}

impl<S: WeatherSource> RiskRefresher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(RefreshState::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and assess the weather for `location`, cancelling any refresh
    /// still in flight.
    pub async fn refresh(&self, location: &Location) -> RefreshOutcome {
        let token = CancellationToken::new();
        let generation = {
            let mut state = self.state.lock();
            if let Some(previous) = state.in_flight.replace(token.clone()) {
                tracing::debug!("Cancelling stale weather refresh");
                previous.cancel();
            }
            state.generation += 1;
            state.generation
        };

        let result = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("Weather refresh {} cancelled", generation);
                return RefreshOutcome::Superseded;
            }
            result = self.source.fetch_reading(
                location.latitude,
                location.longitude,
                Some(location.label.as_str()),
            ) => result,
        };

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::debug!("Discarding stale weather response {}", generation);
                return RefreshOutcome::Superseded;
            }
            state.in_flight = None;
        }

        match result {
            Ok(reading) => {
                let assessment = assess_risk(&reading);
                tracing::info!(
                    "Risk for {}: {} (raw total {})",
                    reading.location,
                    assessment.level,
                    assessment.component_scores.raw_total()
                );
                RefreshOutcome::Completed(Ok(RiskSnapshot {
                    reading,
                    assessment,
                }))
            }
            Err(e) => {
                tracing::warn!("Weather refresh failed: {}", e);
                RefreshOutcome::Completed(Err(e))
            }
        }
    }

    /// Cancel the refresh in flight, if any (e.g. the view was dismissed)
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        if let Some(token) = state.in_flight.take() {
            token.cancel();
        }
    }
}
