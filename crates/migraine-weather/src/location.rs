//! Location sources for the dashboard.
//!
//! Platform geolocation lives outside this crate and plugs in through
//! [`LocationSource`]; the configured city is the built-in source.

use std::future::Future;

use migraine_core::LocationConfig;

use crate::types::{Location, LocationError};

pub trait LocationSource: Send + Sync {
    fn current_location(&self) -> impl Future<Output = Result<Location, LocationError>> + Send;
}

/// A location that never changes, usually taken from configuration
#[derive(Debug, Clone)]
pub struct FixedLocation {
    location: Location,
}

impl FixedLocation {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

impl From<&LocationConfig> for FixedLocation {
    fn from(config: &LocationConfig) -> Self {
        Self::new(Location::new(
            config.latitude,
            config.longitude,
            config.label.clone(),
        ))
    }
}

impl LocationSource for FixedLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        Ok(self.location.clone())
    }
}
