use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// `lat,lon`, the form accepted by the search box.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid position {0}: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidPosition(Position),
}

/// Source of the device's current position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Position, GeoError>;
}

/// Reports a position known up front (command-line flags or config).
#[derive(Debug, Clone)]
pub struct FixedLocator {
    position: Position,
}

impl FixedLocator {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedLocator {
    async fn current_position(&self) -> Result<Position, GeoError> {
        if !self.position.is_valid() {
            return Err(GeoError::InvalidPosition(self.position));
        }
        Ok(self.position)
    }
}
