use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latitude and longitude in degrees, altitude in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BasicGeoposition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl BasicGeoposition {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Latitude within [-90, 90], longitude within [-180, 180], all finite
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.altitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geocoordinate {
    pub point: BasicGeoposition,
    /// Horizontal accuracy in meters, when the host reports one
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geoposition {
    pub coordinate: Geocoordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionChangedEventArgs {
    pub position: Geoposition,
}
