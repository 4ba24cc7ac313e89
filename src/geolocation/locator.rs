use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Mutex;
use tokio::sync::broadcast;

use crate::error::GeolocationError;
use crate::geolocation::position::{
    BasicGeoposition, Geocoordinate, Geoposition, PositionChangedEventArgs,
};
use crate::geolocation::status::{PositionStatus, StatusChangedEventArgs};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocatorEvent {
    PositionChanged(PositionChangedEventArgs),
    StatusChanged(StatusChangedEventArgs),
}

/// Fan-out point between a host location provider and its listeners.
///
/// The host backend calls the `report_*` methods; listeners hold receivers from
/// [`Geolocator::subscribe`]. A slow listener that falls more than the channel
/// capacity behind loses the oldest events.
#[derive(Debug)]
pub struct Geolocator {
    sender: broadcast::Sender<GeolocatorEvent>,
    status: Mutex<PositionStatus>,
    last_position: Mutex<Option<Geoposition>>,
}

impl Geolocator {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sender,
            status: Mutex::new(PositionStatus::NotInitialized),
            last_position: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GeolocatorEvent> {
        self.sender.subscribe()
    }

    pub fn status(&self) -> PositionStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn last_position(&self) -> Option<Geoposition> {
        *self.last_position.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a status from the host; listeners only hear about actual changes
    pub fn report_status(&self, status: PositionStatus) -> bool {
        {
            let mut current = self.status.lock().unwrap_or_else(|e| e.into_inner());
            if *current == status {
                return false;
            }
            info!("Geolocator status {} -> {}", *current, status);
            *current = status;
        }
        self.publish(GeolocatorEvent::StatusChanged(StatusChangedEventArgs {
            status,
        }));
        true
    }

    /// Record a position fix from the host
    pub fn report_position(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        accuracy: Option<f64>,
    ) -> Result<Geoposition, GeolocationError> {
        let point = BasicGeoposition::new(latitude, longitude, altitude);
        if !point.is_valid() {
            warn!(
                "Rejected position outside valid range: {}, {}",
                latitude, longitude
            );
            return Err(GeolocationError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        let position = Geoposition {
            coordinate: Geocoordinate {
                point,
                accuracy,
                timestamp: Utc::now(),
            },
        };
        *self.last_position.lock().unwrap_or_else(|e| e.into_inner()) = Some(position);
        self.publish(GeolocatorEvent::PositionChanged(PositionChangedEventArgs {
            position,
        }));
        Ok(position)
    }

    fn publish(&self, event: GeolocatorEvent) {
        if self.sender.send(event).is_err() {
            debug!("No geolocation listeners for {:?}", event);
        }
    }
}

impl Default for Geolocator {
    fn default() -> Self {
        Self::new()
    }
}
