//! Geolocation
//!
//! Position and status types, plus a hub that turns raw host sensor reports
//! into normalized events for subscribers.

mod locator;
mod position;
mod status;

pub use locator::{Geolocator, GeolocatorEvent};
pub use position::{BasicGeoposition, Geocoordinate, Geoposition, PositionChangedEventArgs};
pub use status::{PositionStatus, StatusChangedEventArgs};
