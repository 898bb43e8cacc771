//! # ogc-core
//!
//! Geocoding business logic that is independent of any
//! concrete provider, file format or output device.

pub mod cache;
pub mod gateways;
pub mod query;
pub mod usecases;

pub mod entities {
    pub use ogc_entities::{geocode::*, provider::*, record::*};
}
