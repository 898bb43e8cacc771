#![deny(missing_debug_implementations)]

//! # ogc-entities
//!
//! Plain domain entities of the organization geocoder.
//!
//! The entities do not perform any I/O and contain no provider specific logic.

pub mod geocode;
pub mod provider;
pub mod record;
