pub mod census;
pub mod geocodio;

mod error;
mod http;

pub use self::error::Error;

/// Sent with every request.
pub const USER_AGENT: &str = "wop-org-map-geocoder/1.0";
