mod geocode_records;
mod resolve;

#[cfg(test)]
pub mod tests;

pub use self::{geocode_records::*, resolve::*};

mod prelude {
    pub use crate::{
        cache::GeocodeCache,
        entities::*,
        gateways::{geocode::GeocodingGateway, progress::ProgressReporter},
    };
}
