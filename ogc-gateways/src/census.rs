//! U.S. Census Bureau one-line address geocoder.

use ogc_core::{
    entities::{Match, ProviderId},
    gateways::geocode::GeocodingGateway,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{http, Error};

pub const DEFAULT_API_URL: &str =
    "https://geocoding.geo.census.gov/geocoder/locations/onelineaddress";
pub const DEFAULT_BENCHMARK: &str = "Public_AR_Current";

#[derive(Debug, Clone)]
pub struct Census {
    client: Client,
    api_url: String,
    benchmark: String,
}

impl Census {
    pub fn try_new(api_url: String, benchmark: String, timeout: Duration) -> Result<Self, Error> {
        let client = http::client(timeout)?;
        Ok(Self {
            client,
            api_url,
            benchmark,
        })
    }

    fn lookup(&self, query: &str) -> Result<Option<Match>, Error> {
        let params = [
            ("address", query),
            ("benchmark", self.benchmark.as_str()),
            ("format", "json"),
        ];
        let response: Response = http::get_json(&self.client, &self.api_url, &params)?;
        Ok(response.into_first_match())
    }
}

impl GeocodingGateway for Census {
    fn provider(&self) -> ProviderId {
        ProviderId::Census
    }

    fn forward(&self, query: &str) -> anyhow::Result<Option<Match>> {
        Ok(self.lookup(query)?)
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    result: ResultSet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSet {
    address_matches: Vec<AddressMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressMatch {
    #[serde(default)]
    matched_address: String,
    coordinates: Coordinates,
    #[serde(default)]
    tiger_line: TigerLine,
}

/// `x` is the longitude and `y` the latitude.
#[derive(Debug, Deserialize)]
struct Coordinates {
    x: serde_json::Number,
    y: serde_json::Number,
}

#[derive(Debug, Default, Deserialize)]
struct TigerLine {
    #[serde(default)]
    side: String,
}

impl Response {
    fn into_first_match(self) -> Option<Match> {
        let AddressMatch {
            matched_address,
            coordinates,
            tiger_line,
        } = self.result.address_matches.into_iter().next()?;
        Some(Match {
            latitude: coordinates.y.to_string(),
            longitude: coordinates.x.to_string(),
            matched_address,
            match_type: tiger_line.side,
        })
    }
}
