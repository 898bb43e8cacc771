//! geocod.io forward geocoding.

use ogc_core::{
    entities::{Match, ProviderId},
    gateways::geocode::GeocodingGateway,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{http, Error};

pub const DEFAULT_API_URL: &str = "https://api.geocod.io/v1.7/geocode";

#[derive(Debug, Clone)]
pub struct Geocodio {
    client: Client,
    api_url: String,
    api_key: String,
}

impl Geocodio {
    pub fn try_new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, Error> {
        let client = http::client(timeout)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    fn lookup(&self, query: &str) -> Result<Option<Match>, Error> {
        let params = [("q", query), ("api_key", self.api_key.as_str())];
        let response: Response = http::get_json(&self.client, &self.api_url, &params)?;
        Ok(response.into_first_match())
    }
}

impl GeocodingGateway for Geocodio {
    fn provider(&self) -> ProviderId {
        ProviderId::Geocodio
    }

    fn forward(&self, query: &str) -> anyhow::Result<Option<Match>> {
        Ok(self.lookup(query)?)
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
    location: Location,
    #[serde(default)]
    accuracy: Value,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: serde_json::Number,
    lng: serde_json::Number,
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl Response {
    fn into_first_match(self) -> Option<Match> {
        let GeocodeResult {
            formatted_address,
            location,
            accuracy,
        } = self.results.into_iter().next()?;
        Some(Match {
            latitude: location.lat.to_string(),
            longitude: location.lng.to_string(),
            matched_address: formatted_address,
            match_type: value_to_string(accuracy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<Option<Match>, serde_json::Error> {
        serde_json::from_str::<Response>(json).map(Response::into_first_match)
    }

    #[test]
    fn take_first_result() {
        let json = r#"{
          "input": { "formatted_address": "Austin, TX" },
          "results": [
            {
              "formatted_address": "Austin, TX",
              "location": { "lat": 30.26715, "lng": -97.74306 },
              "accuracy": 1,
              "accuracy_type": "place",
              "source": "TIGER/Line® dataset from the US Census Bureau"
            },
            {
              "formatted_address": "Austin, MN",
              "location": { "lat": 43.66, "lng": -92.97 },
              "accuracy": 0.6
            }
          ]
        }"#;
        assert_eq!(
            parse(json).unwrap(),
            Some(Match {
                latitude: "30.26715".into(),
                longitude: "-97.74306".into(),
                matched_address: "Austin, TX".into(),
                match_type: "1".into(),
            })
        );
    }

    #[test]
    fn textual_or_missing_accuracy() {
        let json = r#"{"results":[{"formatted_address":"x","location":{"lat":1.5,"lng":2.5},"accuracy":"rooftop"}]}"#;
        assert_eq!(parse(json).unwrap().unwrap().match_type, "rooftop");
        let json = r#"{"results":[{"location":{"lat":1.5,"lng":2.5}}]}"#;
        let found = parse(json).unwrap().unwrap();
        assert_eq!(found.match_type, "");
        assert_eq!(found.matched_address, "");
    }

    #[test]
    fn no_results() {
        assert_eq!(parse(r#"{"input":{},"results":[]}"#).unwrap(), None);
    }

    #[test]
    fn reject_unexpected_responses() {
        assert!(parse(r#"{"error":"Invalid API key"}"#).is_err());
        assert!(parse(r#"{"results":[{"formatted_address":"x","location":{}}]}"#).is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn unreachable_endpoint_is_an_error() {
        let gw = Geocodio::try_new(
            "http://127.0.0.1:9/v1.7/geocode".into(),
            "secret".into(),
            Duration::from_secs(2),
        )
        .unwrap();
        assert_eq!(gw.provider(), ProviderId::Geocodio);
        assert!(gw.forward("Austin, TX").is_err());
    }

    #[test]
    fn api_key_is_not_part_of_errors() {
        let gw = Geocodio::try_new(
            "http://127.0.0.1:9/v1.7/geocode".into(),
            "SUPERSECRETKEY".into(),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = gw.forward("Austin, TX").unwrap_err();
        let msg = format!("{err:#} {err:?}");
        assert!(!msg.contains("SUPERSECRETKEY"), "{msg}");
    }
}
