//! Persistent geocode cache stored as a JSON object.

use ogc_core::{cache::GeocodeCache, entities as e};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fs, io::ErrorKind, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    CacheKey(#[from] e::CacheKeyParseError),
    #[error("Unknown geocode source '{0}'")]
    GeocodeSource(String),
}

#[rustfmt::skip]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default, deserialize_with = "text")]
    pub latitude        : String,
    #[serde(default, deserialize_with = "text")]
    pub longitude       : String,
    pub geocode_source  : String,
    pub geocode_input   : Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub matched_address : String,
    #[serde(default, deserialize_with = "text")]
    pub match_type      : String,
}

/// Older cache files may contain numbers or `null` instead of strings.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

impl From<&e::GeocodeResult> for GeocodeResult {
    fn from(from: &e::GeocodeResult) -> Self {
        let e::GeocodeResult {
            latitude,
            longitude,
            source,
            input,
            matched_address,
            match_type,
        } = from;
        Self {
            latitude: latitude.clone(),
            longitude: longitude.clone(),
            geocode_source: source.to_string(),
            geocode_input: Some(input.clone()),
            matched_address: matched_address.clone(),
            match_type: match_type.clone(),
        }
    }
}

impl GeocodeResult {
    fn try_into_entity(self, key: &e::CacheKey) -> Result<e::GeocodeResult, Error> {
        let Self {
            latitude,
            longitude,
            geocode_source,
            geocode_input,
            matched_address,
            match_type,
        } = self;
        let source = geocode_source
            .parse()
            .map_err(|_| Error::GeocodeSource(geocode_source))?;
        Ok(e::GeocodeResult {
            latitude,
            longitude,
            source,
            input: geocode_input.unwrap_or_else(|| key.query.clone()),
            matched_address,
            match_type,
        })
    }
}

/// Loads the cache or returns an empty one if the file does not exist.
pub fn load_cache(path: &Path) -> Result<GeocodeCache, Error> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::info!("No geocode cache found at {}", path.display());
            return Ok(GeocodeCache::new());
        }
        Err(err) => return Err(err.into()),
    };
    let entries: BTreeMap<String, GeocodeResult> = serde_json::from_str(&json)?;
    let cache = entries
        .into_iter()
        .map(|(key, result)| -> Result<_, Error> {
            let key: e::CacheKey = key.parse()?;
            let result = result.try_into_entity(&key)?;
            Ok((key, result))
        })
        .collect::<Result<GeocodeCache, Error>>()?;
    log::info!(
        "Loaded {} cached results from {}",
        cache.len(),
        path.display()
    );
    Ok(cache)
}

/// Overwrites the cache file with all entries.
pub fn persist_cache(path: &Path, cache: &GeocodeCache) -> Result<(), Error> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let entries: BTreeMap<String, GeocodeResult> = cache
        .iter()
        .map(|(key, result)| (key.to_string(), result.into()))
        .collect();
    let json = serde_json::to_string_pretty(&entries)?;
    fs::write(path, json)?;
    log::info!("Saved {} cached results to {}", cache.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogc_core::entities::{CacheKey, GeocodeSource, Match, ProviderId};
    use pretty_assertions::assert_eq;

    fn sample_cache() -> GeocodeCache {
        [
            (
                CacheKey::new(ProviderId::Census, "100 Main St"),
                e::GeocodeResult::resolved(
                    ProviderId::Census,
                    "100 Main St",
                    Match {
                        latitude: "34.0".into(),
                        longitude: "-118.0".into(),
                        matched_address: "100 MAIN ST, LOS ANGELES, CA".into(),
                        match_type: "L".into(),
                    },
                ),
            ),
            (
                CacheKey::new(ProviderId::Geocodio, "a::b"),
                e::GeocodeResult::no_match(ProviderId::Geocodio, "a::b"),
            ),
            (
                CacheKey::new(ProviderId::Geocodio, "Zürich, ÄÖ"),
                e::GeocodeResult::lookup_error(ProviderId::Geocodio, "Zürich, ÄÖ"),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn missing_file_is_an_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = load_cache(&dir.path().join("cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let cache = sample_cache();
        persist_cache(&path, &cache).unwrap();
        assert_eq!(load_cache(&path).unwrap(), cache);
    }

    #[test]
    fn persist_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        persist_cache(&path, &sample_cache()).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        let reloaded = load_cache(&path).unwrap();
        persist_cache(&path, &reloaded).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
        assert!(first.starts_with("{\n  \"census::100 Main St\": {\n    \"latitude\": \"34.0\""));
    }

    #[test]
    fn load_legacy_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode_cache.json");
        let json = r#"{
          "geocodio::Austin, TX": {
            "latitude": "30.26715",
            "longitude": "-97.74306",
            "geocode_source": "geocodio",
            "geocode_input": "Austin, TX",
            "matched_address": "Austin, TX",
            "match_type": "1"
          },
          "geocodio::Dallas, TX": {
            "latitude": 32.7767,
            "longitude": -96.797,
            "geocode_source": "geocodio",
            "geocode_input": "Dallas, TX",
            "matched_address": "Dallas, TX",
            "match_type": 0.8
          },
          "geocodio::Waco, TX": {
            "latitude": "31.5493",
            "longitude": "-97.1467",
            "geocode_source": "geocodio",
            "geocode_input": "Waco, TX",
            "matched_address": null,
            "match_type": 1
          },
          "geocodio::": {
            "latitude": "",
            "longitude": "",
            "geocode_source": "missing_query",
            "geocode_input": "",
            "matched_address": "",
            "match_type": ""
          },
          "census::WA": { "geocode_source": "census_no_match" }
        }"#;
        fs::write(&path, json).unwrap();
        let cache = load_cache(&path).unwrap();
        assert_eq!(cache.len(), 4);
        let dallas = cache
            .get(&CacheKey::new(ProviderId::Geocodio, "Dallas, TX"))
            .unwrap();
        assert_eq!(dallas.latitude, "32.7767");
        assert_eq!(dallas.longitude, "-96.797");
        assert_eq!(dallas.match_type, "0.8");
        let waco = cache
            .get(&CacheKey::new(ProviderId::Geocodio, "Waco, TX"))
            .unwrap();
        assert_eq!(waco.match_type, "1");
        assert_eq!(waco.matched_address, "");
        let austin = cache
            .get(&CacheKey::new(ProviderId::Geocodio, "Austin, TX"))
            .unwrap();
        assert_eq!(austin.source, GeocodeSource::Geocodio);
        assert!(austin.is_located());
        assert_eq!(
            cache.get(&CacheKey::new(ProviderId::Census, "WA")),
            Some(&e::GeocodeResult::no_match(ProviderId::Census, "WA"))
        );
    }

    #[test]
    fn reject_invalid_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"osm::WA": {"geocode_source": "census"}}"#).unwrap();
        assert!(matches!(load_cache(&path), Err(Error::CacheKey(_))));
        fs::write(&path, r#"{"census::WA": {"geocode_source": "osm"}}"#).unwrap();
        assert!(matches!(load_cache(&path), Err(Error::GeocodeSource(_))));
        fs::write(&path, "[]").unwrap();
        assert!(matches!(load_cache(&path), Err(Error::Json(_))));
    }
}
