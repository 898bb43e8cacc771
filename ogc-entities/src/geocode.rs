use std::{fmt, str::FromStr};

use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::provider::ProviderId;

/// Names of the result columns in the order they are appended to a row.
pub const RESULT_FIELDS: [&str; 6] = [
    "latitude",
    "longitude",
    "geocode_source",
    "geocode_input",
    "matched_address",
    "match_type",
];

/// Status tag describing where a result came from.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum GeocodeSource {
    MissingQuery,
    Census,
    CensusNoMatch,
    CensusLookupError,
    Geocodio,
    GeocodioNoMatch,
    GeocodioLookupError,
}

/// Coarse classification of a [`GeocodeSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Resolved,
    NoMatch,
    Error,
    Skipped,
}

impl GeocodeSource {
    pub const fn resolved(provider: ProviderId) -> Self {
        match provider {
            ProviderId::Census => Self::Census,
            ProviderId::Geocodio => Self::Geocodio,
        }
    }

    pub const fn no_match(provider: ProviderId) -> Self {
        match provider {
            ProviderId::Census => Self::CensusNoMatch,
            ProviderId::Geocodio => Self::GeocodioNoMatch,
        }
    }

    pub const fn lookup_error(provider: ProviderId) -> Self {
        match provider {
            ProviderId::Census => Self::CensusLookupError,
            ProviderId::Geocodio => Self::GeocodioLookupError,
        }
    }

    /// The provider that produced this tag, if any.
    pub const fn provider(self) -> Option<ProviderId> {
        match self {
            Self::MissingQuery => None,
            Self::Census | Self::CensusNoMatch | Self::CensusLookupError => {
                Some(ProviderId::Census)
            }
            Self::Geocodio | Self::GeocodioNoMatch | Self::GeocodioLookupError => {
                Some(ProviderId::Geocodio)
            }
        }
    }

    pub const fn outcome(self) -> Outcome {
        match self {
            Self::MissingQuery => Outcome::Skipped,
            Self::Census | Self::Geocodio => Outcome::Resolved,
            Self::CensusNoMatch | Self::GeocodioNoMatch => Outcome::NoMatch,
            Self::CensusLookupError | Self::GeocodioLookupError => Outcome::Error,
        }
    }
}

/// The first candidate a provider returned for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    /// Decimal degrees as reported by the provider.
    pub latitude: String,
    /// Decimal degrees as reported by the provider.
    pub longitude: String,
    pub matched_address: String,
    pub match_type: String,
}

/// The normalized result of a geocoding attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeResult {
    pub latitude: String,
    pub longitude: String,
    pub source: GeocodeSource,
    /// The query that was sent (empty for [`GeocodeSource::MissingQuery`]).
    pub input: String,
    pub matched_address: String,
    pub match_type: String,
}

impl GeocodeResult {
    fn without_location(source: GeocodeSource, input: String) -> Self {
        Self {
            latitude: String::new(),
            longitude: String::new(),
            source,
            input,
            matched_address: String::new(),
            match_type: String::new(),
        }
    }

    pub fn missing_query() -> Self {
        Self::without_location(GeocodeSource::MissingQuery, String::new())
    }

    pub fn no_match(provider: ProviderId, query: impl Into<String>) -> Self {
        Self::without_location(GeocodeSource::no_match(provider), query.into())
    }

    pub fn lookup_error(provider: ProviderId, query: impl Into<String>) -> Self {
        Self::without_location(GeocodeSource::lookup_error(provider), query.into())
    }

    pub fn resolved(provider: ProviderId, query: impl Into<String>, found: Match) -> Self {
        let Match {
            latitude,
            longitude,
            matched_address,
            match_type,
        } = found;
        Self {
            latitude,
            longitude,
            source: GeocodeSource::resolved(provider),
            input: query.into(),
            matched_address,
            match_type,
        }
    }

    /// A row counts as geocoded if both coordinates are present.
    pub fn is_located(&self) -> bool {
        !self.latitude.is_empty() && !self.longitude.is_empty()
    }

    pub fn outcome(&self) -> Outcome {
        self.source.outcome()
    }

    /// The result values paired with their column names, see [`RESULT_FIELDS`].
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        let [lat, lng, source, input, matched, kind] = RESULT_FIELDS;
        [
            (lat, self.latitude.as_str()),
            (lng, self.longitude.as_str()),
            (source, self.source.as_ref()),
            (input, self.input.as_str()),
            (matched, self.matched_address.as_str()),
            (kind, self.match_type.as_str()),
        ]
    }
}

/// Identifies a cached lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub provider: ProviderId,
    pub query: String,
}

impl CacheKey {
    pub const SEPARATOR: &'static str = "::";

    pub fn new(provider: ProviderId, query: impl Into<String>) -> Self {
        let query = query.into();
        Self { provider, query }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.provider, Self::SEPARATOR, self.query)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheKeyParseError {
    #[error("Missing '::' separator in cache key '{0}'")]
    MissingSeparator(String),
    #[error("Unknown provider '{0}' in cache key")]
    UnknownProvider(String),
}

impl FromStr for CacheKey {
    type Err = CacheKeyParseError;

    // Provider names never contain the separator,
    // so everything after the first one belongs to the query.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, query) = s
            .split_once(Self::SEPARATOR)
            .ok_or_else(|| CacheKeyParseError::MissingSeparator(s.to_owned()))?;
        let provider = provider
            .parse()
            .map_err(|_| CacheKeyParseError::UnknownProvider(provider.to_owned()))?;
        Ok(Self::new(provider, query))
    }
}
