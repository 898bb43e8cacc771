use strum::{AsRefStr, Display, EnumString};

/// The supported geocoding backends.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ProviderId {
    /// U.S. Census Bureau geocoder (no API key).
    Census,
    /// geocod.io (API key required).
    Geocodio,
}

impl ProviderId {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub const fn requires_api_key(self) -> bool {
        match self {
            Self::Census => false,
            Self::Geocodio => true,
        }
    }
}
