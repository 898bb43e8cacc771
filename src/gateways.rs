use crate::config::GeocodingGateway as Cfg;
use anyhow::Result;
use ogc_core::gateways::geocode::GeocodingGateway;
use ogc_gateways::{census::Census, geocodio::Geocodio};
use std::time::Duration;

pub fn geocoding_gateway(cfg: &Cfg, timeout: Duration) -> Result<Box<dyn GeocodingGateway>> {
    let gw: Box<dyn GeocodingGateway> = match cfg {
        Cfg::Census { api_url, benchmark } => {
            log::info!("Use Census geocoder ({api_url}, benchmark {benchmark})");
            Box::new(Census::try_new(api_url.clone(), benchmark.clone(), timeout)?)
        }
        Cfg::Geocodio { api_url, api_key } => {
            log::info!("Use geocod.io ({api_url})");
            Box::new(Geocodio::try_new(api_url.clone(), api_key.clone(), timeout)?)
        }
    };
    Ok(gw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogc_core::entities::ProviderId;

    #[test]
    fn build_selected_gateway() {
        let cfg = Cfg::Census {
            api_url: "http://localhost/census".into(),
            benchmark: "Public_AR_Current".into(),
        };
        let gw = geocoding_gateway(&cfg, Duration::from_secs(1)).unwrap();
        assert_eq!(gw.provider(), ProviderId::Census);
        let cfg = Cfg::Geocodio {
            api_url: "http://localhost/geocodio".into(),
            api_key: "secret".into(),
        };
        let gw = geocoding_gateway(&cfg, Duration::from_secs(1)).unwrap();
        assert_eq!(gw.provider(), ProviderId::Geocodio);
    }
}
