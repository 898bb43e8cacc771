use crate::entities::{Match, ProviderId};

pub trait GeocodingGateway {
    fn provider(&self) -> ProviderId;

    /// Looks up a non-empty query and returns the first candidate.
    ///
    /// `Ok(None)` means the provider answered but found nothing.
    fn forward(&self, query: &str) -> anyhow::Result<Option<Match>>;
}

impl<G> GeocodingGateway for &G
where
    G: GeocodingGateway + ?Sized,
{
    fn provider(&self) -> ProviderId {
        (**self).provider()
    }
    fn forward(&self, query: &str) -> anyhow::Result<Option<Match>> {
        (**self).forward(query)
    }
}

impl GeocodingGateway for Box<dyn GeocodingGateway> {
    fn provider(&self) -> ProviderId {
        self.as_ref().provider()
    }
    fn forward(&self, query: &str) -> anyhow::Result<Option<Match>> {
        self.as_ref().forward(query)
    }
}
