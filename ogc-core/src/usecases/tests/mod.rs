use super::prelude::*;
use anyhow::anyhow;
use std::{cell::RefCell, collections::HashMap};

/// A gateway that answers from a fixed table and counts its calls.
pub struct MockGateway {
    provider: ProviderId,
    matches: HashMap<String, Match>,
    fail: bool,
    pub queries: RefCell<Vec<String>>,
}

impl MockGateway {
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            matches: HashMap::new(),
            fail: false,
            queries: RefCell::new(vec![]),
        }
    }

    /// Every lookup fails with an error.
    pub fn failing(provider: ProviderId) -> Self {
        Self {
            fail: true,
            ..Self::new(provider)
        }
    }

    pub fn with_match(mut self, query: &str, latitude: &str, longitude: &str) -> Self {
        let found = Match {
            latitude: latitude.into(),
            longitude: longitude.into(),
            matched_address: query.into(),
            match_type: "rooftop".into(),
        };
        self.matches.insert(query.into(), found);
        self
    }

    pub fn calls(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl GeocodingGateway for MockGateway {
    fn provider(&self) -> ProviderId {
        self.provider
    }

    fn forward(&self, query: &str) -> anyhow::Result<Option<Match>> {
        self.queries.borrow_mut().push(query.to_owned());
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.matches.get(query).cloned())
    }
}
