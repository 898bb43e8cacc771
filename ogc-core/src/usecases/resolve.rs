use super::prelude::*;

/// Resolves a single query without touching any cache.
///
/// Empty queries are answered immediately. Gateway failures never
/// escape: they end up as `<provider>_lookup_error` results.
pub fn resolve<G>(gateway: &G, query: &str) -> GeocodeResult
where
    G: GeocodingGateway,
{
    if query.is_empty() {
        return GeocodeResult::missing_query();
    }
    let provider = gateway.provider();
    match gateway.forward(query) {
        Ok(Some(found)) => {
            log::debug!("Resolved '{query}' with {provider}: {found:?}");
            GeocodeResult::resolved(provider, query, found)
        }
        Ok(None) => {
            log::debug!("No {provider} match for '{query}'");
            GeocodeResult::no_match(provider, query)
        }
        Err(err) => {
            log::warn!("Failed to resolve '{query}' with {provider}: {err:#}");
            GeocodeResult::lookup_error(provider, query)
        }
    }
}

/// Like [`resolve`] but consults the cache first and
/// stores the outcome of every lookup that reached the gateway.
///
/// Returns the result and whether the gateway was asked.
pub fn resolve_cached<G>(
    cache: &mut GeocodeCache,
    gateway: &G,
    query: &str,
) -> (GeocodeResult, bool)
where
    G: GeocodingGateway,
{
    if query.is_empty() {
        return (GeocodeResult::missing_query(), false);
    }
    let key = CacheKey::new(gateway.provider(), query);
    if let Some(cached) = cache.get(&key) {
        log::debug!("Cache hit: {key}");
        return (cached.clone(), false);
    }
    log::debug!("Cache miss: {key}");
    let result = resolve(gateway, query);
    cache.put(key, result.clone());
    (result, true)
}
