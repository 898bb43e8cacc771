use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{Error, USER_AGENT};

pub fn client(timeout: Duration) -> Result<Client, Error> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Sends a GET request and decodes the JSON body of a successful response.
///
/// Errors never contain the request URL because its query may carry an API key.
pub fn get_json<T>(client: &Client, url: &str, params: &[(&str, &str)]) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let response = client
        .get(url)
        .query(params)
        .send()
        .and_then(Response::error_for_status)
        .map_err(reqwest::Error::without_url)?;
    let body = response.text().map_err(reqwest::Error::without_url)?;
    log::trace!("Provider response: {body}");
    Ok(serde_json::from_str(&body)?)
}
