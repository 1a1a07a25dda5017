// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::StoreConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &StoreConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Join path segments under a base URL, percent-encoding each segment.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithoutBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Append query parameters; `None` values are sent as empty (`genre=`).
pub fn with_query(mut url: Url, params: &[(&str, Option<&str>)]) -> Url {
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value.unwrap_or(""));
        }
    }
    url
}
