//! HTTP location source
//!
//! Fetches the current location list for refresh cycles.

use async_trait::async_trait;
use gloo_net::http::Request;

use visits_dashboard::{decode_locations, FetchError, Location, LocationSource};

/// `GET <endpoint>` returning `{"locations": [...]}`
#[derive(Debug, Clone)]
pub struct HttpLocationSource {
    url: String,
}

impl HttpLocationSource {
    pub fn new(endpoint: &str) -> Self {
        Self {
            url: normalize_endpoint(endpoint),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl LocationSource for HttpLocationSource {
    async fn fetch_locations(&self) -> Result<Vec<Location>, FetchError> {
        let response = Request::get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        decode_locations(response.status(), &body)
    }
}

/// Trim whitespace and a trailing slash; relative paths stay relative
fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.len() > 1 {
        trimmed.trim_end_matches('/').to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("/api/locations"), "/api/locations");
        assert_eq!(normalize_endpoint(" /api/locations/ "), "/api/locations");
        assert_eq!(
            normalize_endpoint("https://stats.example.com/api/locations/"),
            "https://stats.example.com/api/locations"
        );
        assert_eq!(normalize_endpoint("/"), "/");
    }
}
