//! Blocking HTTP client for the layout endpoints

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info};

use super::config::ApiConfig;
use super::dto::{BarnLayoutResponse, LayoutSaveRequest};
use super::{ApiError, LayoutApi};

/// `LayoutApi` backed by the REST server
#[derive(Debug, Clone)]
pub struct HttpLayoutApi {
    client: Client,
    base_url: String,
}

impl HttpLayoutApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint for reading and writing one barn's layout
    pub fn layout_url(&self, barn_id: i64) -> String {
        format!("{}/api/map/barns/{}/layout", self.base_url, barn_id)
    }
}

impl LayoutApi for HttpLayoutApi {
    fn fetch_layout(&self, barn_id: i64) -> Result<BarnLayoutResponse, ApiError> {
        let url = self.layout_url(barn_id);
        debug!(%url, "fetching barn layout");

        let response = check_status(self.client.get(&url).send()?)?;
        let layout: BarnLayoutResponse = response.json()?;

        debug!(
            barn_id,
            placed = layout.layouts.len(),
            unplaced = layout.unplaced_pens.len(),
            "barn layout fetched"
        );
        Ok(layout)
    }

    fn save_layout(&self, barn_id: i64, request: &LayoutSaveRequest) -> Result<(), ApiError> {
        let url = self.layout_url(barn_id);
        debug!(%url, pens = request.layouts.len(), "saving barn layout");

        check_status(self.client.post(&url).json(request).send()?)?;

        info!(barn_id, pens = request.layouts.len(), "barn layout saved");
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turn a non-2xx response into an error carrying the server's message
fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(ApiError::server(status.as_u16(), server_message(&body)))
}

/// Extract `message` from a JSON error body
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_url_strips_trailing_slash() {
        let api = HttpLayoutApi::new(&ApiConfig::new().with_base_url("http://farm:9000/")).unwrap();
        assert_eq!(api.layout_url(4), "http://farm:9000/api/map/barns/4/layout");
    }

    #[test]
    fn test_server_message() {
        assert_eq!(
            server_message(r#"{"status": 400, "message": "pen name exists"}"#),
            Some("pen name exists".to_string())
        );
        assert_eq!(server_message(r#"{"message": ""}"#), None);
        assert_eq!(server_message("<html>oops</html>"), None);
    }
}
