//! LuoXue (lxns.net) maimai API client
//!
//! Fetches a player's best scores and reduces them to the single rating
//! number the badge displays.

use dxbadge_core::{Error, Result};
use serde::Deserialize;

const API_BASE: &str = "https://maimai.lxns.net/api/v0/maimai";

/// Player bests payload from the LuoXue API (only the fields we consume)
#[derive(Debug, Deserialize)]
pub struct BestsResponse {
    pub success: bool,
    pub code: u32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<BestsData>,
}

#[derive(Debug, Deserialize)]
pub struct BestsData {
    /// Rating contribution from older-version charts
    pub standard_total: u32,
    /// Rating contribution from current-version charts
    pub dx_total: u32,
}

impl BestsData {
    /// Combined DX rating
    pub fn rating(&self) -> u32 {
        self.standard_total + self.dx_total
    }
}

/// Outbound client for the rating API
pub struct Client {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl Client {
    /// Create a client; the API key is sent as the Authorization header
    /// when present.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    /// Fetch a player's bests and reduce them to one rating number
    pub async fn fetch_rating(&self, friend_code: &str) -> Result<u32> {
        let url = format!("{API_BASE}/player/{friend_code}/bests");
        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;
        let status = response.status();
        let body: BestsResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        if !status.is_success() || !body.success {
            let message = body
                .message
                .unwrap_or_else(|| format!("rating API returned {status}"));
            return Err(Error::Upstream(message));
        }

        body.data
            .map(|data| data.rating())
            .ok_or_else(|| Error::Upstream("rating API response had no data".to_string()))
    }
}
