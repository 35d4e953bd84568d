//! HTTP client for the booking backend

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use expofloor_core::models::{BookingRequest, ExhibitionConfig, StallType};
use expofloor_core::{LayoutPayload, StallPayload};

use crate::error::{Error, Result};

/// Receipt returned by `POST bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub id: i64,
    #[serde(default)]
    pub status: Option<String>,
}

/// Client handle for all backend calls made by the viewer.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Nested floor plan for one exhibition.
    pub async fn layout(&self, exhibition_id: i64) -> Result<LayoutPayload> {
        self.get_json(&format!("layout/exhibition/{exhibition_id}"))
            .await
    }

    /// Stall type catalog with default rates and colors.
    pub async fn stall_types(&self, exhibition_id: i64) -> Result<Vec<StallType>> {
        self.get_json(&format!("stall-types?exhibitionId={exhibition_id}"))
            .await
    }

    /// Exhibition record including rate, tax and discount configuration.
    pub async fn exhibition(&self, id: i64) -> Result<ExhibitionConfig> {
        self.get_json(&format!("exhibitions/{id}")).await
    }

    /// Flat list of available stalls, the booking wizard's data path. Must
    /// price identically to the layout path; both go through the same
    /// normalization helpers in core.
    pub async fn available_stalls(&self, exhibition_id: i64) -> Result<Vec<StallPayload>> {
        self.get_json(&format!("stalls/available?exhibitionId={exhibition_id}"))
            .await
    }

    /// Create a booking from the pre-computed calculation payload.
    pub async fn submit_booking(&self, request: &BookingRequest) -> Result<BookingReceipt> {
        let url = format!("{}/bookings", self.base);
        debug!(url = %url, stalls = request.stall_ids.len(), "Submitting booking");

        let response = self.http.post(&url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base, path);
        debug!(url = %url, "GET");

        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "Backend request failed");
            return Err(Error::Http {
                status: status.as_u16(),
                message: truncate(&body, 200),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}
