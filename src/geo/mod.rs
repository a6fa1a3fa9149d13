use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pin {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: String, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!("freight-dispatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("valid http client");

        Self { client, base_url }
    }

    pub async fn geocode(&self, city: &str) -> Result<Option<Pin>, AppError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("format", "json"), ("q", city)])
            .send()
            .await
            .map_err(|err| {
                AppError::UpstreamUnavailable(format!("geocoder request failed: {err}"))
            })?;

        let hits: Vec<SearchHit> = response.json().await.map_err(|err| {
            AppError::UpstreamUnavailable(format!("geocoder returned an invalid body: {err}"))
        })?;

        Ok(hits.first().and_then(parse_hit))
    }

    pub async fn pin_for(&self, city: &str) -> Option<Pin> {
        match self.geocode(city).await {
            Ok(pin) => pin,
            Err(err) => {
                warn!(city, error = %err, "geocoding failed; omitting pin");
                None
            }
        }
    }
}

fn parse_hit(hit: &SearchHit) -> Option<Pin> {
    let lat = hit.lat.parse().ok()?;
    let lon = hit.lon.parse().ok()?;
    Some(Pin { lat, lon })
}
