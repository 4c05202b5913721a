//! 高德地圖周邊搜尋（`/v3/place/around`）。

use crate::config::toml_config::AmapConfig;
use crate::domain::model::{Coordinate, ExternalPlace};
use crate::domain::ports::ExternalPoiSource;
use crate::utils::error::{LifeCircleError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "amap";

/// 高德部分欄位在沒有值時會回傳 `[]` 而不是字串
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlexibleString {
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl Default for FlexibleString {
    fn default() -> Self {
        FlexibleString::Text(String::new())
    }
}

impl From<FlexibleString> for String {
    fn from(value: FlexibleString) -> Self {
        match value {
            FlexibleString::Text(text) => text,
            FlexibleString::List(items) => items.into_iter().next().unwrap_or_default(),
            FlexibleString::Other(_) => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AroundResponse {
    status: String,
    #[serde(default)]
    info: String,
    #[serde(default)]
    pois: Vec<AmapPoi>,
}

#[derive(Debug, Deserialize)]
struct AmapPoi {
    #[serde(default)]
    name: String,
    #[serde(default)]
    typecode: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    address: FlexibleString,
}

impl From<AmapPoi> for ExternalPlace {
    fn from(poi: AmapPoi) -> Self {
        ExternalPlace {
            name: poi.name,
            type_code: poi.typecode,
            location: poi.location,
            address: poi.address.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AmapClient {
    client: Client,
    endpoint: String,
    key: String,
    enabled: bool,
    types: String,
    page_size: u32,
}

impl AmapClient {
    pub fn from_config(config: &AmapConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            key: config.resolved_key().unwrap_or_default().to_string(),
            enabled: config.is_enabled(),
            types: config.types_param(),
            page_size: config.page_size(),
        })
    }
}

#[async_trait]
impl ExternalPoiSource for AmapClient {
    fn is_enabled(&self) -> bool {
        self.enabled && !self.key.is_empty()
    }

    async fn search_nearby(&self, origin: Coordinate, radius_m: u32) -> Result<Vec<ExternalPlace>> {
        if !self.is_enabled() {
            return Ok(Vec::new());
        }

        let location = format!("{:.6},{:.6}", origin.lng, origin.lat);
        let radius = radius_m.to_string();
        let offset = self.page_size.to_string();
        tracing::debug!("Searching external POIs around {} within {} m", location, radius);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.key.as_str()),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("types", self.types.as_str()),
                ("offset", offset.as_str()),
                ("page", "1"),
                ("extensions", "base"),
            ])
            .send()
            .await?;

        let http_status = response.status();
        if !http_status.is_success() {
            return Err(LifeCircleError::provider(PROVIDER, http_status.as_u16(), "HTTP request rejected"));
        }

        let bytes = response.bytes().await?;
        let body: AroundResponse = serde_json::from_slice(&bytes)?;
        if body.status != "1" {
            return Err(LifeCircleError::provider(PROVIDER, &body.status, body.info));
        }

        tracing::info!("External provider returned {} places", body.pois.len());
        Ok(body.pois.into_iter().map(ExternalPlace::from).collect())
    }
}
