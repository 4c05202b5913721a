//! 空間引擎的 HTTP JSON 用戶端。
//!
//! 等時圈、點位包含、可達道路、POI 查詢與評分都由同一個引擎提供：
//!
//! | 方法 | 路徑 |
//! |------|------|
//! | POST | `/isochrones` |
//! | POST | `/points-in-polygon` |
//! | POST | `/roads/reachable` |
//! | POST | `/pois/in-isochrone` |
//! | GET  | `/categories` |
//! | POST | `/evaluate` |
//! | GET  | `/standards` |
//!
//! 非 2xx 回應一律轉為 `ProviderError`，內容帶引擎回傳的訊息。

use crate::config::toml_config::GeoEngineConfig;
use crate::domain::model::{
    CategoryAggregate, Coordinate, EvaluationStandard, IndexedPoint, IsochronePolygon, Poi,
    PoiCategory,
};
use crate::domain::ports::{IsochroneProvider, PoiStore, ScoringStore};
use crate::utils::error::{LifeCircleError, Result};
use async_trait::async_trait;
use geojson::Geometry;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

const PROVIDER: &str = "geo-engine";

#[derive(Debug, Serialize)]
struct IsochroneQuery<'a> {
    lng: f64,
    lat: f64,
    thresholds: &'a [u32],
    walk_speed: f64,
}

#[derive(Debug, Serialize)]
struct ReachQuery {
    lng: f64,
    lat: f64,
    minutes: u32,
    walk_speed: f64,
}

#[derive(Debug, Serialize)]
struct ScoreQuery {
    lng: f64,
    lat: f64,
    walk_speed: f64,
}

#[derive(Debug, Serialize)]
struct ContainmentQuery<'a> {
    points: &'a [IndexedPoint],
    polygon: &'a Geometry,
}

#[derive(Debug, Deserialize)]
struct ContainmentResponse {
    inside: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct RoadsResponse {
    #[serde(default)]
    roads: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct GeoEngineClient {
    client: Client,
    base_url: String,
}

impl GeoEngineClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &GeoEngineConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("Geo engine response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LifeCircleError::provider(PROVIDER, status.as_u16(), body.trim()));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl IsochroneProvider for GeoEngineClient {
    async fn compute_isochrones(
        &self,
        origin: Coordinate,
        time_thresholds: &[u32],
        walk_speed: f64,
    ) -> Result<Vec<IsochronePolygon>> {
        let query = IsochroneQuery {
            lng: origin.lng,
            lat: origin.lat,
            thresholds: time_thresholds,
            walk_speed,
        };
        self.post_json("isochrones", &query).await
    }

    async fn filter_points_in_polygon(
        &self,
        points: &[IndexedPoint],
        polygon: &Geometry,
    ) -> Result<HashSet<usize>> {
        let response: ContainmentResponse = self
            .post_json("points-in-polygon", &ContainmentQuery { points, polygon })
            .await?;
        Ok(response.inside.into_iter().collect())
    }

    async fn reachable_roads(
        &self,
        origin: Coordinate,
        minutes: u32,
        walk_speed: f64,
    ) -> Result<Option<serde_json::Value>> {
        let query = ReachQuery {
            lng: origin.lng,
            lat: origin.lat,
            minutes,
            walk_speed,
        };
        let response: RoadsResponse = self.post_json("roads/reachable", &query).await?;
        Ok(response.roads.filter(|roads| !roads.is_null()))
    }
}

#[async_trait]
impl PoiStore for GeoEngineClient {
    async fn query_pois_in_isochrone(
        &self,
        origin: Coordinate,
        minutes: u32,
        walk_speed: f64,
    ) -> Result<Vec<Poi>> {
        let query = ReachQuery {
            lng: origin.lng,
            lat: origin.lat,
            minutes,
            walk_speed,
        };
        self.post_json("pois/in-isochrone", &query).await
    }

    async fn fetch_categories(&self) -> Result<Vec<PoiCategory>> {
        self.get_json("categories").await
    }
}

#[async_trait]
impl ScoringStore for GeoEngineClient {
    async fn evaluate_life_circle(
        &self,
        origin: Coordinate,
        walk_speed: f64,
    ) -> Result<Vec<CategoryAggregate>> {
        let query = ScoreQuery {
            lng: origin.lng,
            lat: origin.lat,
            walk_speed,
        };
        self.post_json("evaluate", &query).await
    }

    async fn fetch_evaluation_standards(&self) -> Result<Vec<EvaluationStandard>> {
        self.get_json("standards").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PoiSource;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> GeoEngineClient {
        GeoEngineClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_compute_isochrones_posts_thresholds() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/isochrones")
                    .json_body(json!({ "lng": 120.15, "lat": 30.28, "thresholds": [5, 10, 15], "walk_speed": 5.0 }));
                then.status(200).json_body(json!([
                    {
                        "minutes": 5,
                        "distance_m": 416.67,
                        "geometry": { "type": "Polygon", "coordinates": [[[120.1, 30.2], [120.2, 30.2], [120.2, 30.3], [120.1, 30.2]]] }
                    }
                ]));
            })
            .await;

        let polygons = client(&server)
            .compute_isochrones(Coordinate::new(120.15, 30.28), &[5, 10, 15], 5.0)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].minutes, 5);
        assert!(matches!(polygons[0].geometry.value, geojson::Value::Polygon(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/evaluate");
                then.status(500).body("function evaluate_life_circle does not exist");
            })
            .await;

        let err = client(&server)
            .evaluate_life_circle(Coordinate::new(120.15, 30.28), 5.0)
            .await
            .unwrap_err();

        match err {
            LifeCircleError::ProviderError { provider, status, message } => {
                assert_eq!(provider, "geo-engine");
                assert_eq!(status, "500");
                assert!(message.contains("evaluate_life_circle"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_points_in_polygon_returns_indices() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/points-in-polygon");
                then.status(200).json_body(json!({ "inside": [0, 2] }));
            })
            .await;

        let points = [
            IndexedPoint { idx: 0, lng: 120.1, lat: 30.1 },
            IndexedPoint { idx: 1, lng: 121.0, lat: 31.0 },
            IndexedPoint { idx: 2, lng: 120.2, lat: 30.2 },
        ];
        let polygon = Geometry::new(geojson::Value::Point(vec![120.0, 30.0]));

        let inside = client(&server).filter_points_in_polygon(&points, &polygon).await.unwrap();

        assert_eq!(inside, HashSet::from([0, 2]));
    }

    #[tokio::test]
    async fn test_local_pois_keep_walking_annotations() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/pois/in-isochrone")
                    .json_body(json!({ "lng": 120.15, "lat": 30.28, "minutes": 15, "walk_speed": 5.0 }));
                then.status(200).json_body(json!([
                    {
                        "id": 42,
                        "name": "社区卫生服务中心",
                        "category": "medical",
                        "sub_type": "clinic",
                        "lng": 120.151,
                        "lat": 30.281,
                        "tags": ["amenity=clinic"],
                        "distance_m": 320.5,
                        "walk_time_min": 3.8
                    }
                ]));
            })
            .await;

        let pois = client(&server)
            .query_pois_in_isochrone(Coordinate::new(120.15, 30.28), 15, 5.0)
            .await
            .unwrap();

        assert_eq!(pois.len(), 1);
        assert_eq!(pois[0].id, Some(42));
        assert_eq!(pois[0].distance_m, Some(320.5));
        assert_eq!(pois[0].walk_time_min, Some(3.8));
        assert_eq!(pois[0].tags, vec!["amenity=clinic".to_string()]);
        assert_eq!(pois[0].source, PoiSource::Local);
    }

    #[tokio::test]
    async fn test_null_roads_become_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/roads/reachable");
                then.status(200).json_body(json!({ "roads": null }));
            })
            .await;

        let roads = client(&server)
            .reachable_roads(Coordinate::new(120.15, 30.28), 15, 5.0)
            .await
            .unwrap();

        assert!(roads.is_none());
    }

    #[tokio::test]
    async fn test_fetch_standards_and_categories() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/standards");
                then.status(200).json_body(json!([
                    {
                        "category": "medical",
                        "sub_type": "clinic",
                        "min_count_5": 0,
                        "min_count_10": 1,
                        "min_count_15": 1,
                        "required": true,
                        "base_score": 30.0
                    }
                ]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/categories");
                then.status(200).json_body(json!([
                    { "code": "medical", "name": "医疗卫生", "weight": 0.18 }
                ]));
            })
            .await;

        let engine = client(&server);
        let standards = engine.fetch_evaluation_standards().await.unwrap();
        let categories = engine.fetch_categories().await.unwrap();

        assert_eq!(standards[0].sub_type, "clinic");
        assert!(standards[0].required);
        assert_eq!(categories[0].code, "medical");
        assert!(categories[0].sub_types.is_empty());
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let engine = GeoEngineClient::new("http://localhost:8081/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(engine.url("/isochrones"), "http://localhost:8081/api/isochrones");
    }
}
