use crate::domain::model::{
    CategoryAggregate, Coordinate, EvaluationStandard, ExternalPlace, IndexedPoint,
    IsochronePolygon, Poi, PoiCategory,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use geojson::Geometry;
use std::collections::HashSet;

/// 等時圈幾何計算，由外部空間引擎提供
#[async_trait]
pub trait IsochroneProvider: Send + Sync {
    /// 依分鐘數遞增回傳各等時圈多邊形
    async fn compute_isochrones(
        &self,
        origin: Coordinate,
        time_thresholds: &[u32],
        walk_speed: f64,
    ) -> Result<Vec<IsochronePolygon>>;

    /// 一次查詢全部點，回傳落在多邊形內的 idx
    async fn filter_points_in_polygon(
        &self,
        points: &[IndexedPoint],
        polygon: &Geometry,
    ) -> Result<HashSet<usize>>;

    async fn reachable_roads(
        &self,
        origin: Coordinate,
        minutes: u32,
        walk_speed: f64,
    ) -> Result<Option<serde_json::Value>>;
}

#[async_trait]
pub trait PoiStore: Send + Sync {
    async fn query_pois_in_isochrone(
        &self,
        origin: Coordinate,
        minutes: u32,
        walk_speed: f64,
    ) -> Result<Vec<Poi>>;

    async fn fetch_categories(&self) -> Result<Vec<PoiCategory>>;
}

#[async_trait]
pub trait ScoringStore: Send + Sync {
    async fn evaluate_life_circle(
        &self,
        origin: Coordinate,
        walk_speed: f64,
    ) -> Result<Vec<CategoryAggregate>>;

    async fn fetch_evaluation_standards(&self) -> Result<Vec<EvaluationStandard>>;
}

/// 同一個空間引擎通常同時負責幾何、POI 與評分
pub trait GeoBackend: IsochroneProvider + PoiStore + ScoringStore {}

impl<T: IsochroneProvider + PoiStore + ScoringStore> GeoBackend for T {}

/// 第三方地圖服務，可停用、可能失敗
#[async_trait]
pub trait ExternalPoiSource: Send + Sync {
    fn is_enabled(&self) -> bool;

    async fn search_nearby(&self, origin: Coordinate, radius_m: u32) -> Result<Vec<ExternalPlace>>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
