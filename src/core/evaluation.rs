use crate::core::catalog::standards_or_default;
use crate::core::distance::{distance_for_time, DEFAULT_TIME_THRESHOLDS};
use crate::core::features::{isochrone_collection, poi_collection};
use crate::core::isochrone::IsochroneService;
use crate::core::merger::merge_pois;
use crate::core::scoring::assemble_scores;
use crate::core::spatial_filter::filter_pois_within;
use crate::core::suggestions::generate_suggestions;
use crate::core::type_mapper::places_to_pois;
use crate::domain::model::{
    EvaluationParams, EvaluationRequest, EvaluationResult, IsochroneParams, IsochroneResult, Poi,
};
use crate::domain::ports::{ExternalPoiSource, GeoBackend};
use crate::utils::error::{LifeCircleError, PipelineStage, Result};
use std::time::Duration;

pub const DEFAULT_EVALUATION_TIMEOUT: Duration = Duration::from_secs(60);

/// 15 分鐘生活圈綜合評價。
///
/// 每次評價依序呼叫空間引擎與外部地圖服務，不共享可變狀態，可同時服務多個請求。
/// 評分、等時圈、POI 查詢失敗會中止整個評價；外部服務、空間過濾、道路網路失敗只會降級。
pub struct LifeCircleEvaluator<G: GeoBackend, X: ExternalPoiSource> {
    geo: G,
    external: X,
    timeout: Duration,
}

impl<G: GeoBackend, X: ExternalPoiSource> LifeCircleEvaluator<G, X> {
    pub fn new(geo: G, external: X) -> Self {
        Self {
            geo,
            external,
            timeout: DEFAULT_EVALUATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn geo(&self) -> &G {
        &self.geo
    }

    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        let params = request.normalize()?;

        tracing::info!(
            "🚀 Evaluating life circle at ({:.6}, {:.6}), {} min @ {} km/h",
            params.origin.lng,
            params.origin.lat,
            params.time_threshold,
            params.walk_speed
        );

        match tokio::time::timeout(self.timeout, self.run(&params)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("❌ Evaluation timed out after {:?}", self.timeout);
                Err(LifeCircleError::Timeout { limit: self.timeout })
            }
        }
    }

    async fn run(&self, params: &EvaluationParams) -> Result<EvaluationResult> {
        // 評分
        let standards = standards_or_default(&self.geo).await;
        let rows = self
            .geo
            .evaluate_life_circle(params.origin, params.walk_speed)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Scoring))?;
        let sheet = assemble_scores(rows, &standards);
        tracing::info!(
            "📊 Score {:.1} ({}) across {} categories",
            sheet.total_score,
            sheet.grade,
            sheet.category_scores.len()
        );

        let suggestions = generate_suggestions(&sheet.category_scores);

        // 等時圈
        let isochrones = IsochroneService::new(&self.geo)
            .calculate_with(&IsochroneParams {
                origin: params.origin,
                time_thresholds: DEFAULT_TIME_THRESHOLDS.to_vec(),
                walk_speed: params.walk_speed,
            })
            .await?;

        // POI
        let local_pois = self
            .geo
            .query_pois_in_isochrone(params.origin, params.time_threshold, params.walk_speed)
            .await
            .map_err(|e| e.at_stage(PipelineStage::PoiQuery))?;
        tracing::info!("📍 {} local POIs inside {} min isochrone", local_pois.len(), params.time_threshold);

        let external_pois = self.collect_external_pois(params, &isochrones).await;
        let merged_pois = merge_pois(local_pois, external_pois);
        tracing::info!("📍 {} POIs after merge", merged_pois.len());

        // 可達道路只是附加資訊
        let roads = match self
            .geo
            .reachable_roads(params.origin, params.time_threshold, params.walk_speed)
            .await
        {
            Ok(roads) => roads,
            Err(e) => {
                tracing::warn!("⚠️ Reachable road lookup failed: {}", e);
                None
            }
        };

        Ok(EvaluationResult {
            origin: params.origin,
            total_score: sheet.total_score,
            grade: sheet.grade,
            summary: sheet.summary().to_string(),
            category_scores: sheet.category_scores,
            isochrone: isochrone_collection(&isochrones),
            pois: poi_collection(&merged_pois),
            roads,
            suggestions,
            merged_pois,
        })
    }

    /// 外部服務停用或失敗時回傳空集合，評價只用本地 POI
    async fn collect_external_pois(&self, params: &EvaluationParams, isochrones: &IsochroneResult) -> Vec<Poi> {
        if !params.use_external || !self.external.is_enabled() {
            return Vec::new();
        }

        let radius_m = distance_for_time(params.walk_speed, params.time_threshold).round() as u32;
        let places = match self.external.search_nearby(params.origin, radius_m).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!("⚠️ External POI search failed, using local POIs only: {}", e);
                return Vec::new();
            }
        };

        let candidates = places_to_pois(&places);
        tracing::debug!("External search returned {} places, {} usable", places.len(), candidates.len());

        let polygon = isochrones
            .polygon_for(params.time_threshold)
            .or_else(|| isochrones.largest());
        match polygon {
            Some(polygon) => filter_pois_within(&self.geo, candidates, &polygon.geometry).await,
            None => candidates,
        }
    }
}
