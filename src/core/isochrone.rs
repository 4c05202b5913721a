use crate::core::features::isochrone_collection;
use crate::domain::model::{IsochroneParams, IsochroneRequest, IsochroneResult};
use crate::domain::ports::IsochroneProvider;
use crate::utils::error::{PipelineStage, Result};
use geojson::FeatureCollection;

/// 只計算等時圈，不評分
pub struct IsochroneService<'a, G: IsochroneProvider + ?Sized> {
    geo: &'a G,
}

impl<'a, G: IsochroneProvider + ?Sized> IsochroneService<'a, G> {
    pub fn new(geo: &'a G) -> Self {
        Self { geo }
    }

    pub async fn calculate(&self, request: &IsochroneRequest) -> Result<IsochroneResult> {
        let params = request.normalize()?;
        self.calculate_with(&params).await
    }

    pub async fn calculate_with(&self, params: &IsochroneParams) -> Result<IsochroneResult> {
        tracing::debug!(
            "Computing isochrones {:?} at {} km/h (max {:.1} m)",
            params.time_thresholds,
            params.walk_speed,
            params.max_distance_m()
        );

        let mut polygons = self
            .geo
            .compute_isochrones(params.origin, &params.time_thresholds, params.walk_speed)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Isochrone))?;
        polygons.sort_by_key(|p| p.minutes);

        Ok(IsochroneResult {
            origin: params.origin,
            polygons,
        })
    }

    pub async fn calculate_as_geojson(&self, request: &IsochroneRequest) -> Result<FeatureCollection> {
        let result = self.calculate(request).await?;
        Ok(isochrone_collection(&result))
    }
}
