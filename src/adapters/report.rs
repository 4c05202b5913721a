use crate::domain::model::{EvaluationParams, EvaluationResult, IsochroneParams, Poi};
use crate::domain::ports::Storage;
use crate::utils::error::{LifeCircleError, Result};
use chrono::{DateTime, Utc};
use geojson::FeatureCollection;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a, P: Serialize, R: Serialize> {
    generated_at: DateTime<Utc>,
    request: &'a P,
    result: &'a R,
}

#[derive(Debug, Serialize)]
struct PoiRow<'a> {
    id: Option<i64>,
    name: &'a str,
    category: &'a str,
    sub_type: &'a str,
    lng: f64,
    lat: f64,
    address: &'a str,
    distance_m: Option<f64>,
    walk_time_min: Option<f64>,
    tags: String,
    source: &'static str,
}

impl<'a> From<&'a Poi> for PoiRow<'a> {
    fn from(poi: &'a Poi) -> Self {
        PoiRow {
            id: poi.id,
            name: &poi.name,
            category: &poi.category,
            sub_type: &poi.sub_type,
            lng: poi.lng,
            lat: poi.lat,
            address: poi.address.as_deref().unwrap_or(""),
            distance_m: poi.distance_m,
            walk_time_min: poi.walk_time_min,
            tags: poi.tags.join("|"),
            source: poi.source.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub report: String,
    pub pois: Option<String>,
}

pub struct ReportWriter<S: Storage> {
    storage: S,
    write_poi_csv: bool,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, write_poi_csv: bool) -> Self {
        Self {
            storage,
            write_poi_csv,
        }
    }

    pub async fn write_evaluation(&self, params: &EvaluationParams, result: &EvaluationResult) -> Result<ReportPaths> {
        self.write_evaluation_at(Utc::now(), params, result).await
    }

    pub async fn write_evaluation_at(
        &self,
        generated_at: DateTime<Utc>,
        params: &EvaluationParams,
        result: &EvaluationResult,
    ) -> Result<ReportPaths> {
        let stamp = generated_at.format("%Y%m%d_%H%M%S");

        let report = ReportEnvelope {
            generated_at,
            request: params,
            result,
        };
        let json = serde_json::to_vec_pretty(&report)?;
        let report_path = self
            .storage
            .write_file(&format!("evaluation_{}.json", stamp), &json)
            .await?;
        tracing::info!("📁 Evaluation report saved to: {}", report_path);

        let pois = if self.write_poi_csv {
            let csv = pois_to_csv(&result.merged_pois)?;
            let path = self.storage.write_file(&format!("pois_{}.csv", stamp), &csv).await?;
            tracing::info!("📁 {} POIs saved to: {}", result.merged_pois.len(), path);
            Some(path)
        } else {
            None
        };

        Ok(ReportPaths {
            report: report_path,
            pois,
        })
    }

    pub async fn write_isochrones(&self, params: &IsochroneParams, collection: &FeatureCollection) -> Result<String> {
        let generated_at = Utc::now();
        let report = ReportEnvelope {
            generated_at,
            request: params,
            result: collection,
        };
        let json = serde_json::to_vec_pretty(&report)?;
        let path = self
            .storage
            .write_file(&format!("isochrone_{}.json", generated_at.format("%Y%m%d_%H%M%S")), &json)
            .await?;
        tracing::info!("📁 Isochrones saved to: {}", path);
        Ok(path)
    }
}

pub fn pois_to_csv(pois: &[Poi]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for poi in pois {
        writer.serialize(PoiRow::from(poi))?;
    }
    // 沒有資料列時仍輸出標題
    if pois.is_empty() {
        writer.write_record([
            "id", "name", "category", "sub_type", "lng", "lat", "address", "distance_m", "walk_time_min", "tags",
            "source",
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| LifeCircleError::IoError(e.into_error()))
}
