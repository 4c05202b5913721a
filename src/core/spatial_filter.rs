use crate::domain::model::{IndexedPoint, Poi};
use crate::domain::ports::IsochroneProvider;
use geojson::Geometry;

/// 只保留落在多邊形內的 POI。
///
/// 所有候選點合併成一次包含查詢送給空間引擎；引擎出錯時原樣回傳全部候選（fail-open）。
pub async fn filter_pois_within<G>(geo: &G, candidates: Vec<Poi>, polygon: &Geometry) -> Vec<Poi>
where
    G: IsochroneProvider + ?Sized,
{
    if candidates.is_empty() {
        return candidates;
    }

    let points: Vec<IndexedPoint> = candidates
        .iter()
        .enumerate()
        .map(|(idx, poi)| IndexedPoint {
            idx,
            lng: poi.lng,
            lat: poi.lat,
        })
        .collect();

    let inside = match geo.filter_points_in_polygon(&points, polygon).await {
        Ok(inside) => inside,
        Err(e) => {
            tracing::warn!("⚠️ Spatial filter failed, keeping all {} candidates: {}", candidates.len(), e);
            return candidates;
        }
    };

    let total = candidates.len();
    let filtered: Vec<Poi> = candidates
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| inside.contains(idx))
        .map(|(_, poi)| poi)
        .collect();

    tracing::info!("External POI filter: searched {} -> inside isochrone {}", total, filtered.len());
    filtered
}
