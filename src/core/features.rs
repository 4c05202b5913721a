//! GeoJSON 輸出（RFC 7946）

use crate::domain::model::{Coordinate, IsochroneResult, Poi};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

fn feature(geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn properties(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

pub fn point_feature(origin: Coordinate, props: JsonObject) -> Feature {
    feature(Geometry::new(Value::Point(vec![origin.lng, origin.lat])), props)
}

/// 大的等時圈在前（前端先畫在底層），最後附上起點
pub fn isochrone_collection(result: &IsochroneResult) -> FeatureCollection {
    let mut polygons: Vec<_> = result.polygons.iter().collect();
    polygons.sort_by(|a, b| b.minutes.cmp(&a.minutes));

    let mut features: Vec<Feature> = polygons
        .into_iter()
        .map(|p| {
            feature(
                p.geometry.clone(),
                properties(json!({
                    "minutes": p.minutes,
                    "distance": p.distance_m,
                    "type": "isochrone",
                })),
            )
        })
        .collect();

    features.push(point_feature(result.origin, properties(json!({ "type": "origin" }))));
    collection(features)
}

pub fn poi_collection(pois: &[Poi]) -> FeatureCollection {
    let features = pois
        .iter()
        .map(|poi| {
            point_feature(
                poi.coordinate(),
                properties(json!({
                    "id": poi.id,
                    "name": poi.name,
                    "category": poi.category,
                    "sub_type": poi.sub_type,
                    "tags": poi.tags,
                    "type": "poi",
                    "source": poi.source.as_str(),
                })),
            )
        })
        .collect();

    collection(features)
}
