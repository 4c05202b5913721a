//! 本地 POI 與外部 POI 的合併去重。
//!
//! 判定重複的條件：
//!   1. (經度, 緯度, 名稱) 在小數點後 5 位完全相同；
//!   2. 或與任一本地 POI 相距不到 50 公尺，且名稱互相包含（區分大小寫）。
//!
//! 名稱包含的判斷能處理分店名稱的差異，但很短的共同子字串也會誤判為重複。

use crate::domain::model::{Poi, PoiSource};
use std::collections::HashSet;

pub const DUPLICATE_RADIUS_M: f64 = 50.0;

/// 每度緯度約 111 公里
const METERS_PER_DEG_LAT: f64 = 111_000.0;
/// 每度經度約 90 公里，只在北緯 30 度附近成立
const METERS_PER_DEG_LNG: f64 = 90_000.0;

/// 小範圍的平面近似距離（公尺），不是大地線距離
pub fn approx_distance_m(lng1: f64, lat1: f64, lng2: f64, lat2: f64) -> f64 {
    let d_lat = (lat2 - lat1) * METERS_PER_DEG_LAT;
    let d_lng = (lng2 - lng1) * METERS_PER_DEG_LNG;
    (d_lat * d_lat + d_lng * d_lng).sqrt()
}

fn dedup_key(poi: &Poi) -> String {
    format!("{:.5},{:.5},{}", poi.lng, poi.lat, poi.name)
}

fn names_overlap(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn is_near_duplicate(candidate: &Poi, local_pois: &[Poi]) -> bool {
    local_pois.iter().any(|local| {
        approx_distance_m(candidate.lng, candidate.lat, local.lng, local.lat) < DUPLICATE_RADIUS_M
            && names_overlap(&candidate.name, &local.name)
    })
}

/// 本地 POI 全部保留在前面，接著是未重複的外部 POI，順序與輸入相同
pub fn merge_pois(local_pois: Vec<Poi>, external_pois: Vec<Poi>) -> Vec<Poi> {
    let mut seen: HashSet<String> = HashSet::with_capacity(local_pois.len() + external_pois.len());
    let mut merged: Vec<Poi> = Vec::with_capacity(local_pois.len() + external_pois.len());

    for mut poi in local_pois {
        seen.insert(dedup_key(&poi));
        poi.source = PoiSource::Local;
        merged.push(poi);
    }
    let local_count = merged.len();

    let mut duplicates = 0usize;
    for mut candidate in external_pois {
        let key = dedup_key(&candidate);
        if seen.contains(&key) || is_near_duplicate(&candidate, &merged[..local_count]) {
            duplicates += 1;
            continue;
        }

        candidate.source = PoiSource::External;
        seen.insert(key);
        merged.push(candidate);
    }

    tracing::debug!(
        "Merged POIs: {} local, {} external kept, {} duplicates dropped",
        local_count,
        merged.len() - local_count,
        duplicates
    );

    merged
}
