//! 外部地圖服務類型碼（6 位數字）到內部分類/子類型的映射。
//!
//! 查表順序：完整 6 位碼 → 前 4 位補 "00" → 預設 `public/community_service`。
//! 不會失敗，一定回傳一組映射。

use crate::domain::model::{ExternalPlace, Poi, PoiSource};
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityType {
    pub category: &'static str,
    pub sub_type: &'static str,
}

pub const DEFAULT_FACILITY_TYPE: FacilityType = FacilityType {
    category: "public",
    sub_type: "community_service",
};

static TYPE_TABLE: OnceLock<HashMap<&'static str, FacilityType>> = OnceLock::new();

fn type_table() -> &'static HashMap<&'static str, FacilityType> {
    TYPE_TABLE.get_or_init(|| {
        const CODE_TO_TYPE: &[(&str, &str, &str)] = &[
            // 醫療衛生
            ("090100", "medical", "community_health"),
            ("090200", "medical", "community_health"),
            ("090300", "medical", "community_health"),
            ("090400", "medical", "community_health"),
            ("090500", "medical", "pharmacy"),
            ("090600", "medical", "community_health"),
            ("090700", "medical", "hospital"),
            // 教育
            ("141200", "education", "kindergarten"),
            ("141201", "education", "kindergarten"),
            ("141202", "child", "nursery"),
            ("141300", "education", "primary"),
            ("141301", "education", "primary"),
            ("141400", "education", "secondary"),
            ("141401", "education", "secondary"),
            ("141402", "education", "secondary"),
            // 養老
            ("100105", "elderly", "elderly_center"),
            ("100106", "elderly", "elderly_center"),
            ("100107", "elderly", "elderly_center"),
            // 商業
            ("060100", "commerce", "supermarket"),
            ("060400", "commerce", "supermarket"),
            ("060401", "commerce", "supermarket"),
            ("060402", "commerce", "convenience"),
            ("060500", "commerce", "market"),
            ("060501", "commerce", "market"),
            ("050100", "commerce", "restaurant"),
            ("050200", "commerce", "restaurant"),
            ("050300", "commerce", "restaurant"),
            // 文化體育
            ("080100", "culture", "culture_center"),
            ("080300", "culture", "library"),
            ("080400", "culture", "culture_center"),
            ("080500", "culture", "culture_center"),
            ("080600", "culture", "culture_center"),
            ("080700", "culture", "culture_center"),
            ("110000", "culture", "park"),
            ("110100", "culture", "park"),
            ("110101", "culture", "park"),
            ("110102", "culture", "park"),
            ("110103", "culture", "park"),
            ("080101", "culture", "sports_field"),
            ("080102", "culture", "sports_field"),
            ("080103", "culture", "sports_field"),
            ("080104", "culture", "sports_field"),
            // 公共管理
            ("130100", "public", "community_service"),
            ("130105", "public", "community_service"),
            ("130300", "public", "police"),
            ("130301", "public", "police"),
            ("160100", "public", "bank"),
            ("160300", "public", "post"),
            // 交通
            ("150200", "transport", "bus_stop"),
            ("150201", "transport", "bus_stop"),
            ("150500", "transport", "metro"),
            ("150501", "transport", "metro"),
            ("150900", "transport", "parking"),
            ("150904", "transport", "bike_parking"),
            // 托育
            ("141203", "child", "nursery"),
            ("141204", "child", "nursery"),
        ];

        CODE_TO_TYPE
            .iter()
            .map(|&(code, category, sub_type)| (code, FacilityType { category, sub_type }))
            .collect()
    })
}

/// 多個類型碼以 `|` 串接時取第一個，超過 6 位時截斷
fn primary_code(code: &str) -> &str {
    let first = code.split('|').next().unwrap_or("").trim();
    first.get(..6).unwrap_or(first)
}

pub fn map_external_type(code: &str) -> FacilityType {
    let code = primary_code(code);
    let table = type_table();

    if let Some(mapping) = table.get(code) {
        return *mapping;
    }

    if let Some(prefix) = code.get(..4) {
        if let Some(mapping) = table.get(format!("{}00", prefix).as_str()) {
            return *mapping;
        }
    }

    DEFAULT_FACILITY_TYPE
}

/// 解析 "lng,lat"，格式錯誤回傳 None
pub fn parse_location(location: &str) -> Option<(f64, f64)> {
    let (lng, lat) = location.split_once(',')?;
    let lng = lng.trim().parse::<f64>().ok()?;
    let lat = lat.trim().parse::<f64>().ok()?;
    (lng.is_finite() && lat.is_finite()).then_some((lng, lat))
}

/// 外部設施轉為內部 POI；座標無法解析的直接丟棄
pub fn place_to_poi(place: &ExternalPlace) -> Option<Poi> {
    let Some((lng, lat)) = parse_location(&place.location) else {
        tracing::debug!("Dropping external place '{}' with bad location '{}'", place.name, place.location);
        return None;
    };
    let facility = map_external_type(&place.type_code);

    Some(Poi {
        id: None,
        name: place.name.clone(),
        category: facility.category.to_string(),
        sub_type: facility.sub_type.to_string(),
        lng,
        lat,
        address: (!place.address.is_empty()).then(|| place.address.clone()),
        tags: Vec::new(),
        distance_m: None,
        walk_time_min: None,
        source: PoiSource::External,
    })
}

pub fn places_to_pois(places: &[ExternalPlace]) -> Vec<Poi> {
    places.iter().filter_map(place_to_poi).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, type_code: &str, location: &str) -> ExternalPlace {
        ExternalPlace {
            name: name.to_string(),
            type_code: type_code.to_string(),
            location: location.to_string(),
            address: String::new(),
        }
    }

    #[test]
    fn test_exact_codes_map_to_table_entries() {
        assert_eq!(
            map_external_type("090500"),
            FacilityType { category: "medical", sub_type: "pharmacy" }
        );
        assert_eq!(
            map_external_type("141202"),
            FacilityType { category: "child", sub_type: "nursery" }
        );
        assert_eq!(
            map_external_type("150501"),
            FacilityType { category: "transport", sub_type: "metro" }
        );
    }

    #[test]
    fn test_every_table_entry_maps_to_itself() {
        for (code, expected) in type_table() {
            assert_eq!(map_external_type(code), *expected, "code {}", code);
        }
    }

    #[test]
    fn test_unknown_subcode_falls_back_to_four_digit_prefix() {
        // 090599 不在表內，退回 090500
        assert_eq!(
            map_external_type("090599"),
            FacilityType { category: "medical", sub_type: "pharmacy" }
        );
        assert_eq!(
            map_external_type("110199"),
            FacilityType { category: "culture", sub_type: "park" }
        );
    }

    #[test]
    fn test_unknown_codes_fall_back_to_default() {
        assert_eq!(map_external_type("999999"), DEFAULT_FACILITY_TYPE);
        assert_eq!(map_external_type(""), DEFAULT_FACILITY_TYPE);
        assert_eq!(map_external_type("12"), DEFAULT_FACILITY_TYPE);
        assert_eq!(map_external_type("中文类型码"), DEFAULT_FACILITY_TYPE);
    }

    #[test]
    fn test_mapper_is_total_over_six_digit_codes() {
        for n in (0..1_000_000u32).step_by(997) {
            let mapping = map_external_type(&format!("{:06}", n));
            assert!(!mapping.category.is_empty());
            assert!(!mapping.sub_type.is_empty());
        }
    }

    #[test]
    fn test_long_and_joined_codes_use_first_code() {
        assert_eq!(map_external_type("06040199").sub_type, "supermarket");
        assert_eq!(map_external_type("150200|150500").sub_type, "bus_stop");
    }

    #[test]
    fn test_place_to_poi_parses_location() {
        let poi = place_to_poi(&place("联华超市", "060401", "120.150000,30.280000")).unwrap();
        assert_eq!(poi.category, "commerce");
        assert_eq!(poi.sub_type, "supermarket");
        assert_eq!(poi.lng, 120.15);
        assert_eq!(poi.lat, 30.28);
        assert_eq!(poi.source, PoiSource::External);
        assert!(poi.id.is_none());
        assert!(poi.address.is_none());
    }

    #[test]
    fn test_place_with_bad_location_is_dropped() {
        assert!(place_to_poi(&place("x", "060401", "")).is_none());
        assert!(place_to_poi(&place("x", "060401", "120.15")).is_none());
        assert!(place_to_poi(&place("x", "060401", "abc,30.28")).is_none());

        let places = vec![
            place("a", "060401", "120.1,30.1"),
            place("b", "060401", "bad"),
        ];
        assert_eq!(places_to_pois(&places).len(), 1);
    }
}
