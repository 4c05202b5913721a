use geojson::{FeatureCollection, Geometry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// WGS-84 經緯度，序列化為 `[lng, lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lng, value.lat]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiSource {
    #[default]
    Local,
    External,
}

impl PoiSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoiSource::Local => "local",
            PoiSource::External => "external",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// 外部來源的 POI 沒有 id
    pub id: Option<i64>,
    pub name: String,
    pub category: String,
    pub sub_type: String,
    pub lng: f64,
    pub lat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_time_min: Option<f64>,
    #[serde(default)]
    pub source: PoiSource,
}

impl Poi {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lng, self.lat)
    }
}

/// 外部地圖服務回傳的原始設施，尚未做類型映射
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalPlace {
    pub name: String,
    pub type_code: String,
    /// "lng,lat"
    pub location: String,
    pub address: String,
}

/// 空間包含查詢的單一點
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexedPoint {
    pub idx: usize,
    pub lng: f64,
    pub lat: f64,
}

/// 評價標準，參考《城市居住區規劃設計標準》GB 50180-2018
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStandard {
    pub category: String,
    pub sub_type: String,
    pub min_count_5: u32,
    pub min_count_10: u32,
    pub min_count_15: u32,
    pub required: bool,
    pub base_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiSubType {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub osm_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiCategory {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weight: f64,
    #[serde(default)]
    pub sub_types: Vec<PoiSubType>,
}

/// 地理引擎按分類彙總的一列評分結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub total_score: f64,
    pub grade: String,
    pub category: String,
    pub category_name: String,
    pub weight: f64,
    pub category_score: f64,
    pub weighted_score: f64,
    pub poi_count: u32,
    /// 子類型明細，可能是 JSON 陣列或編碼成字串的 JSON
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTypeScore {
    pub sub_type: String,
    #[serde(default)]
    pub name: String,
    pub count: u32,
    /// 標準要求數量
    pub required: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub name: String,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub poi_count: u32,
    pub has_required: bool,
    pub details: Vec<SubTypeScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    /// 分數邊界屬於較高的等級，NaN 視為 E
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 75.0 {
            Grade::B
        } else if score >= 60.0 {
            Grade::C
        } else if score >= 45.0 {
            Grade::D
        } else {
            Grade::E
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::A => "优秀：15分钟生活圈配套完善，各类设施齐全，居民生活便利度高",
            Grade::B => "良好：生活圈配套较为完善，基本满足日常生活需求",
            Grade::C => "一般：生活圈配套基本满足需求，部分设施有待完善",
            Grade::D => "较差：生活圈配套不足，多项设施缺失，建议重点改善",
            Grade::E => "差：生活圈配套严重不足，急需规划建设",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        };
        f.write_str(letter)
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            other => Err(format!("unknown grade code '{}'", other)),
        }
    }
}

/// 綜合評價請求；經緯度缺失時拒絕，其他參數補預設值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    #[serde(default)]
    pub time_threshold: Option<u32>,
    #[serde(default)]
    pub walk_speed: Option<f64>,
    /// 是否允許查詢外部地圖服務
    #[serde(default = "default_true")]
    pub use_external: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EvaluationRequest {
    fn default() -> Self {
        Self {
            lng: None,
            lat: None,
            time_threshold: None,
            walk_speed: None,
            use_external: true,
        }
    }
}

impl EvaluationRequest {
    pub fn at(lng: f64, lat: f64) -> Self {
        Self {
            lng: Some(lng),
            lat: Some(lat),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationParams {
    pub origin: Coordinate,
    pub time_threshold: u32,
    pub walk_speed: f64,
    pub use_external: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub origin: Coordinate,
    pub total_score: f64,
    pub grade: Grade,
    pub category_scores: Vec<CategoryScore>,
    pub isochrone: FeatureCollection,
    pub pois: FeatureCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roads: Option<serde_json::Value>,
    pub summary: String,
    pub suggestions: Vec<String>,
    /// 合併後的 POI 原始資料，報表輸出用
    #[serde(skip)]
    pub merged_pois: Vec<Poi>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsochroneRequest {
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    #[serde(default)]
    pub time_thresholds: Vec<u32>,
    #[serde(default)]
    pub walk_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsochroneParams {
    pub origin: Coordinate,
    /// 遞增且不重複
    pub time_thresholds: Vec<u32>,
    pub walk_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochronePolygon {
    pub minutes: u32,
    pub distance_m: f64,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsochroneResult {
    pub origin: Coordinate,
    pub polygons: Vec<IsochronePolygon>,
}

impl IsochroneResult {
    pub fn polygon_for(&self, minutes: u32) -> Option<&IsochronePolygon> {
        self.polygons.iter().find(|p| p.minutes == minutes)
    }

    pub fn largest(&self) -> Option<&IsochronePolygon> {
        self.polygons.iter().max_by_key(|p| p.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries_belong_to_higher_grade() {
        assert_eq!(Grade::from_score(100.0), Grade::A);
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.999), Grade::B);
        assert_eq!(Grade::from_score(75.0), Grade::B);
        assert_eq!(Grade::from_score(74.999), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::C);
        assert_eq!(Grade::from_score(45.0), Grade::D);
        assert_eq!(Grade::from_score(44.999), Grade::E);
        assert_eq!(Grade::from_score(0.0), Grade::E);
    }

    #[test]
    fn test_grade_mapping_is_total() {
        assert_eq!(Grade::from_score(-12.5), Grade::E);
        assert_eq!(Grade::from_score(f64::NAN), Grade::E);
        assert_eq!(Grade::from_score(f64::INFINITY), Grade::A);
        assert_eq!(Grade::from_score(f64::NEG_INFINITY), Grade::E);
    }

    #[test]
    fn test_grade_parses_padded_codes() {
        assert_eq!(" B ".parse::<Grade>().unwrap(), Grade::B);
        assert!("F".parse::<Grade>().is_err());
        assert!("".parse::<Grade>().is_err());
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::C).unwrap(), "\"C\"");
    }

    #[test]
    fn test_coordinate_serializes_as_pair() {
        let origin = Coordinate::new(120.15, 30.28);
        assert_eq!(serde_json::to_value(origin).unwrap(), serde_json::json!([120.15, 30.28]));
        let parsed: Coordinate = serde_json::from_str("[120.15,30.28]").unwrap();
        assert_eq!(parsed, origin);
    }

    #[test]
    fn test_poi_source_tags() {
        assert_eq!(serde_json::to_string(&PoiSource::External).unwrap(), "\"external\"");
        assert_eq!(PoiSource::Local.as_str(), "local");
    }
}
