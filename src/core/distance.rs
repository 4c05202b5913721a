use crate::domain::model::{
    Coordinate, EvaluationParams, EvaluationRequest, IsochroneParams, IsochroneRequest,
};
use crate::utils::error::{LifeCircleError, Result};

pub const DEFAULT_WALK_SPEED_KMH: f64 = 5.0;
pub const MIN_EVALUATION_WALK_SPEED_KMH: f64 = 3.0;
pub const MAX_EVALUATION_WALK_SPEED_KMH: f64 = 7.0;
pub const DEFAULT_TIME_THRESHOLDS: [u32; 3] = [5, 10, 15];
pub const DEFAULT_EVALUATION_MINUTES: u32 = 15;

/// km/h * min * 1000 / 60 = 公尺
pub fn distance_for_time(walk_speed_kmh: f64, minutes: u32) -> f64 {
    walk_speed_kmh * f64::from(minutes) * 1000.0 / 60.0
}

pub fn max_distance(walk_speed_kmh: f64, time_thresholds: &[u32]) -> f64 {
    let max_minutes = time_thresholds.iter().copied().max().unwrap_or(0);
    distance_for_time(walk_speed_kmh, max_minutes)
}

/// 缺值、非正數或 NaN 一律改用預設步速
pub fn normalize_walk_speed(walk_speed: Option<f64>) -> f64 {
    match walk_speed {
        Some(speed) if speed > 0.0 => speed,
        _ => DEFAULT_WALK_SPEED_KMH,
    }
}

/// 綜合評價的步速限制在 [3.0, 7.0]；等時圈請求不經過這裡
pub fn clamp_evaluation_walk_speed(walk_speed: Option<f64>) -> f64 {
    normalize_walk_speed(walk_speed).clamp(MIN_EVALUATION_WALK_SPEED_KMH, MAX_EVALUATION_WALK_SPEED_KMH)
}

/// 排序去重；空集合時回傳 {5, 10, 15}
pub fn normalize_thresholds(time_thresholds: &[u32]) -> Vec<u32> {
    let mut thresholds: Vec<u32> = time_thresholds.to_vec();
    thresholds.sort_unstable();
    thresholds.dedup();
    if thresholds.is_empty() {
        return DEFAULT_TIME_THRESHOLDS.to_vec();
    }
    thresholds
}

fn require_origin(lng: Option<f64>, lat: Option<f64>) -> Result<Coordinate> {
    match (lng, lat) {
        (Some(lng), Some(lat)) if lng.is_finite() && lat.is_finite() => {
            Ok(Coordinate::new(lng.clamp(-180.0, 180.0), lat.clamp(-90.0, 90.0)))
        }
        (Some(_), Some(_)) => Err(LifeCircleError::ValidationError {
            message: "origin coordinate must be a finite number".to_string(),
        }),
        _ => Err(LifeCircleError::ValidationError {
            message: "origin coordinate (lng, lat) is required".to_string(),
        }),
    }
}

impl EvaluationRequest {
    pub fn normalize(&self) -> Result<EvaluationParams> {
        let origin = require_origin(self.lng, self.lat)?;
        let time_threshold = match self.time_threshold {
            Some(minutes) if minutes > 0 => minutes,
            _ => DEFAULT_EVALUATION_MINUTES,
        };

        Ok(EvaluationParams {
            origin,
            time_threshold,
            walk_speed: clamp_evaluation_walk_speed(self.walk_speed),
            use_external: self.use_external,
        })
    }
}

impl IsochroneRequest {
    pub fn normalize(&self) -> Result<IsochroneParams> {
        let origin = require_origin(self.lng, self.lat)?;

        Ok(IsochroneParams {
            origin,
            time_thresholds: normalize_thresholds(&self.time_thresholds),
            walk_speed: normalize_walk_speed(self.walk_speed),
        })
    }
}

impl IsochroneParams {
    pub fn max_distance_m(&self) -> f64 {
        max_distance(self.walk_speed, &self.time_thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_for_time_is_exact_over_speed_range() {
        for tenths in 30..=70 {
            let speed = f64::from(tenths) / 10.0;
            for minutes in [0u32, 1, 5, 7, 10, 15, 30, 60] {
                assert_eq!(
                    distance_for_time(speed, minutes),
                    speed * f64::from(minutes) * 1000.0 / 60.0
                );
            }
        }
    }

    #[test]
    fn test_max_distance_uses_largest_threshold() {
        assert_eq!(max_distance(5.0, &[5, 10, 15]), 1250.0);
        assert_eq!(max_distance(5.0, &[15, 5]), 1250.0);
        assert_eq!(max_distance(5.0, &[]), 0.0);
    }

    #[test]
    fn test_scenario_max_distance_for_default_request() {
        let params = IsochroneRequest {
            lng: Some(120.15),
            lat: Some(30.28),
            time_thresholds: vec![5, 10, 15],
            walk_speed: Some(5.0),
        }
        .normalize()
        .unwrap();

        assert_eq!(params.max_distance_m(), 5.0 * 15.0 * 1000.0 / 60.0);
        assert_eq!(params.max_distance_m(), 1250.0);
    }

    #[test]
    fn test_walk_speed_defaults() {
        assert_eq!(normalize_walk_speed(None), 5.0);
        assert_eq!(normalize_walk_speed(Some(0.0)), 5.0);
        assert_eq!(normalize_walk_speed(Some(-2.0)), 5.0);
        assert_eq!(normalize_walk_speed(Some(f64::NAN)), 5.0);
        assert_eq!(normalize_walk_speed(Some(9.5)), 9.5);
    }

    #[test]
    fn test_evaluation_speed_is_clamped() {
        assert_eq!(clamp_evaluation_walk_speed(Some(1.0)), 3.0);
        assert_eq!(clamp_evaluation_walk_speed(Some(12.0)), 7.0);
        assert_eq!(clamp_evaluation_walk_speed(Some(4.2)), 4.2);
        assert_eq!(clamp_evaluation_walk_speed(Some(0.0)), 5.0);
    }

    #[test]
    fn test_isochrone_request_keeps_unclamped_speed() {
        let params = IsochroneRequest {
            lng: Some(120.15),
            lat: Some(30.28),
            time_thresholds: vec![],
            walk_speed: Some(9.0),
        }
        .normalize()
        .unwrap();

        assert_eq!(params.walk_speed, 9.0);
        assert_eq!(params.time_thresholds, vec![5, 10, 15]);
    }

    #[test]
    fn test_thresholds_sorted_and_deduplicated() {
        assert_eq!(normalize_thresholds(&[15, 5, 10, 5]), vec![5, 10, 15]);
    }

    #[test]
    fn test_evaluation_request_defaults() {
        let params = EvaluationRequest::at(120.15, 30.28).normalize().unwrap();
        assert_eq!(params.origin, Coordinate::new(120.15, 30.28));
        assert_eq!(params.time_threshold, 15);
        assert_eq!(params.walk_speed, 5.0);
        assert!(params.use_external);
    }

    #[test]
    fn test_missing_origin_is_rejected() {
        let request = EvaluationRequest {
            lng: Some(120.15),
            ..EvaluationRequest::default()
        };
        assert!(matches!(
            request.normalize(),
            Err(LifeCircleError::ValidationError { .. })
        ));
        assert!(IsochroneRequest::default().normalize().is_err());
    }

    #[test]
    fn test_out_of_range_origin_is_clamped() {
        let params = EvaluationRequest::at(200.0, -95.0).normalize().unwrap();
        assert_eq!(params.origin, Coordinate::new(180.0, -90.0));
    }
}
