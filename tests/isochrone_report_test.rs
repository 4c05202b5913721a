use httpmock::prelude::*;
use life_circle::domain::model::{EvaluationRequest, IsochroneRequest};
use life_circle::utils::validation::Validate;
use life_circle::{AmapClient, AppConfig, GeoEngineClient, IsochroneService, LifeCircleEvaluator, LocalStorage, ReportWriter};
use serde_json::json;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use tokio_test::assert_ok;

fn polygon(size: f64) -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[120.0, 30.0], [120.0 + size, 30.0], [120.0 + size, 30.0 + size], [120.0, 30.0]]]
    })
}

#[tokio::test]
async fn test_isochrone_request_is_normalized_before_engine_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/isochrones")
                .json_body(json!({ "lng": 120.15, "lat": 30.28, "thresholds": [5, 15], "walk_speed": 12.0 }));
            then.status(200).json_body(json!([
                { "minutes": 15, "distance_m": 3000.0, "geometry": polygon(0.03) },
                { "minutes": 5, "distance_m": 1000.0, "geometry": polygon(0.01) }
            ]));
        })
        .await;

    let geo = GeoEngineClient::new(&server.base_url(), std::time::Duration::from_secs(5)).unwrap();
    let service = IsochroneService::new(&geo);
    let request = IsochroneRequest {
        lng: Some(120.15),
        lat: Some(30.28),
        time_thresholds: vec![15, 5, 15],
        walk_speed: Some(12.0),
    };

    let result = assert_ok!(service.calculate(&request).await);
    mock.assert_async().await;

    let minutes: Vec<u32> = result.polygons.iter().map(|p| p.minutes).collect();
    assert_eq!(minutes, vec![5, 15]);

    let collection = assert_ok!(service.calculate_as_geojson(&request).await);
    let value = serde_json::to_value(&collection).unwrap();
    assert_eq!(value["features"][0]["properties"]["minutes"], 15);
    assert_eq!(value["features"][1]["properties"]["minutes"], 5);
    assert_eq!(value["features"][2]["geometry"]["coordinates"], json!([120.15, 30.28]));
}

#[tokio::test]
async fn test_config_file_drives_evaluation_and_report() {
    let geo_server = MockServer::start_async().await;
    geo_server
        .mock_async(|when, then| {
            when.method(POST).path("/evaluate");
            then.status(200).json_body(json!([
                {
                    "total_score": 91.0,
                    "grade": "A",
                    "category": "commerce",
                    "category_name": "商业服务",
                    "weight": 0.15,
                    "category_score": 95.0,
                    "weighted_score": 14.25,
                    "poi_count": 20,
                    "details": null
                }
            ]));
        })
        .await;
    geo_server
        .mock_async(|when, then| {
            when.method(POST).path("/isochrones");
            then.status(200).json_body(json!([
                { "minutes": 5, "distance_m": 291.7, "geometry": polygon(0.01) },
                { "minutes": 10, "distance_m": 583.3, "geometry": polygon(0.02) },
                { "minutes": 15, "distance_m": 875.0, "geometry": polygon(0.03) }
            ]));
        })
        .await;
    let poi_mock = geo_server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pois/in-isochrone")
                .json_body(json!({ "lng": 120.15, "lat": 30.28, "minutes": 10, "walk_speed": 3.0 }));
            then.status(200).json_body(json!([
                { "id": 3, "name": "菜市场", "category": "commerce", "sub_type": "marketplace", "lng": 120.152, "lat": 30.279 }
            ]));
        })
        .await;

    let output_dir = TempDir::new().unwrap();
    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[geo_engine]
endpoint = "{}"
timeout_seconds = 5

[amap]
key = ""

[evaluation]
timeout_seconds = 10
time_threshold = 10
walk_speed = 1.0

[output]
path = "{}"
"#,
        geo_server.base_url(),
        output_dir.path().to_string_lossy().replace('\\', "/")
    )
    .unwrap();

    let config = assert_ok!(AppConfig::from_file(config_file.path()));
    assert_ok!(config.validate());
    assert!(!config.amap.is_enabled());

    let evaluator = LifeCircleEvaluator::new(
        assert_ok!(GeoEngineClient::from_config(&config.geo_engine)),
        assert_ok!(AmapClient::from_config(&config.amap)),
    )
    .with_timeout(config.evaluation.timeout());

    // 步速 1.0 會被夾到 3.0
    let request = EvaluationRequest {
        time_threshold: config.evaluation.time_threshold,
        walk_speed: config.evaluation.walk_speed,
        ..EvaluationRequest::at(120.15, 30.28)
    };
    let params = assert_ok!(request.normalize());
    let result = assert_ok!(evaluator.evaluate(&request).await);
    poi_mock.assert_async().await;
    assert_eq!(result.merged_pois.len(), 1);

    let writer = ReportWriter::new(LocalStorage::new(config.output.path()), config.output.write_poi_csv());
    let paths = assert_ok!(writer.write_evaluation(&params, &result).await);

    let report: serde_json::Value = serde_json::from_slice(&std::fs::read(&paths.report).unwrap()).unwrap();
    assert_eq!(report["result"]["grade"], "A");
    assert_eq!(report["request"]["walk_speed"], 3.0);
    assert_eq!(report["request"]["origin"], json!([120.15, 30.28]));

    let csv = std::fs::read_to_string(paths.pois.unwrap()).unwrap();
    assert!(csv.contains("菜市场"));
    assert!(csv.lines().nth(1).unwrap().ends_with(",local"));
}
