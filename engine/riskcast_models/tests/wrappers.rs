use pretty_assertions::assert_eq;
use riskcast_models::{
    CycloneFeatures, CycloneModel, FloodingFeatures, FloodingModel, LinearModel, RainfallModel,
};
use riskcast_records::parse_hourly;
use riskcast_score::RainfallIntensity;
use serde_json::json;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn open_meteo_to_rainfall_forecast() {
    init_logger();
    let payload = json!({
        "hourly": {
            "time": ["2024-06-01T00:00", "2024-06-01T01:00", "2024-06-01T02:00"],
            "relative_humidity_2m": [95, 95],
            "pressure_msl": [1002.0, 1002.0, 1002.0]
        }
    });
    let obs = parse_hourly(&payload);
    let out = RainfallModel::fallback().forecast_hourly(&obs, 48);
    assert_eq!(out.len(), 3);
    // cloud cover defaults to 0 so the fallback rule never fires
    assert!(out.iter().all(|(_, f)| f.predicted_rainfall_mm == 0.0));
    assert!(out.iter().all(|(_, f)| f.intensity == RainfallIntensity::Light));
}

#[test]
fn model_files_switch_confidence() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();

    let rain_path = dir.path().join("rainfall.json");
    LinearModel::new("rain-v1", vec![0.0, 0.1, 0.0, 0.0, 0.0, 0.0], 0.0)
        .save(&rain_path)
        .unwrap();
    let flood_path = dir.path().join("flooding.json");
    LinearModel::new("flood-v1", vec![0.0; 8], 0.0).save(&flood_path).unwrap();

    let rain = RainfallModel::load(Some(rain_path.as_path()));
    assert!(rain.is_loaded());
    assert_eq!(rain.predict(&Default::default()).confidence_score, 0.75);

    let flood = FloodingModel::load(Some(flood_path.as_path()));
    assert_eq!(flood.model_name(), Some("flood-v1"));
    assert_eq!(flood.predict(&FloodingFeatures::default()).confidence_score, 0.70);

    // wrong width: the flooding file cannot drive the cyclone wrapper
    let cyclone = CycloneModel::load(Some(flood_path.as_path()));
    assert!(!cyclone.is_loaded());
    assert_eq!(cyclone.predict(&CycloneFeatures::default()).confidence_score, 0.50);
}

#[test]
fn forecasts_serialize_for_the_api() {
    let f = CycloneModel::fallback().predict(&CycloneFeatures::default());
    let v = serde_json::to_value(&f).unwrap();
    assert_eq!(v["category"], json!(0));
    assert_eq!(v["path_coordinates"].as_array().map(Vec::len), Some(12));
    assert_eq!(v["risk_category"], json!("Low"));
}
