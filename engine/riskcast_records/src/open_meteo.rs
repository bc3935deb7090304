//! Hourly payloads from the Open-Meteo forecast and archive APIs.

use serde_json::Value;

use crate::record::WeatherObservation;

/// Hourly variables requested from Open-Meteo.
pub const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,precipitation,pressure_msl,wind_speed_10m,wind_direction_10m,cloud_cover";

fn series<'a>(hourly: &'a Value, key: &str) -> &'a [Value] {
    hourly
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn at(values: &[Value], i: usize) -> Option<f64> {
    values.get(i).and_then(Value::as_f64).filter(|x| x.is_finite())
}

/// One observation per entry of `hourly.time`.
///
/// Error payloads and payloads without `hourly` give an empty list. A
/// variable array shorter than `time` leaves the missing hours as `None`.
pub fn parse_hourly(payload: &Value) -> Vec<WeatherObservation> {
    if payload.get("error").is_some() {
        log::debug!("open-meteo payload carries an error; no observations");
        return Vec::new();
    }
    let Some(hourly) = payload.get("hourly") else {
        return Vec::new();
    };

    let temperature = series(hourly, "temperature_2m");
    let humidity = series(hourly, "relative_humidity_2m");
    let precipitation = series(hourly, "precipitation");
    let pressure = series(hourly, "pressure_msl");
    let wind = series(hourly, "wind_speed_10m");
    let direction = series(hourly, "wind_direction_10m");
    let cloud = series(hourly, "cloud_cover");

    series(hourly, "time")
        .iter()
        .enumerate()
        .map(|(i, t)| WeatherObservation {
            timestamp: t.as_str().unwrap_or_default().to_string(),
            temperature_celsius: at(temperature, i),
            humidity_percent: at(humidity, i),
            rainfall_mm: at(precipitation, i),
            air_pressure_hpa: at(pressure, i),
            wind_speed_kmh: at(wind, i),
            wind_direction: at(direction, i),
            cloud_cover_percent: at(cloud, i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn full_payload() {
        let payload = json!({
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "temperature_2m": [21.5, 21.0],
                "relative_humidity_2m": [80, 85],
                "precipitation": [0.0, 1.2],
                "pressure_msl": [1008.2, 1007.9],
                "wind_speed_10m": [12.0, 14.5],
                "wind_direction_10m": [180, 190],
                "cloud_cover": [70, 90]
            }
        });
        let obs = parse_hourly(&payload);
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[1].timestamp, "2024-06-01T01:00");
        assert_eq!(obs[1].rainfall_mm, Some(1.2));
        assert_eq!(obs[0].humidity_percent, Some(80.0));
        assert_eq!(obs[1].cloud_cover_percent, Some(90.0));
    }

    #[test]
    fn ragged_arrays_leave_gaps() {
        let payload = json!({
            "hourly": {
                "time": ["t0", "t1", "t2"],
                "temperature_2m": [20.0],
                "precipitation": [0.5, null, 2.0]
            }
        });
        let obs = parse_hourly(&payload);
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].temperature_celsius, Some(20.0));
        assert_eq!(obs[2].temperature_celsius, None);
        assert_eq!(obs[1].rainfall_mm, None);
        assert_eq!(obs[2].rainfall_mm, Some(2.0));
        assert_eq!(obs[0].air_pressure_hpa, None);
    }

    #[test]
    fn error_or_missing_hourly_is_empty() {
        assert!(parse_hourly(&json!({"error": "timeout"})).is_empty());
        assert!(parse_hourly(&json!({"daily": {}})).is_empty());
        assert!(parse_hourly(&json!({"hourly": {}})).is_empty());
        assert!(parse_hourly(&json!(null)).is_empty());
    }
}
