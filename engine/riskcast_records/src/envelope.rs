use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::RecordsError;

/// Every response shape the prediction backend produces for a list of `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    /// `{"error": "..."}` or a lone `{"detail": "..."}`.
    Error(String),
    /// `{"count": n, "next": url, "results": [...]}`
    Paginated {
        results: Vec<T>,
        count: Option<u64>,
        next: Option<String>,
    },
    /// `{"predictions": [...]}` from the predict actions.
    Predictions(Vec<T>),
    /// `{"data": [...], "count": n}` from the weather fetch action.
    Data { data: Vec<T>, count: Option<u64> },
    /// A bare JSON array.
    List(Vec<T>),
    /// A single bare object.
    Single(T),
}

fn message(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn take_list<T: DeserializeOwned>(obj: &mut Map<String, Value>, key: &str) -> Result<Vec<T>, RecordsError> {
    match obj.remove(key) {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(v @ Value::Array(_)) => Ok(serde_json::from_value(v)?),
        Some(other) => Err(RecordsError::Shape(format!(
            "'{key}' should be a list, found {}",
            kind(&other)
        ))),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Classify an already parsed payload.
    pub fn from_value(value: Value) -> Result<Self, RecordsError> {
        let mut obj = match value {
            Value::Array(items) => {
                return Ok(ApiResponse::List(serde_json::from_value(Value::Array(items))?))
            }
            Value::Object(obj) => obj,
            Value::Null => return Err(RecordsError::Empty),
            other => {
                return Err(RecordsError::Shape(format!(
                    "expected an object or list, found {}",
                    kind(&other)
                )))
            }
        };

        if let Some(err) = obj.get("error") {
            return Ok(ApiResponse::Error(message(err)));
        }
        if obj.len() == 1 {
            if let Some(detail) = obj.get("detail") {
                return Ok(ApiResponse::Error(message(detail)));
            }
        }

        let count = obj.get("count").and_then(Value::as_u64);
        if obj.contains_key("results") {
            let next = obj.get("next").and_then(Value::as_str).map(str::to_owned);
            let results = take_list(&mut obj, "results")?;
            return Ok(ApiResponse::Paginated { results, count, next });
        }
        if obj.contains_key("predictions") {
            return Ok(ApiResponse::Predictions(take_list(&mut obj, "predictions")?));
        }
        if obj.contains_key("data") {
            let data = take_list(&mut obj, "data")?;
            return Ok(ApiResponse::Data { data, count });
        }
        if obj.is_empty() {
            return Err(RecordsError::Empty);
        }
        Ok(ApiResponse::Single(serde_json::from_value(Value::Object(obj))?))
    }

    pub fn from_json(text: &str) -> Result<Self, RecordsError> {
        Self::from_value(serde_json::from_str(text)?)
    }
}

impl<T> ApiResponse<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, ApiResponse::Error(_))
    }

    /// Flatten to a plain list. Error payloads become [`RecordsError::Api`].
    pub fn into_records(self) -> Result<Vec<T>, RecordsError> {
        match self {
            ApiResponse::Error(msg) => Err(RecordsError::Api(msg)),
            ApiResponse::Paginated { results, count, .. } => {
                if let Some(n) = count {
                    if n as usize != results.len() {
                        log::debug!("paginated response: page holds {} of {n} records", results.len());
                    }
                }
                Ok(results)
            }
            ApiResponse::Predictions(list) | ApiResponse::List(list) => Ok(list),
            ApiResponse::Data { data, .. } => Ok(data),
            ApiResponse::Single(one) => Ok(vec![one]),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        ApiResponse::from_value(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FloodingPrediction;
    use pretty_assertions::assert_eq;

    fn ids(resp: ApiResponse<FloodingPrediction>) -> Vec<String> {
        resp.into_records().unwrap().into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn every_list_shape_normalizes() {
        let shapes = [
            r#"{"count": 2, "next": null, "results": [{"id": "a"}, {"id": "b"}]}"#,
            r#"{"predictions": [{"id": "a"}, {"id": "b"}]}"#,
            r#"{"data": [{"id": "a"}, {"id": "b"}], "count": 2}"#,
            r#"[{"id": "a"}, {"id": "b"}]"#,
        ];
        for text in shapes {
            let resp = ApiResponse::<FloodingPrediction>::from_json(text).unwrap();
            assert_eq!(ids(resp), vec!["a", "b"], "{text}");
        }
    }

    #[test]
    fn bare_object_is_single() {
        let resp = ApiResponse::<FloodingPrediction>::from_json(r#"{"id": "x", "risk_score": 3}"#).unwrap();
        assert!(matches!(resp, ApiResponse::Single(_)));
        assert_eq!(ids(resp), vec!["x"]);
    }

    #[test]
    fn error_payloads() {
        let resp = ApiResponse::<FloodingPrediction>::from_json(r#"{"error": "Location not found"}"#).unwrap();
        assert!(resp.is_error());
        match resp.into_records() {
            Err(RecordsError::Api(msg)) => assert_eq!(msg, "Location not found"),
            other => panic!("unexpected {other:?}"),
        }

        let resp = ApiResponse::<FloodingPrediction>::from_json(
            r#"{"detail": "Authentication credentials were not provided."}"#,
        )
        .unwrap();
        assert!(resp.is_error());
    }

    #[test]
    fn empty_and_odd_payloads() {
        assert!(matches!(
            ApiResponse::<FloodingPrediction>::from_json("null"),
            Err(RecordsError::Empty)
        ));
        assert!(matches!(
            ApiResponse::<FloodingPrediction>::from_json("{}"),
            Err(RecordsError::Empty)
        ));
        assert!(matches!(
            ApiResponse::<FloodingPrediction>::from_json("42"),
            Err(RecordsError::Shape(_))
        ));
        assert!(matches!(
            ApiResponse::<FloodingPrediction>::from_json(r#"{"results": "nope"}"#),
            Err(RecordsError::Shape(_))
        ));
        assert!(matches!(
            ApiResponse::<FloodingPrediction>::from_json("{not json"),
            Err(RecordsError::Json(_))
        ));
    }

    #[test]
    fn empty_list_is_ok() {
        let resp = ApiResponse::<FloodingPrediction>::from_json(r#"{"results": []}"#).unwrap();
        assert!(resp.into_records().unwrap().is_empty());
    }

    #[test]
    fn deserialize_impl_uses_same_rules() {
        let resp: ApiResponse<FloodingPrediction> =
            serde_json::from_str(r#"{"predictions": [{"id": "p"}]}"#).unwrap();
        assert_eq!(ids(resp), vec!["p"]);
    }
}
