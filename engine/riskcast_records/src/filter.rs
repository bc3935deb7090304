use crate::record::{CyclonePrediction, FloodingPrediction, RainfallPrediction};

/// Fields a [`RecordFilter`] can test.
pub trait Filterable {
    /// `None` for records not tied to one location (cyclones).
    fn location_id(&self) -> Option<&str>;
    fn record_date(&self) -> &str;
    fn historical(&self) -> bool;
}

impl Filterable for RainfallPrediction {
    fn location_id(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn record_date(&self) -> &str {
        &self.prediction_date
    }
    fn historical(&self) -> bool {
        self.is_historical
    }
}

impl Filterable for FloodingPrediction {
    fn location_id(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn record_date(&self) -> &str {
        &self.prediction_date
    }
    fn historical(&self) -> bool {
        self.is_historical
    }
}

impl Filterable for CyclonePrediction {
    fn location_id(&self) -> Option<&str> {
        None
    }
    fn record_date(&self) -> &str {
        &self.prediction_date
    }
    fn historical(&self) -> bool {
        self.is_historical
    }
}

/// Query filter accepted by the prediction list endpoints. Date bounds are
/// inclusive `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub location_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_historical: Option<bool>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, id: impl Into<String>) -> Self {
        self.location_id = Some(id.into());
        self
    }

    pub fn between(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn historical(mut self, yes: bool) -> Self {
        self.is_historical = Some(yes);
        self
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        if let (Some(want), Some(have)) = (&self.location_id, record.location_id()) {
            if want != have {
                return false;
            }
        }
        // only the date part takes part in the comparison
        let date = record.record_date().get(..10).unwrap_or(record.record_date());
        if let Some(start) = &self.start_date {
            if date < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.end_date {
            if date > end.as_str() {
                return false;
            }
        }
        match self.is_historical {
            Some(h) => h == record.historical(),
            None => true,
        }
    }

    /// Query-string pairs in the backend's parameter names.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        if let Some(id) = &self.location_id {
            q.push(("location_id".to_string(), id.clone()));
        }
        if let Some(d) = &self.start_date {
            q.push(("start_date".to_string(), d.clone()));
        }
        if let Some(d) = &self.end_date {
            q.push(("end_date".to_string(), d.clone()));
        }
        if let Some(h) = self.is_historical {
            q.push(("is_historical".to_string(), h.to_string()));
        }
        q
    }
}
