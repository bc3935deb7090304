//! Client-side view of the prediction backend.
//!
//! Typed rows for locations and predictions, normalization of the several
//! response envelopes the API uses, request descriptions built from an
//! explicit session, and an in-memory source for offline dashboards.

pub mod decimal;
pub mod display;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod open_meteo;
pub mod record;
pub mod session;
pub mod source;

pub use display::{DisplayRow, ScoredRecord};
pub use envelope::ApiResponse;
pub use error::RecordsError;
pub use filter::{Filterable, RecordFilter};
pub use open_meteo::{parse_hourly, HOURLY_FIELDS};
pub use record::{
    CyclonePrediction, FloodingPrediction, Location, LocationParameters, PathPoint,
    RainfallPrediction, TrackTime, WeatherObservation,
};
pub use session::{Endpoints, Method, RequestSpec, Resource, Session, SessionContext};
pub use source::{InMemorySource, PredictionSource};
