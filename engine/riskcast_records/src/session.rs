//! Sessions and request descriptions for the prediction API.
//!
//! Nothing here performs I/O. [`Endpoints`] turns a resource, an action and
//! the caller's [`SessionContext`] into a [`RequestSpec`] that any HTTP
//! client can execute.

use std::fmt;

use serde_json::Value;
use url::Url;

use crate::error::RecordsError;
use crate::filter::RecordFilter;

/// A signed-in user's bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// keep tokens out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Holds at most one session. Owned and passed around by the caller.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing session.
    pub fn sign_in(&mut self, session: Session) {
        log::info!(
            "signed in{}",
            session
                .user_id
                .as_deref()
                .map(|u| format!(" as {u}"))
                .unwrap_or_default()
        );
        self.current = Some(session);
    }

    /// Drop the session, returning it if there was one.
    pub fn sign_out(&mut self) -> Option<Session> {
        let old = self.current.take();
        if old.is_some() {
            log::info!("signed out");
        }
        old
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Collections served under `/api/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Locations,
    UserPreferences,
    RainfallPredictions,
    FloodingPredictions,
    CyclonePredictions,
    WeatherData,
    MlModels,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Locations => "locations",
            Resource::UserPreferences => "user-preferences",
            Resource::RainfallPredictions => "rainfall-predictions",
            Resource::FloodingPredictions => "flooding-predictions",
            Resource::CyclonePredictions => "cyclone-predictions",
            Resource::WeatherData => "weather-data",
            Resource::MlModels => "ml-models",
        }
    }
}

/// A fully described HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path component of [`RequestSpec::url`], e.g. `/api/locations/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    url: Url,
}

impl RequestSpec {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Absolute URL including the encoded query string.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Request builder rooted at the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse the API root. A path prefix such as `https://host/weather/` is
    /// kept in front of `/api/`.
    pub fn new(base_url: &str) -> Result<Self, RecordsError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(RecordsError::BaseUrl(base_url.to_string()));
        }
        Ok(Self { base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RecordsError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| RecordsError::BaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments)
            // trailing slash, as the backend routes expect
            .push("");
        Ok(url)
    }

    /// Build a request against `/api/<segments>/`. Segments are
    /// percent-encoded individually. Every endpoint requires
    /// authentication, so a signed-out context is an error.
    pub fn request(
        &self,
        ctx: &SessionContext,
        method: Method,
        segments: &[&str],
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<RequestSpec, RecordsError> {
        let mut url = self.endpoint(segments)?;
        let path = url.path().to_string();
        let session = ctx
            .session()
            .ok_or_else(|| RecordsError::SignedOut(path.clone()))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        let mut headers = vec![("Authorization".to_string(), session.authorization())];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        log::debug!("{} {path} ({} query params)", method.as_str(), query.len());

        Ok(RequestSpec {
            method,
            path,
            query,
            headers,
            body,
            url,
        })
    }

    pub fn list(
        &self,
        ctx: &SessionContext,
        resource: Resource,
        filter: &RecordFilter,
    ) -> Result<RequestSpec, RecordsError> {
        self.request(ctx, Method::Get, &[resource.path()], filter.to_query(), None)
    }

    pub fn retrieve(
        &self,
        ctx: &SessionContext,
        resource: Resource,
        id: &str,
    ) -> Result<RequestSpec, RecordsError> {
        self.request(ctx, Method::Get, &[resource.path(), id], Vec::new(), None)
    }

    /// `POST <resource>/predict/` for rainfall, flooding and cyclone.
    pub fn predict(
        &self,
        ctx: &SessionContext,
        resource: Resource,
        body: Value,
    ) -> Result<RequestSpec, RecordsError> {
        self.request(ctx, Method::Post, &[resource.path(), "predict"], Vec::new(), Some(body))
    }

    /// `GET locations/<id>/parameters/`
    pub fn location_parameters(
        &self,
        ctx: &SessionContext,
        location_id: &str,
    ) -> Result<RequestSpec, RecordsError> {
        self.request(
            ctx,
            Method::Get,
            &["locations", location_id, "parameters"],
            Vec::new(),
            None,
        )
    }

    /// `POST weather-data/fetch/`
    pub fn fetch_weather(
        &self,
        ctx: &SessionContext,
        location_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<RequestSpec, RecordsError> {
        let mut body = serde_json::Map::new();
        body.insert("location_id".into(), Value::from(location_id));
        if let Some(d) = start_date {
            body.insert("start_date".into(), Value::from(d));
        }
        if let Some(d) = end_date {
            body.insert("end_date".into(), Value::from(d));
        }
        self.request(
            ctx,
            Method::Post,
            &["weather-data", "fetch"],
            Vec::new(),
            Some(Value::Object(body)),
        )
    }
}
