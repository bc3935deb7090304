//! Lenient decimal fields.
//!
//! Postgres `numeric` columns reach the client as JSON strings (`"4.90"`)
//! or numbers depending on the serializer. Both are accepted here;
//! unparseable or non-finite values become `None`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Num(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl Loose {
    fn into_f64(self) -> Option<f64> {
        let raw = match self {
            Loose::Num(x) => Some(x),
            Loose::Text(s) => s.trim().parse::<f64>().ok(),
            Loose::Other(_) => None,
        };
        raw.filter(|x| x.is_finite())
    }
}

/// `Option<f64>` field; missing, null or garbage is `None`.
pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?.and_then(Loose::into_f64))
}

/// `f64` field; missing, null or garbage is `0.0`.
pub fn or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(optional(d)?.unwrap_or(0.0))
}

/// `f64` field; missing, null or garbage is the scale midpoint `5.0`.
pub fn or_five<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(optional(d)?.unwrap_or(5.0))
}
