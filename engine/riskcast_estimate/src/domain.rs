use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Hazard family whose formula should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Flooding and mudslide risk.
    Flooding,
    /// Tropical cyclone risk.
    Cyclone,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk domain '{0}' (expected 'flooding' or 'cyclone')")]
pub struct DomainParseError(pub String);

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Flooding => "flooding",
            Domain::Cyclone => "cyclone",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flooding" | "flood" | "mudslide" => Ok(Domain::Flooding),
            "cyclone" | "hurricane" | "typhoon" => Ok(Domain::Cyclone),
            _ => Err(DomainParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aliases_parse() {
        assert_eq!("flooding".parse::<Domain>(), Ok(Domain::Flooding));
        assert_eq!("Mudslide".parse::<Domain>(), Ok(Domain::Flooding));
        assert_eq!(" cyclone ".parse::<Domain>(), Ok(Domain::Cyclone));
        assert_eq!("typhoon".parse::<Domain>(), Ok(Domain::Cyclone));
    }

    #[test]
    fn unknown_domain_is_error() {
        let err = "earthquake".parse::<Domain>().unwrap_err();
        assert!(err.to_string().contains("earthquake"));
    }
}
