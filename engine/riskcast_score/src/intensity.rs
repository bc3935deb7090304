use std::fmt;

/// Qualitative rainfall intensity for a predicted amount in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RainfallIntensity {
    /// Below 2.5 mm.
    Light,
    /// 2.5 mm up to 10 mm.
    Moderate,
    /// 10 mm up to 50 mm.
    Heavy,
    /// 50 mm and above.
    Extreme,
}

impl RainfallIntensity {
    /// Bucket a rainfall amount. Non-finite or negative amounts are Light.
    pub fn from_mm(rainfall_mm: f64) -> Self {
        if rainfall_mm.is_nan() {
            return RainfallIntensity::Light;
        }
        match rainfall_mm {
            mm if mm < 2.5 => RainfallIntensity::Light,
            mm if mm < 10.0 => RainfallIntensity::Moderate,
            mm if mm < 50.0 => RainfallIntensity::Heavy,
            _ => RainfallIntensity::Extreme,
        }
    }

    /// Label as stored by the prediction backend.
    pub fn as_str(self) -> &'static str {
        match self {
            RainfallIntensity::Light => "Light",
            RainfallIntensity::Moderate => "Moderate",
            RainfallIntensity::Heavy => "Heavy",
            RainfallIntensity::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for RainfallIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_half_open() {
        assert_eq!(RainfallIntensity::from_mm(0.0), RainfallIntensity::Light);
        assert_eq!(RainfallIntensity::from_mm(2.49), RainfallIntensity::Light);
        assert_eq!(RainfallIntensity::from_mm(2.5), RainfallIntensity::Moderate);
        assert_eq!(RainfallIntensity::from_mm(10.0), RainfallIntensity::Heavy);
        assert_eq!(RainfallIntensity::from_mm(49.99), RainfallIntensity::Heavy);
        assert_eq!(RainfallIntensity::from_mm(50.0), RainfallIntensity::Extreme);
    }

    #[test]
    fn nan_is_light() {
        assert_eq!(RainfallIntensity::from_mm(f64::NAN), RainfallIntensity::Light);
    }
}
