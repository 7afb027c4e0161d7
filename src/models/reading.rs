use serde::{Deserialize, Serialize};

/// One measurement row as exported by the monitoring station.
///
/// Pollutant concentrations are in µg/m³. Empty fields deserialize to
/// `None`; negative concentrations indicate a sensor fault and are kept
/// verbatim so they can be counted before exclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReading {
    pub timestamp: String,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
}

/// Validity category of a single pollutant value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Missing,
    /// Below zero: physically impossible, treated as a sensor fault.
    Negative,
}

impl Validity {
    pub fn of(value: Option<f64>) -> Self {
        match value {
            None => Validity::Missing,
            Some(v) if v < 0.0 => Validity::Negative,
            Some(_) => Validity::Valid,
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

impl RawReading {
    pub fn pm10_validity(&self) -> Validity {
        Validity::of(self.pm10)
    }

    pub fn pm2_5_validity(&self) -> Validity {
        Validity::of(self.pm2_5)
    }

    /// PM10 value if present and non-negative, the only form the
    /// aggregators ever consume.
    pub fn usable_pm10(&self) -> Option<f64> {
        self.pm10.filter(|v| *v >= 0.0)
    }

    pub fn usable_pm2_5(&self) -> Option<f64> {
        self.pm2_5.filter(|v| *v >= 0.0)
    }
}
