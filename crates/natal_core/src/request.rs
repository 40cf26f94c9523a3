//! Request body sent to the ephemeris proxy.
//!
//! The proxy forwards the body unchanged to the provider's planets endpoint,
//! which expects flat birth fields plus a small `config` object.

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::placement::DEFAULT_LANGUAGE;

/// Provider-side calculation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    pub observation_point: String,
    pub ayanamsha: String,
    pub language: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            observation_point: "topocentric".to_string(),
            ayanamsha: "tropical".to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Birth moment and place, in local civil time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthRequest {
    pub year: i32,
    pub month: u32,
    /// Day of month.
    pub date: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Geographic latitude in degrees, north positive.
    pub latitude: f64,
    /// Geographic longitude in degrees, east positive.
    pub longitude: f64,
    /// Offset from UTC in hours (may be fractional).
    pub timezone: f64,
    #[serde(default)]
    pub config: RequestConfig,
}

impl BirthRequest {
    /// Check field ranges before sending.
    pub fn validate(&self) -> Result<(), ChartError> {
        let check = |ok: bool, msg: &'static str| {
            if ok {
                Ok(())
            } else {
                Err(ChartError::InvalidBirthData(msg))
            }
        };
        check((1..=12).contains(&self.month), "month must be 1-12")?;
        check((1..=31).contains(&self.date), "date must be 1-31")?;
        check(self.hours <= 23, "hours must be 0-23")?;
        check(self.minutes <= 59, "minutes must be 0-59")?;
        check(self.seconds <= 59, "seconds must be 0-59")?;
        check(
            self.latitude.is_finite() && self.latitude.abs() <= 90.0,
            "latitude must be within [-90, 90]",
        )?;
        check(
            self.longitude.is_finite() && self.longitude.abs() <= 180.0,
            "longitude must be within [-180, 180]",
        )?;
        check(
            self.timezone.is_finite() && self.timezone.abs() <= 14.0,
            "timezone must be within [-14, 14] hours",
        )
    }

    /// Validate and serialize to the JSON body.
    pub fn to_json(&self) -> Result<String, ChartError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }
}
