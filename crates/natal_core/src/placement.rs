//! Celestial placements and the ephemeris wire records they are built from.
//!
//! The ephemeris provider reports each body as
//! `{ planet: {<lang>: name}, fullDegree, isRetro, zodiac_sign: { number, name } }`.
//! Its numeric fields are loosely typed (numbers, numeric strings, or absent),
//! so conversion is lenient: an unusable longitude becomes 0 degrees and an
//! unusable retrograde flag becomes `false`. These defaults change observable
//! chart output and are kept as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChartError;
use crate::sign::{ZodiacSign, sign_index_from_longitude};
use crate::util::normalize_360;

/// Language key used when the requested language has no name.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A body's position at chart time. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CelestialPlacement {
    /// Display names keyed by language; the canonical name lives under "en".
    names: BTreeMap<String, String>,
    /// Ecliptic longitude in [0, 360).
    longitude: f64,
    is_retrograde: bool,
    /// 1-based sign number (Aries = 1), when known.
    sign_number: Option<u8>,
}

impl CelestialPlacement {
    /// Placement with a canonical name; the sign is derived from the longitude.
    pub fn new(name: impl Into<String>, longitude_deg: f64) -> Self {
        let mut names = BTreeMap::new();
        names.insert(DEFAULT_LANGUAGE.to_string(), name.into());
        Self {
            names,
            longitude: normalize_360(longitude_deg),
            is_retrograde: false,
            sign_number: Some(ZodiacSign::from_longitude(longitude_deg).number()),
        }
    }

    pub fn retrograde(mut self, is_retrograde: bool) -> Self {
        self.is_retrograde = is_retrograde;
        self
    }

    /// Add or replace the display name for `language`.
    pub fn with_name(mut self, language: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(language.into(), name.into());
        self
    }

    /// Override the sign number (1..=12); anything else clears it.
    pub fn with_sign_number(mut self, sign_number: Option<u8>) -> Self {
        self.sign_number = sign_number.filter(|n| (1..=12).contains(n));
        self
    }

    /// Name in `language`, falling back to the canonical name.
    ///
    /// Returns `None` when the resolved name is empty after trimming.
    pub fn name(&self, language: &str) -> Option<&str> {
        self.names
            .get(language)
            .or_else(|| self.names.get(DEFAULT_LANGUAGE))
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
    }

    /// Canonical (English) name.
    pub fn canonical_name(&self) -> Option<&str> {
        self.name(DEFAULT_LANGUAGE)
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn is_retrograde(&self) -> bool {
        self.is_retrograde
    }

    pub fn sign_number(&self) -> Option<u8> {
        self.sign_number
    }

    /// 0-based sign index, when the sign is known.
    pub fn sign_index(&self) -> Option<u8> {
        self.sign_number.map(|n| n - 1)
    }

    pub fn sign(&self) -> Option<ZodiacSign> {
        self.sign_number.and_then(ZodiacSign::from_number)
    }
}

/// Sign block of an ephemeris record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZodiacSignRecord {
    /// 1-based sign number; number or numeric string.
    #[serde(default)]
    pub number: Value,
    #[serde(default)]
    pub name: BTreeMap<String, String>,
}

/// One body as reported by the ephemeris provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemerisRecord {
    #[serde(default)]
    pub planet: BTreeMap<String, String>,
    #[serde(rename = "fullDegree", default)]
    pub full_degree: Value,
    #[serde(rename = "isRetro", default)]
    pub is_retro: Value,
    #[serde(default)]
    pub zodiac_sign: Option<ZodiacSignRecord>,
}

impl EphemerisRecord {
    /// Convert to a placement, applying the lenient coercion rules.
    ///
    /// The provider's sign number wins when it is in 1..=12. Otherwise the
    /// sign is derived from a usable longitude, and left unknown when the
    /// longitude itself had to be defaulted.
    pub fn to_placement(&self) -> CelestialPlacement {
        let parsed_lon = coerce_number(&self.full_degree);
        if parsed_lon.is_none() {
            tracing::debug!(
                planet = ?self.planet.get(DEFAULT_LANGUAGE),
                raw = %self.full_degree,
                "fullDegree not numeric, defaulting to 0"
            );
        }
        let longitude = normalize_360(parsed_lon.unwrap_or(0.0));

        let provider_sign = self
            .zodiac_sign
            .as_ref()
            .and_then(|z| coerce_number(&z.number))
            .filter(|n| n.fract() == 0.0 && (1.0..=12.0).contains(n))
            .map(|n| n as u8);
        let sign_number =
            provider_sign.or_else(|| parsed_lon.map(|lon| sign_index_from_longitude(lon) + 1));

        CelestialPlacement {
            names: self.planet.clone(),
            longitude,
            is_retrograde: coerce_bool(&self.is_retro),
            sign_number,
        }
    }
}

impl From<&EphemerisRecord> for CelestialPlacement {
    fn from(record: &EphemerisRecord) -> Self {
        record.to_placement()
    }
}

/// Provider responses come either wrapped in `{ "output": [...] }` or bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum EphemerisResponse {
    Wrapped { output: Vec<EphemerisRecord> },
    Bare(Vec<EphemerisRecord>),
}

/// Parse a provider response body into records.
pub fn parse_ephemeris_response(json: &str) -> Result<Vec<EphemerisRecord>, ChartError> {
    let records = match serde_json::from_str::<EphemerisResponse>(json)? {
        EphemerisResponse::Wrapped { output } => output,
        EphemerisResponse::Bare(records) => records,
    };
    tracing::debug!(count = records.len(), "parsed ephemeris records");
    Ok(records)
}

/// Parse a provider response body straight into placements.
pub fn placements_from_json(json: &str) -> Result<Vec<CelestialPlacement>, ChartError> {
    Ok(parse_ephemeris_response(json)?
        .iter()
        .map(EphemerisRecord::to_placement)
        .collect())
}

/// Finite number from a JSON number or numeric string.
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// `true` for JSON `true` or the string "true" (any case).
fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}
