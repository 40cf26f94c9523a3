//! Whole-sign house derivation.
//!
//! Each house spans exactly one sign. House 1 is the sign holding the
//! Ascendant and the remaining houses follow in zodiacal order, so every
//! cusp sits on a sign boundary.

use serde::Serialize;

use crate::body::ASCENDANT;
use crate::placement::CelestialPlacement;
use crate::sign::{ZodiacSign, sign_index_from_longitude};

/// A single whole-sign house.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HouseCusp {
    /// House number, 1-12.
    pub house_number: u8,
    /// Ecliptic longitude of the cusp in degrees, a multiple of 30 in [0, 360).
    pub start_longitude: f64,
    /// 0-based index of the sign the house occupies.
    pub sign_index: u8,
    pub sign: ZodiacSign,
    /// Offset of the cusp inside its sign. Always 0 for whole-sign houses.
    pub norm_degree: f64,
}

impl HouseCusp {
    /// Whether `lon_deg` falls inside this house's sign.
    pub fn contains(&self, lon_deg: f64) -> bool {
        sign_index_from_longitude(lon_deg) == self.sign_index
    }
}

/// Derive the 12 whole-sign houses from the Ascendant.
///
/// The Ascendant is matched by its name in `language` or by its canonical
/// name, so localized records are still recognized. Returns an empty vector
/// when there is no Ascendant or its sign is unknown.
pub fn derive_houses(placements: &[CelestialPlacement], language: &str) -> Vec<HouseCusp> {
    let Some(ascendant) = placements
        .iter()
        .find(|p| {
            p.name(language) == Some(ASCENDANT) || p.canonical_name() == Some(ASCENDANT)
        })
    else {
        tracing::debug!(language, "no Ascendant placement, houses unavailable");
        return Vec::new();
    };
    let Some(start_sign) = ascendant.sign_index() else {
        tracing::debug!("Ascendant sign unknown, houses unavailable");
        return Vec::new();
    };
    houses_from_sign_index(start_sign)
}

/// Whole-sign houses starting at a 0-based sign index.
pub fn houses_from_sign_index(start_sign: u8) -> Vec<HouseCusp> {
    (0..12u16)
        .map(|i| {
            let cusp = ((start_sign as u16 + i) * 30) % 360;
            let sign_index = ((cusp / 30) % 12) as u8;
            HouseCusp {
                house_number: i as u8 + 1,
                start_longitude: cusp as f64,
                sign_index,
                sign: ZodiacSign::from_index(sign_index),
                norm_degree: 0.0,
            }
        })
        .collect()
}

/// House number (1-12) whose sign contains `lon_deg`.
///
/// `None` when `houses` is empty.
pub fn house_for_longitude(houses: &[HouseCusp], lon_deg: f64) -> Option<u8> {
    houses
        .iter()
        .find(|h| h.contains(lon_deg))
        .map(|h| h.house_number)
}
