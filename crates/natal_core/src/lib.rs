//! Natal chart geometry derived from ephemeris placements.
//!
//! This crate provides:
//! - Whole-sign houses from the Ascendant
//! - Pairwise aspect detection over a 12-entry catalog with orbs
//! - Transit-to-natal aspects for the core planets
//! - Chart themes (Big Three, element/modality emphasis, stellium)
//! - Lenient parsing of ephemeris provider records
//!
//! Planet positions themselves come from an external ephemeris service;
//! everything here is pure and synchronous.

pub mod aspect;
pub mod body;
pub mod chart;
pub mod error;
pub mod house;
pub mod placement;
pub mod request;
pub mod sign;
pub mod themes;
pub mod transit;
pub mod util;

pub use aspect::{
    ASPECT_CATALOG, AspectConfig, AspectKind, AspectMatch, MAJOR_ASPECTS, detect_aspects,
    match_aspect, sort_by_tightness,
};
pub use body::{ALL_CORE_PLANETS, ANGLES, ASCENDANT, CorePlanet, is_core_planet};
pub use chart::NatalChart;
pub use error::ChartError;
pub use house::{HouseCusp, derive_houses, house_for_longitude, houses_from_sign_index};
pub use placement::{
    CelestialPlacement, DEFAULT_LANGUAGE, EphemerisRecord, parse_ephemeris_response,
    placements_from_json,
};
pub use request::{BirthRequest, RequestConfig};
pub use sign::{
    ALL_ELEMENTS, ALL_MODALITIES, ALL_SIGNS, Dms, Element, Modality, SignInfo, ZodiacSign,
    deg_to_dms, sign_from_longitude,
};
pub use themes::{ChartThemes, chart_themes};
pub use transit::{TransitAspect, TransitConfig, detect_transit_aspects};
pub use util::{angular_separation, normalize_360};
