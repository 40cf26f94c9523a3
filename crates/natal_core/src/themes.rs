//! Chart theme summary: the signs of the Big Three, element and modality
//! emphasis, stellium, angular planets and natal retrogrades.
//!
//! Counts consider only the 10 core planets. Names are read canonically.

use serde::Serialize;

use crate::body::{ANGLES, ASCENDANT, CorePlanet, is_core_planet};
use crate::placement::CelestialPlacement;
use crate::sign::{ALL_ELEMENTS, ALL_MODALITIES, Element, Modality, ZodiacSign};
use crate::util::angular_separation;

/// Minimum core planets in one sign to count as a stellium.
pub const STELLIUM_MIN: usize = 3;

/// Maximum distance (degrees) from an angle for a planet to be angular.
pub const ANGULAR_ORB_DEG: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartThemes {
    pub sun: Option<ZodiacSign>,
    pub moon: Option<ZodiacSign>,
    pub rising: Option<ZodiacSign>,
    /// Indexed by [`Element::index`].
    pub element_counts: [usize; 4],
    /// Indexed by [`Modality::index`].
    pub modality_counts: [usize; 3],
    /// `None` when no core planet has a known sign.
    pub dominant_element: Option<Element>,
    pub dominant_modality: Option<Modality>,
    pub stellium: Option<ZodiacSign>,
    /// Core planets within [`ANGULAR_ORB_DEG`] of any chart angle.
    pub angular: Vec<String>,
    pub retrogrades: Vec<String>,
}

/// Summarize the themes of a natal chart.
pub fn chart_themes(placements: &[CelestialPlacement]) -> ChartThemes {
    let sign_of = |name: &str| {
        placements
            .iter()
            .find(|p| p.canonical_name() == Some(name))
            .and_then(CelestialPlacement::sign)
    };

    let core: Vec<&CelestialPlacement> = placements
        .iter()
        .filter(|p| p.canonical_name().is_some_and(is_core_planet))
        .collect();

    let mut element_counts = [0usize; 4];
    let mut modality_counts = [0usize; 3];
    // Signs in order of first appearance, with their counts
    let mut sign_counts: Vec<(ZodiacSign, usize)> = Vec::new();
    for sign in core.iter().filter_map(|p| p.sign()) {
        element_counts[sign.element().index()] += 1;
        modality_counts[sign.modality().index()] += 1;
        match sign_counts.iter_mut().find(|(s, _)| *s == sign) {
            Some((_, n)) => *n += 1,
            None => sign_counts.push((sign, 1)),
        }
    }

    let angle_lons: Vec<f64> = ANGLES
        .iter()
        .filter_map(|a| placements.iter().find(|p| p.canonical_name() == Some(*a)))
        .map(CelestialPlacement::longitude)
        .collect();

    let names_where = |pred: &dyn Fn(&CelestialPlacement) -> bool| -> Vec<String> {
        core.iter()
            .filter(|p| pred(p))
            .filter_map(|p| p.canonical_name().map(str::to_string))
            .collect()
    };

    ChartThemes {
        sun: sign_of(CorePlanet::Sun.name()),
        moon: sign_of(CorePlanet::Moon.name()),
        rising: sign_of(ASCENDANT),
        element_counts,
        modality_counts,
        dominant_element: dominant(&ALL_ELEMENTS, &element_counts),
        dominant_modality: dominant(&ALL_MODALITIES, &modality_counts),
        stellium: sign_counts
            .iter()
            .find(|(_, n)| *n >= STELLIUM_MIN)
            .map(|(s, _)| *s),
        angular: names_where(&|p: &CelestialPlacement| {
            angle_lons
                .iter()
                .any(|&a| angular_separation(p.longitude(), a) <= ANGULAR_ORB_DEG)
        }),
        retrogrades: names_where(&|p: &CelestialPlacement| p.is_retrograde()),
    }
}

/// Highest count; ties go to the earlier table entry.
fn dominant<T: Copy>(table: &[T], counts: &[usize]) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for (item, &count) in table.iter().zip(counts) {
        if count > 0 && best.is_none_or(|(_, b)| count > b) {
            best = Some((*item, count));
        }
    }
    best.map(|(item, _)| item)
}
