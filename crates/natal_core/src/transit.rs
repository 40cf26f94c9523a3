//! Transit-to-natal aspects.
//!
//! Same separation and first-match rules as [`crate::aspect`], applied across
//! two sets: current ("transiting") placements against the natal chart. Only
//! the core planets transit; the natal side keeps every named body so that
//! transits can also contact the chart angles.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aspect::{AspectKind, MAJOR_ASPECTS, match_aspect, validate_orb};
use crate::body::is_core_planet;
use crate::error::ChartError;
use crate::placement::CelestialPlacement;
use crate::util::angular_separation;

/// Options for [`detect_transit_aspects`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransitConfig {
    /// Orbs for the five major aspects. Missing entries use the catalog default.
    pub orbs: BTreeMap<AspectKind, f64>,
}

impl Default for TransitConfig {
    fn default() -> Self {
        let orbs = BTreeMap::from([
            (AspectKind::Conjunction, 2.0),
            (AspectKind::Opposition, 2.0),
            (AspectKind::Square, 2.5),
            (AspectKind::Trine, 2.5),
            (AspectKind::Sextile, 2.0),
        ]);
        Self { orbs }
    }
}

impl TransitConfig {
    /// Override the orb for one aspect.
    pub fn with_orb(mut self, kind: AspectKind, orb: f64) -> Result<Self, ChartError> {
        self.orbs.insert(kind, validate_orb(kind, orb)?);
        Ok(self)
    }

    pub fn orb(&self, kind: AspectKind) -> f64 {
        self.orbs
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_orb())
    }
}

/// A transiting planet in aspect to a natal body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitAspect {
    pub transiting: String,
    pub natal: String,
    pub aspect: AspectKind,
    pub separation_error: f64,
}

/// Detect major aspects from transiting core planets to natal placements.
///
/// Names are read canonically. Output is ordered by transiting body, then
/// natal body, in input order.
pub fn detect_transit_aspects(
    transiting: &[CelestialPlacement],
    natal: &[CelestialPlacement],
    config: &TransitConfig,
) -> Vec<TransitAspect> {
    let movers: Vec<(&str, f64)> = transiting
        .iter()
        .filter_map(|p| Some((p.canonical_name()?, p.longitude())))
        .filter(|(name, _)| is_core_planet(name))
        .collect();
    let targets: Vec<(&str, f64)> = natal
        .iter()
        .filter_map(|p| Some((p.canonical_name()?, p.longitude())))
        .collect();

    let mut out = Vec::new();
    for &(t_name, t_lon) in &movers {
        for &(n_name, n_lon) in &targets {
            let separation = angular_separation(t_lon, n_lon);
            if let Some((aspect, separation_error)) =
                match_aspect(separation, MAJOR_ASPECTS, |k| config.orb(k))
            {
                out.push(TransitAspect {
                    transiting: t_name.to_string(),
                    natal: n_name.to_string(),
                    aspect,
                    separation_error,
                });
            }
        }
    }
    tracing::debug!(
        transiting = movers.len(),
        natal = targets.len(),
        hits = out.len(),
        "transit detection complete"
    );
    out
}
