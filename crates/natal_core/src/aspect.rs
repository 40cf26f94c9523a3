//! Angular aspect detection between chart bodies.
//!
//! Every unordered pair of bodies is measured by the shortest arc between
//! their longitudes. The catalog is then scanned in declaration order and
//! the first aspect whose exact angle lies within its orb is taken; later
//! catalog entries are never considered for that pair, even when their orbs
//! overlap.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::Serialize;

use crate::error::ChartError;
use crate::placement::{CelestialPlacement, DEFAULT_LANGUAGE};
use crate::util::angular_separation;

/// The 12 catalogued aspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Square,
    Trine,
    Sextile,
    Quincunx,
    #[serde(rename = "Semi-Sextile")]
    SemiSextile,
    Quintile,
    Octile,
    Sesquiquadrate,
    Septile,
    Novile,
}

/// Catalog in declaration order. This order is the tie-break.
pub const ASPECT_CATALOG: [AspectKind; 12] = [
    AspectKind::Conjunction,
    AspectKind::Opposition,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Sextile,
    AspectKind::Quincunx,
    AspectKind::SemiSextile,
    AspectKind::Quintile,
    AspectKind::Octile,
    AspectKind::Sesquiquadrate,
    AspectKind::Septile,
    AspectKind::Novile,
];

/// The five major (Ptolemaic) aspects, in catalog order.
pub const MAJOR_ASPECTS: [AspectKind; 5] = [
    AspectKind::Conjunction,
    AspectKind::Opposition,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Sextile,
];

impl AspectKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "Conjunction",
            Self::Opposition => "Opposition",
            Self::Square => "Square",
            Self::Trine => "Trine",
            Self::Sextile => "Sextile",
            Self::Quincunx => "Quincunx",
            Self::SemiSextile => "Semi-Sextile",
            Self::Quintile => "Quintile",
            Self::Octile => "Octile",
            Self::Sesquiquadrate => "Sesquiquadrate",
            Self::Septile => "Septile",
            Self::Novile => "Novile",
        }
    }

    /// Exact angular separation in degrees.
    pub const fn exact_angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Opposition => 180.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Sextile => 60.0,
            Self::Quincunx => 150.0,
            Self::SemiSextile => 30.0,
            Self::Quintile => 72.0,
            Self::Octile => 45.0,
            Self::Sesquiquadrate => 135.0,
            // 360/7 rounded to four places
            Self::Septile => 51.4286,
            Self::Novile => 40.0,
        }
    }

    /// Catalog orb in degrees.
    pub const fn default_orb(self) -> f64 {
        match self {
            Self::Conjunction | Self::Septile | Self::Novile => 3.0,
            _ => 5.0,
        }
    }

    pub const fn is_major(self) -> bool {
        matches!(
            self,
            Self::Conjunction | Self::Opposition | Self::Square | Self::Trine | Self::Sextile
        )
    }
}

impl std::fmt::Display for AspectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectKind {
    type Err = ChartError;

    /// Parse a catalog name. Case and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ASPECT_CATALOG
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ChartError::UnknownAspect(wanted.to_string()))
    }
}

/// Reject orbs that are negative or not finite.
pub(crate) fn validate_orb(kind: AspectKind, orb: f64) -> Result<f64, ChartError> {
    if orb.is_finite() && orb >= 0.0 {
        Ok(orb)
    } else {
        Err(ChartError::InvalidOrb {
            aspect: kind.name(),
            value: orb,
        })
    }
}

/// Options for [`detect_aspects`].
#[derive(Debug, Clone, PartialEq)]
pub struct AspectConfig {
    /// Language key used to read body names.
    pub language: String,
    /// Aspects to consider; `None` means the whole catalog.
    pub allowed_aspects: Option<BTreeSet<AspectKind>>,
    /// Bodies skipped entirely, by name in `language`.
    pub excluded_bodies: BTreeSet<String>,
    /// Per-aspect orbs replacing the catalog default.
    pub orb_overrides: BTreeMap<AspectKind, f64>,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            allowed_aspects: None,
            excluded_bodies: BTreeSet::new(),
            orb_overrides: BTreeMap::new(),
        }
    }
}

impl AspectConfig {
    /// Restrict detection to the given aspects.
    pub fn allow(mut self, aspects: impl IntoIterator<Item = AspectKind>) -> Self {
        self.allowed_aspects = Some(aspects.into_iter().collect());
        self
    }

    /// Skip the named bodies.
    pub fn exclude<S: Into<String>>(mut self, bodies: impl IntoIterator<Item = S>) -> Self {
        self.excluded_bodies.extend(bodies.into_iter().map(Into::into));
        self
    }

    /// Override the orb for one aspect.
    pub fn with_orb(mut self, kind: AspectKind, orb: f64) -> Result<Self, ChartError> {
        self.orb_overrides.insert(kind, validate_orb(kind, orb)?);
        Ok(self)
    }

    /// Effective orb for `kind`.
    pub fn orb(&self, kind: AspectKind) -> f64 {
        self.orb_overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_orb())
    }

    pub fn allows(&self, kind: AspectKind) -> bool {
        self.allowed_aspects
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&kind))
    }
}

/// One detected aspect between two bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectMatch {
    pub body_a: String,
    pub body_b: String,
    pub aspect: AspectKind,
    /// Shortest arc between the two bodies, [0, 180].
    pub separation: f64,
    /// Distance from the exact aspect angle; never exceeds the orb used.
    pub separation_error: f64,
}

/// First aspect among `candidates` whose exact angle is within orb of
/// `separation`, with its error.
pub fn match_aspect(
    separation: f64,
    candidates: impl IntoIterator<Item = AspectKind>,
    orb: impl Fn(AspectKind) -> f64,
) -> Option<(AspectKind, f64)> {
    candidates.into_iter().find_map(|kind| {
        let error = (separation - kind.exact_angle()).abs();
        (error <= orb(kind)).then_some((kind, error))
    })
}

/// Detect aspects between every unordered pair of placements.
///
/// Output follows pair order (i, then j > i, over the filtered list). Pairs
/// carrying the same name are skipped.
pub fn detect_aspects(
    placements: &[CelestialPlacement],
    config: &AspectConfig,
) -> Vec<AspectMatch> {
    let entries: Vec<(&str, f64)> = placements
        .iter()
        .filter_map(|p| {
            let name = p.name(&config.language)?;
            (!config.excluded_bodies.contains(name)).then_some((name, p.longitude()))
        })
        .collect();

    let allowed: Vec<AspectKind> = ASPECT_CATALOG
        .into_iter()
        .filter(|k| config.allows(*k))
        .collect();

    let mut out = Vec::new();
    for (i, &(name_a, lon_a)) in entries.iter().enumerate() {
        for &(name_b, lon_b) in &entries[i + 1..] {
            if name_a == name_b {
                continue;
            }
            let separation = angular_separation(lon_a, lon_b);
            if let Some((aspect, separation_error)) =
                match_aspect(separation, allowed.iter().copied(), |k| config.orb(k))
            {
                out.push(AspectMatch {
                    body_a: name_a.to_string(),
                    body_b: name_b.to_string(),
                    aspect,
                    separation,
                    separation_error,
                });
            }
        }
    }
    tracing::debug!(
        bodies = entries.len(),
        aspects = out.len(),
        "aspect detection complete"
    );
    out
}

/// Sort tightest first (smallest separation error). Stable.
pub fn sort_by_tightness(matches: &mut [AspectMatch]) {
    matches.sort_by(|a, b| a.separation_error.total_cmp(&b.separation_error));
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    fn pair(a: f64, b: f64) -> Vec<CelestialPlacement> {
        vec![
            CelestialPlacement::new("Sun", a),
            CelestialPlacement::new("Moon", b),
        ]
    }

    #[test]
    fn catalog_has_twelve_in_order() {
        assert_eq!(ASPECT_CATALOG.len(), 12);
        assert_eq!(ASPECT_CATALOG[0], AspectKind::Conjunction);
        assert_eq!(ASPECT_CATALOG[11], AspectKind::Novile);
    }

    #[test]
    fn default_orbs() {
        assert!((AspectKind::Conjunction.default_orb() - 3.0).abs() < EPS);
        assert!((AspectKind::Square.default_orb() - 5.0).abs() < EPS);
        assert!((AspectKind::Septile.default_orb() - 3.0).abs() < EPS);
        assert!((AspectKind::Novile.default_orb() - 3.0).abs() < EPS);
    }

    #[test]
    fn majors_are_first_five() {
        assert_eq!(&ASPECT_CATALOG[..5], &MAJOR_ASPECTS);
        assert!(ASPECT_CATALOG[5..].iter().all(|k| !k.is_major()));
    }

    #[test]
    fn parse_names() {
        assert_eq!("Trine".parse::<AspectKind>().unwrap(), AspectKind::Trine);
        assert_eq!(
            " semi-sextile ".parse::<AspectKind>().unwrap(),
            AspectKind::SemiSextile
        );
        assert!(matches!(
            "Biquintile".parse::<AspectKind>(),
            Err(ChartError::UnknownAspect(_))
        ));
    }

    #[test]
    fn exact_square() {
        let m = detect_aspects(&pair(10.0, 100.0), &AspectConfig::default());
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, AspectKind::Square);
        assert!(m[0].separation_error.abs() < EPS);
        assert_eq!(m[0].body_a, "Sun");
        assert_eq!(m[0].body_b, "Moon");
    }

    #[test]
    fn orb_edge_is_inclusive() {
        let m = detect_aspects(&pair(0.0, 95.0), &AspectConfig::default());
        assert_eq!(m[0].aspect, AspectKind::Square);
        assert!((m[0].separation_error - 5.0).abs() < EPS);
    }

    #[test]
    fn outside_every_orb_is_no_match() {
        // 20 degrees: nearest are Conjunction (orb 3) and Semi-Sextile (orb 5)
        assert!(detect_aspects(&pair(0.0, 20.0), &AspectConfig::default()).is_empty());
    }

    #[test]
    fn catalog_order_breaks_ties() {
        // 48: Octile error 3, Septile error 3.4286 (orb 3, out)
        let m = detect_aspects(&pair(0.0, 48.0), &AspectConfig::default());
        assert_eq!(m[0].aspect, AspectKind::Octile);

        // 43: Octile (error 2) is declared before Novile (error 3); both in orb.
        let m = detect_aspects(&pair(0.0, 43.0), &AspectConfig::default());
        assert_eq!(m[0].aspect, AspectKind::Octile);
    }

    #[test]
    fn first_match_wins_even_when_later_is_tighter() {
        // 38: Semi-Sextile error 8 (widened orb), Novile error 2
        let cfg = AspectConfig::default()
            .with_orb(AspectKind::SemiSextile, 8.0)
            .unwrap();
        let m = detect_aspects(&pair(0.0, 38.0), &cfg);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, AspectKind::SemiSextile);
    }

    #[test]
    fn allowed_filter_restricts_catalog() {
        let cfg = AspectConfig::default().allow([AspectKind::Trine]);
        let m = detect_aspects(&pair(0.0, 120.0), &cfg);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, AspectKind::Trine);

        // A square is not reported when only trines are allowed
        assert!(detect_aspects(&pair(0.0, 90.0), &cfg).is_empty());
    }

    #[test]
    fn orb_override_widens_and_narrows() {
        let wide = AspectConfig::default()
            .with_orb(AspectKind::Square, 8.0)
            .unwrap();
        assert_eq!(detect_aspects(&pair(0.0, 97.0), &wide).len(), 1);

        let narrow = AspectConfig::default()
            .with_orb(AspectKind::Square, 1.0)
            .unwrap();
        assert!(detect_aspects(&pair(0.0, 92.0), &narrow).is_empty());
    }

    #[test]
    fn invalid_orb_rejected() {
        assert!(AspectConfig::default().with_orb(AspectKind::Trine, -1.0).is_err());
        assert!(
            AspectConfig::default()
                .with_orb(AspectKind::Trine, f64::NAN)
                .is_err()
        );
    }

    #[test]
    fn excluded_body_never_appears() {
        let placements = vec![
            CelestialPlacement::new("Sun", 0.0),
            CelestialPlacement::new("Moon", 90.0),
            CelestialPlacement::new("Chiron", 180.0),
        ];
        let cfg = AspectConfig::default().exclude(["Chiron"]);
        let m = detect_aspects(&placements, &cfg);
        assert!(m.iter().all(|a| a.body_a != "Chiron" && a.body_b != "Chiron"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn unnamed_bodies_skipped() {
        let placements = vec![
            CelestialPlacement::new("Sun", 0.0),
            CelestialPlacement::new("", 0.0),
        ];
        assert!(detect_aspects(&placements, &AspectConfig::default()).is_empty());
    }

    #[test]
    fn duplicate_names_not_paired() {
        let placements = vec![
            CelestialPlacement::new("Sun", 0.0),
            CelestialPlacement::new("Sun", 1.0),
        ];
        assert!(detect_aspects(&placements, &AspectConfig::default()).is_empty());
    }

    #[test]
    fn wraparound_conjunction() {
        let m = detect_aspects(&pair(359.0, 1.0), &AspectConfig::default());
        assert_eq!(m[0].aspect, AspectKind::Conjunction);
        assert!((m[0].separation_error - 2.0).abs() < EPS);
    }

    #[test]
    fn sort_tightest_first() {
        let placements = vec![
            CelestialPlacement::new("Sun", 0.0),
            CelestialPlacement::new("Moon", 94.0),
            CelestialPlacement::new("Mars", 181.0),
        ];
        let mut m = detect_aspects(&placements, &AspectConfig::default());
        sort_by_tightness(&mut m);
        let errors: Vec<f64> = m.iter().map(|a| a.separation_error).collect();
        assert!(errors.windows(2).all(|w| w[0] <= w[1]), "{errors:?}");
    }

    #[test]
    fn localized_names_used_in_output() {
        let placements = vec![
            CelestialPlacement::new("Sun", 0.0).with_name("fr", "Soleil"),
            CelestialPlacement::new("Moon", 180.0).with_name("fr", "Lune"),
        ];
        let cfg = AspectConfig {
            language: "fr".into(),
            ..AspectConfig::default()
        };
        let m = detect_aspects(&placements, &cfg);
        assert_eq!(m[0].body_a, "Soleil");
        assert_eq!(m[0].body_b, "Lune");
        assert_eq!(m[0].aspect, AspectKind::Opposition);
    }
}
