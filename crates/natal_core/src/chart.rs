//! Computed natal chart: placements with their derived houses, aspects and
//! themes, bundled so consumers (tables, wheel, reports, narrative) receive
//! one explicit value.

use serde::Serialize;

use crate::aspect::{AspectConfig, AspectMatch, detect_aspects, sort_by_tightness};
use crate::house::{HouseCusp, derive_houses, house_for_longitude};
use crate::placement::CelestialPlacement;
use crate::themes::{ChartThemes, chart_themes};
use crate::transit::{TransitAspect, TransitConfig, detect_transit_aspects};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalChart {
    pub placements: Vec<CelestialPlacement>,
    /// Empty when the placements carry no usable Ascendant.
    pub houses: Vec<HouseCusp>,
    /// In pair order, as detected.
    pub aspects: Vec<AspectMatch>,
    pub themes: ChartThemes,
}

impl NatalChart {
    /// Derive houses, aspects and themes from `placements`.
    pub fn compute(placements: Vec<CelestialPlacement>, config: &AspectConfig) -> Self {
        let houses = derive_houses(&placements, &config.language);
        let aspects = detect_aspects(&placements, config);
        let themes = chart_themes(&placements);
        tracing::debug!(
            placements = placements.len(),
            houses = houses.len(),
            aspects = aspects.len(),
            "natal chart computed"
        );
        Self {
            placements,
            houses,
            aspects,
            themes,
        }
    }

    /// Whole-sign house holding the named body.
    pub fn house_of(&self, canonical_name: &str) -> Option<u8> {
        let body = self
            .placements
            .iter()
            .find(|p| p.canonical_name() == Some(canonical_name))?;
        house_for_longitude(&self.houses, body.longitude())
    }

    /// Major aspects only, in detection order.
    pub fn major_aspects(&self) -> Vec<&AspectMatch> {
        self.aspects.iter().filter(|a| a.aspect.is_major()).collect()
    }

    /// The `n` tightest aspects.
    pub fn tightest_aspects(&self, n: usize) -> Vec<AspectMatch> {
        tightest(self.aspects.iter(), n)
    }

    /// The `n` tightest major aspects.
    pub fn tightest_major_aspects(&self, n: usize) -> Vec<AspectMatch> {
        tightest(self.major_aspects(), n)
    }

    /// Transits from `transiting` against this chart's placements.
    pub fn transits(
        &self,
        transiting: &[CelestialPlacement],
        config: &TransitConfig,
    ) -> Vec<TransitAspect> {
        detect_transit_aspects(transiting, &self.placements, config)
    }
}

fn tightest<'a>(
    aspects: impl IntoIterator<Item = &'a AspectMatch>,
    n: usize,
) -> Vec<AspectMatch> {
    let mut sorted: Vec<AspectMatch> = aspects.into_iter().cloned().collect();
    sort_by_tightness(&mut sorted);
    sorted.truncate(n);
    sorted
}
