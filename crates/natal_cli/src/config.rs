//! TOML settings file for the `natal` binary.
//!
//! ```toml
//! language = "en"
//!
//! [aspects]
//! allowed = ["Conjunction", "Opposition", "Square", "Trine", "Sextile"]
//! exclude = ["Chiron", "Lilith"]
//!
//! [aspects.orbs]
//! Conjunction = 8.0
//!
//! [transits.orbs]
//! Square = 1.5
//! ```
//!
//! Every key is optional. Command-line flags are applied on top.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use natal_core::{AspectConfig, AspectKind, ChartError, DEFAULT_LANGUAGE, TransitConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Language key for reading body names.
    pub language: Option<String>,
    pub aspects: AspectSettings,
    pub transits: TransitSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AspectSettings {
    /// Aspect names to keep; absent means the whole catalog.
    pub allowed: Option<Vec<String>>,
    pub exclude: Vec<String>,
    /// Orb overrides keyed by aspect name.
    pub orbs: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitSettings {
    pub orbs: BTreeMap<String, f64>,
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Aspect options described by this file.
    pub fn aspect_config(&self) -> Result<AspectConfig, ChartError> {
        let mut config = AspectConfig {
            language: self.language().to_string(),
            ..AspectConfig::default()
        }
        .exclude(self.aspects.exclude.iter().cloned());
        if let Some(names) = &self.aspects.allowed {
            let kinds = names
                .iter()
                .map(|n| n.parse::<AspectKind>())
                .collect::<Result<Vec<_>, _>>()?;
            config = config.allow(kinds);
        }
        for (name, &orb) in &self.aspects.orbs {
            config = config.with_orb(name.parse()?, orb)?;
        }
        Ok(config)
    }

    /// Transit options described by this file.
    pub fn transit_config(&self) -> Result<TransitConfig, ChartError> {
        let mut config = TransitConfig::default();
        for (name, &orb) in &self.transits.orbs {
            let kind: AspectKind = name.parse()?;
            if !kind.is_major() {
                tracing::warn!(aspect = %kind, "transits only use major aspects, orb ignored");
            }
            config = config.with_orb(kind, orb)?;
        }
        Ok(config)
    }
}

/// Parse an `--orb Name=degrees` flag value.
pub fn parse_orb(s: &str) -> Result<(AspectKind, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DEGREES, got {s:?}"))?;
    let kind: AspectKind = name.parse().map_err(|e: ChartError| e.to_string())?;
    let orb: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("orb for {kind} is not a number: {value:?}"))?;
    if !orb.is_finite() || orb < 0.0 {
        return Err(format!("orb for {kind} must be a non-negative number"));
    }
    Ok((kind, orb))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn empty_file_is_default() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.aspect_config().unwrap(), AspectConfig::default());
        assert_eq!(s.transit_config().unwrap(), TransitConfig::default());
    }

    #[test]
    fn full_file() {
        let s = Settings::from_toml_str(
            r#"
            language = "es"

            [aspects]
            allowed = ["conjunction", "Trine"]
            exclude = ["Chiron"]

            [aspects.orbs]
            Conjunction = 8

            [transits.orbs]
            Square = 1.5
            "#,
        )
        .unwrap();
        let aspects = s.aspect_config().unwrap();
        assert_eq!(aspects.language, "es");
        assert!(aspects.allows(AspectKind::Trine));
        assert!(!aspects.allows(AspectKind::Square));
        assert!(aspects.excluded_bodies.contains("Chiron"));
        assert!((aspects.orb(AspectKind::Conjunction) - 8.0).abs() < EPS);

        let transits = s.transit_config().unwrap();
        assert!((transits.orb(AspectKind::Square) - 1.5).abs() < EPS);
        assert!((transits.orb(AspectKind::Trine) - 2.5).abs() < EPS);
    }

    #[test]
    fn unknown_aspect_rejected() {
        let s = Settings::from_toml_str("[aspects.orbs]\nBiquintile = 2.0\n").unwrap();
        assert!(matches!(
            s.aspect_config(),
            Err(ChartError::UnknownAspect(name)) if name == "Biquintile"
        ));
    }

    #[test]
    fn negative_orb_rejected() {
        let s = Settings::from_toml_str("[transits.orbs]\nTrine = -1.0\n").unwrap();
        assert!(matches!(
            s.transit_config(),
            Err(ChartError::InvalidOrb { aspect: "Trine", .. })
        ));
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(Settings::from_toml_str("langauge = \"en\"\n").is_err());
    }

    #[test]
    fn orb_flag() {
        let (kind, orb) = parse_orb("Semi-Sextile=2.5").unwrap();
        assert_eq!(kind, AspectKind::SemiSextile);
        assert!((orb - 2.5).abs() < EPS);

        assert!(parse_orb("Square").is_err());
        assert!(parse_orb("Square=wide").is_err());
        assert!(parse_orb("Square=-3").is_err());
        assert!(parse_orb("Hexile=3").is_err());
    }
}
