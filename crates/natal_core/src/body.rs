//! Canonical body names and the fixed body sets used for filtering.
//!
//! Ephemeris providers identify bodies by display name. The canonical
//! (English) names below are what the engine matches against.

use serde::Serialize;

/// Canonical name of the rising point.
pub const ASCENDANT: &str = "Ascendant";

/// The four chart angles, in the order themes report them.
pub const ANGLES: [&str; 4] = [ASCENDANT, "Descendant", "MC", "IC"];

/// The 10 core planets (luminaries plus the eight planets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CorePlanet {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// All core planets in traditional order.
pub const ALL_CORE_PLANETS: [CorePlanet; 10] = [
    CorePlanet::Sun,
    CorePlanet::Moon,
    CorePlanet::Mercury,
    CorePlanet::Venus,
    CorePlanet::Mars,
    CorePlanet::Jupiter,
    CorePlanet::Saturn,
    CorePlanet::Uranus,
    CorePlanet::Neptune,
    CorePlanet::Pluto,
];

impl CorePlanet {
    /// Canonical English name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
        }
    }

    /// Look up a core planet by canonical name (exact match).
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_CORE_PLANETS.into_iter().find(|p| p.name() == name)
    }
}

/// Whether `name` is one of the 10 core planets.
pub fn is_core_planet(name: &str) -> bool {
    CorePlanet::from_name(name).is_some()
}
