//! Angle helpers shared by the house, aspect and theme calculations.

/// Normalize an angle to [0, 360) degrees.
///
/// Non-finite input maps to 0.
pub fn normalize_360(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(360.0);
    // Tiny negatives round up to exactly 360
    if r >= 360.0 { 0.0 } else { r }
}

/// Shortest arc between two ecliptic longitudes, in [0, 180].
pub fn angular_separation(a_deg: f64, b_deg: f64) -> f64 {
    let diff = (normalize_360(a_deg) - normalize_360(b_deg)).abs();
    diff.min(360.0 - diff)
}
