//! Golden-value tests for aspect detection over a full provider response.

use natal_core::{
    AspectConfig, AspectKind, CelestialPlacement, MAJOR_ASPECTS, detect_aspects,
    placements_from_json, sort_by_tightness,
};

const NATAL_JSON: &str = include_str!("data/natal_sample.json");
const EPS: f64 = 1e-9;

fn natal() -> Vec<CelestialPlacement> {
    placements_from_json(NATAL_JSON).expect("sample parses")
}

fn summary(config: &AspectConfig) -> Vec<(String, String, AspectKind, f64)> {
    detect_aspects(&natal(), config)
        .into_iter()
        .map(|m| (m.body_a, m.body_b, m.aspect, m.separation_error))
        .collect()
}

#[test]
fn default_config_finds_all_pairs() {
    let matches = detect_aspects(&natal(), &AspectConfig::default());
    assert_eq!(matches.len(), 68);

    let first = &matches[0];
    assert_eq!((first.body_a.as_str(), first.body_b.as_str()), ("Sun", "Moon"));
    assert_eq!(first.aspect, AspectKind::Trine);
    assert!((first.separation_error - 2.7).abs() < EPS);

    let last = matches.last().unwrap();
    assert_eq!((last.body_a.as_str(), last.body_b.as_str()), ("MC", "IC"));
    assert_eq!(last.aspect, AspectKind::Opposition);
    assert!(last.separation_error.abs() < EPS);
}

#[test]
fn majors_without_points() {
    let config = AspectConfig::default()
        .allow(MAJOR_ASPECTS)
        .exclude(["Chiron", "Mean Node", "Ascendant", "Descendant", "MC", "IC"]);
    let got = summary(&config);
    let expected = [
        ("Sun", "Moon", AspectKind::Trine, 2.7),
        ("Sun", "Saturn", AspectKind::Square, 1.2),
        ("Mercury", "Uranus", AspectKind::Square, 1.9),
        ("Mercury", "Neptune", AspectKind::Square, 3.4),
        ("Venus", "Uranus", AspectKind::Sextile, 1.2),
        ("Venus", "Neptune", AspectKind::Sextile, 4.1),
        ("Jupiter", "Uranus", AspectKind::Opposition, 3.9),
        ("Neptune", "Pluto", AspectKind::Sextile, 2.3),
    ];
    assert_eq!(got.len(), expected.len());
    for (g, e) in got.iter().zip(expected) {
        assert_eq!((g.0.as_str(), g.1.as_str(), g.2), (e.0, e.1, e.2));
        assert!((g.3 - e.3).abs() < EPS, "{g:?} vs {e:?}");
    }
}

#[test]
fn orb_edge_pairs_included() {
    // Jupiter at 95 sits exactly 5 degrees off several angle aspects
    let got = summary(&AspectConfig::default());
    let jupiter_edges: Vec<_> = got
        .iter()
        .filter(|m| m.0 == "Jupiter" && (m.3 - 5.0).abs() < EPS)
        .map(|m| (m.1.as_str(), m.2))
        .collect();
    assert_eq!(
        jupiter_edges,
        vec![
            ("Mean Node", AspectKind::Quincunx),
            ("Ascendant", AspectKind::Square),
            ("Descendant", AspectKind::Square),
            ("IC", AspectKind::Opposition),
        ]
    );
}

#[test]
fn error_never_exceeds_orb() {
    let config = AspectConfig::default()
        .with_orb(AspectKind::Trine, 7.0)
        .unwrap();
    for m in detect_aspects(&natal(), &config) {
        assert!(m.separation_error <= config.orb(m.aspect), "{m:?}");
        assert!((0.0..=180.0).contains(&m.separation));
        assert_ne!(m.body_a, m.body_b);
    }
}

#[test]
fn at_most_one_match_per_pair() {
    let matches = detect_aspects(&natal(), &AspectConfig::default());
    let mut pairs: Vec<(String, String)> = matches
        .iter()
        .map(|m| {
            let mut p = [m.body_a.clone(), m.body_b.clone()];
            p.sort();
            (p[0].clone(), p[1].clone())
        })
        .collect();
    let before = pairs.len();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), before);
}

#[test]
fn order_of_input_does_not_change_matches() {
    let forward = natal();
    let mut reversed = forward.clone();
    reversed.reverse();

    let key = |v: Vec<natal_core::AspectMatch>| {
        let mut k: Vec<(String, String, AspectKind, i64)> = v
            .into_iter()
            .map(|m| {
                let (a, b) = if m.body_a <= m.body_b {
                    (m.body_a, m.body_b)
                } else {
                    (m.body_b, m.body_a)
                };
                (a, b, m.aspect, (m.separation_error * 1e6).round() as i64)
            })
            .collect();
        k.sort();
        k
    };
    let config = AspectConfig::default();
    assert_eq!(
        key(detect_aspects(&forward, &config)),
        key(detect_aspects(&reversed, &config))
    );
}

#[test]
fn symmetric_pair() {
    let a = CelestialPlacement::new("Venus", 12.3);
    let b = CelestialPlacement::new("Mars", 255.9);
    let ab = detect_aspects(&[a.clone(), b.clone()], &AspectConfig::default());
    let ba = detect_aspects(&[b, a], &AspectConfig::default());
    assert_eq!(ab.len(), ba.len());
    for (x, y) in ab.iter().zip(&ba) {
        assert_eq!(x.aspect, y.aspect);
        assert_eq!(x.separation_error, y.separation_error);
        assert_eq!((x.body_a.as_str(), x.body_b.as_str()), (y.body_b.as_str(), y.body_a.as_str()));
    }
}

#[test]
fn sun_square_moon_scenario() {
    let placements = vec![
        CelestialPlacement::new("Sun", 10.0),
        CelestialPlacement::new("Moon", 100.0),
        CelestialPlacement::new("Ascendant", 190.0),
    ];
    let matches = detect_aspects(&placements, &AspectConfig::default());
    let sun_moon: Vec<_> = matches
        .iter()
        .filter(|m| m.body_a == "Sun" && m.body_b == "Moon")
        .collect();
    assert_eq!(sun_moon.len(), 1);
    assert_eq!(sun_moon[0].aspect, AspectKind::Square);
    assert!((sun_moon[0].separation - 90.0).abs() < EPS);
    assert!(sun_moon[0].separation_error.abs() < EPS);

    // With the angle excluded the square is the only match
    let planets_only = AspectConfig::default().exclude(["Ascendant"]);
    let matches = detect_aspects(&placements, &planets_only);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].aspect, AspectKind::Square);
}

#[test]
fn trine_only_filter() {
    let placements = vec![
        CelestialPlacement::new("Jupiter", 33.0),
        CelestialPlacement::new("Saturn", 153.0),
    ];
    let config = AspectConfig::default().allow([AspectKind::Trine]);
    let matches = detect_aspects(&placements, &config);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].aspect, AspectKind::Trine);
    assert!(matches[0].separation_error.abs() < EPS);
}

#[test]
fn exact_square_at_every_offset() {
    let mut lon = 0.0;
    while lon < 360.0 {
        let placements = vec![
            CelestialPlacement::new("Sun", lon),
            CelestialPlacement::new("Moon", lon + 90.0),
        ];
        let m = detect_aspects(&placements, &AspectConfig::default());
        assert_eq!(m.len(), 1, "lon = {lon}");
        assert_eq!(m[0].aspect, AspectKind::Square);
        assert!(m[0].separation_error < 1e-9, "lon = {lon}");
        lon += 15.0;
    }
}

#[test]
fn idempotent() {
    let placements = natal();
    let config = AspectConfig::default();
    assert_eq!(
        detect_aspects(&placements, &config),
        detect_aspects(&placements, &config)
    );
}

#[test]
fn tightness_sort_is_stable_on_ties() {
    let mut matches = detect_aspects(&natal(), &AspectConfig::default());
    sort_by_tightness(&mut matches);
    let zero: Vec<(&str, &str)> = matches
        .iter()
        .take_while(|m| m.separation_error < EPS)
        .map(|m| (m.body_a.as_str(), m.body_b.as_str()))
        .collect();
    // Exact hits keep their pair order
    assert_eq!(zero.first(), Some(&("Mean Node", "Ascendant")));
    assert_eq!(zero.last(), Some(&("MC", "IC")));
}
