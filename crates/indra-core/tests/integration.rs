//! Integration tests exercising the full pipeline:
//! recipe → traversal / tiles → export, across module boundaries.

use indra_core::{
    LimitCurve, LimitPoints, Point, TileConfig, Tiles, TraversalConfig, Word, WordRange,
    export_json, grandmas_recipe, import_json, jorgensen, kissing_schottky,
};
use num_complex::Complex64;

fn w(s: &str) -> Word {
    s.parse().unwrap()
}

/// Test 1: the reference kissing group traces a non-empty closed curve, and
/// two runs produce the same sequence.
#[test]
fn kissing_schottky_full_trace_is_deterministic() {
    let gens = kissing_schottky(2.0, 2.0).unwrap().generators;
    let config = TraversalConfig {
        max_level: 20,
        eps: 1e-4,
    };

    let first = LimitCurve::trace(&gens, config).unwrap();
    let second = LimitCurve::trace(&gens, config).unwrap();

    assert!(!first.is_empty());
    assert!(first.closed);
    assert_eq!(first.len(), second.len());
    assert_eq!(first.points, second.points);
    assert!(first.points.iter().all(|p| !p.is_infinite()));

    // closed: the walk ends next to where it started
    let (head, tail) = (first.points[0], first.points[first.len() - 1]);
    assert!(head.distance(tail) < 0.1, "gap {}", head.distance(tail));
}

/// Test 2: consecutive points of a full trace are close, so the sequence can
/// be drawn as a polyline.
#[test]
fn consecutive_points_are_neighbours() {
    let gens = kissing_schottky(1.0, 0.5).unwrap().generators;
    let points: Vec<Point> = LimitPoints::new(&gens, TraversalConfig::default())
        .unwrap()
        .collect();
    let largest = points
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .fold(0.0, f64::max);
    assert!(largest < 0.5, "largest step {largest}");
}

/// Test 3: `start = "a"`, `end = "b"` covers the whole tree; narrower ranges
/// keep the order of the full walk.
#[test]
fn partial_traversal_is_ordered_subsequence() {
    let gens = kissing_schottky(2.0, 2.0).unwrap().generators;
    let config = TraversalConfig::default();
    let full: Vec<Point> = LimitPoints::new(&gens, config).unwrap().collect();

    let everything = WordRange::new(w("a"), w("b")).unwrap();
    let partial: Vec<Point> = LimitPoints::with_range(&gens, config, everything)
        .unwrap()
        .collect();
    assert_eq!(partial, full);

    let middle = WordRange::new(w("aB"), w("Ab")).unwrap();
    let partial: Vec<Point> = LimitPoints::with_range(&gens, config, middle)
        .unwrap()
        .collect();
    assert!(!partial.is_empty());
    assert!(partial.len() < full.len());

    // each partial point appears in the full walk, in the same order
    let mut cursor = 0;
    for p in &partial {
        let found = full[cursor..].iter().position(|q| q == p);
        let offset = found.expect("partial point missing from full walk");
        cursor += offset + 1;
    }
}

/// Test 4: both parabolic recipes trace without errors at a coarse setting.
#[test]
fn parabolic_recipes_trace() {
    let config = TraversalConfig {
        max_level: 10,
        eps: 1e-2,
    };
    let two = Complex64::new(2.0, 0.0);

    let grandma = grandmas_recipe(two, two).unwrap();
    let curve = LimitCurve::trace(&grandma.generators, config).unwrap();
    assert!(!curve.is_empty());
    assert!(curve.points.iter().all(|p| !p.is_infinite()));

    // Jørgensen puts the commutator fixed point at infinity
    let jorgensen = jorgensen(two, Complex64::new(3.0, 0.0)).unwrap();
    let curve = LimitCurve::trace(&jorgensen.generators, config).unwrap();
    assert!(!curve.is_empty());
}

/// Test 5: tiles of a kissing group shrink and stay nested under a seed circle.
#[test]
fn tiles_shrink_towards_limit_set() {
    let set = kissing_schottky(1.0, 0.5).unwrap();
    let circles = set.circles.clone().unwrap();
    let config = TileConfig {
        max_level: 6,
        min_radius: 1e-2,
    };
    let tiles: Vec<_> = Tiles::new(&set.generators, &circles, config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert!(tiles.len() > 4);
    for tile in &tiles {
        let root = circles[tile.word.tags()[0].index()];
        assert!(tile.disk.radius() <= root.radius() + 1e-9);
        if let Some(disk) = tile.disk.as_circle() {
            assert!(root.contains(Point::Finite(disk.center())));
        }
    }
}

/// Test 6: a trace survives export and import.
#[test]
fn export_roundtrip_preserves_trace() {
    let gens = kissing_schottky(1.0, 0.5).unwrap().generators;
    let config = TraversalConfig {
        max_level: 10,
        eps: 1e-2,
    };
    let range = WordRange::new(w("B"), w("A")).unwrap();
    let curve = LimitCurve::trace_range(&gens, config, range).unwrap();

    let json = export_json(&curve).unwrap();
    let back = import_json(&json).unwrap();
    assert!(!back.closed);
    assert_eq!(back.points, curve.points);
}
