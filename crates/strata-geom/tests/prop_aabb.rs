use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use strata_geom::{Aabb, Vec3};

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn contains(b: &Aabb, p: Vec3) -> bool {
    p.x >= b.min.x
        && p.x <= b.max.x
        && p.y >= b.min.y
        && p.y <= b.max.y
        && p.z >= b.min.z
        && p.z <= b.max.z
}

proptest! {
    // Every included point lies inside the grown box
    #[test]
    fn include_contains_every_point(points in prop::collection::vec(arb_vec3(), 1..32)) {
        let mut b = Aabb::EMPTY;
        for p in &points {
            b.include(*p);
        }
        prop_assert!(!b.is_empty());
        for p in &points {
            prop_assert!(contains(&b, *p));
        }
    }

    // Building from a flat buffer matches incremental inclusion
    #[test]
    fn from_flat_matches_include(points in prop::collection::vec(arb_vec3(), 0..32)) {
        let flat: Vec<f32> = points.iter().flat_map(|p| p.to_array()).collect();
        let mut b = Aabb::EMPTY;
        for p in &points {
            b.include(*p);
        }
        prop_assert_eq!(Aabb::from_flat(&flat), b);
    }

    // Extent is never negative on a non-empty box
    #[test]
    fn extent_non_negative(a in arb_vec3(), c in arb_vec3()) {
        let mut b = Aabb::EMPTY;
        b.include(a);
        b.include(c);
        let e = b.extent();
        prop_assert!(e.x >= 0.0 && e.y >= 0.0 && e.z >= 0.0);
    }
}
