use isomesh_geom::{Aabb, Vec3};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn vapprox_abs_rel(a: Vec3, b: Vec3, atol: f32, rtol: f32) -> bool {
    approx_abs_rel(a.x, b.x, atol, rtol)
        && approx_abs_rel(a.y, b.y, atol, rtol)
        && approx_abs_rel(a.z, b.z, atol, rtol)
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn small_vec3() -> impl Strategy<Value = Vec3> {
    let c = || bounded_f32().prop_map(|v| v % 1_000.0);
    (c(), c(), c()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn inside(b: &Aabb, p: Vec3) -> bool {
    p.min(b.min) == b.min && p.max(b.max) == b.max
}

fn arb_points() -> impl Strategy<Value = Vec<Vec3>> {
    prop::collection::vec(arb_vec3(), 1..32)
}

proptest! {
    // Every input point lies inside the box built from them
    #[test]
    fn from_points_contains_inputs(pts in arb_points()) {
        let b = Aabb::from_points(pts.iter().copied());
        prop_assert!(!b.is_empty());
        for p in &pts {
            prop_assert!(inside(&b, *p));
        }
    }

    // Box corners are attained by some input component
    #[test]
    fn from_points_is_tight(pts in arb_points()) {
        let b = Aabb::from_points(pts.iter().copied());
        let (lo, hi) = (b.min.to_array(), b.max.to_array());
        for axis in 0..3 {
            prop_assert!(pts.iter().any(|p| p.to_array()[axis] == lo[axis]));
            prop_assert!(pts.iter().any(|p| p.to_array()[axis] == hi[axis]));
        }
    }

    // Insertion order does not matter
    #[test]
    fn from_points_order_independent(pts in arb_points()) {
        let fwd = Aabb::from_points(pts.iter().copied());
        let rev = Aabb::from_points(pts.iter().rev().copied());
        prop_assert_eq!(fwd, rev);
    }

    // Midpoint translates with the box
    #[test]
    fn center_translation(pts in prop::collection::vec(small_vec3(), 1..32), t in small_vec3()) {
        let a = Aabb::from_points(pts.iter().copied());
        let b = Aabb::from_points(pts.iter().map(|p| *p + t));
        prop_assert!(vapprox_abs_rel(b.center(), a.center() + t, 1e-2, 1e-5));
    }
}
