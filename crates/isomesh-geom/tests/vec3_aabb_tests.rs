use isomesh_geom::{Aabb, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_constants() {
    assert!(vec3_approx_eq(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0), 1e-6));
    assert!(vec3_approx_eq(Vec3::ONE, Vec3::splat(1.0), 1e-6));
}

#[test]
fn vec3_add_sub_scale() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert!(vec3_approx_eq(c, Vec3::new(-3.0, 7.0, -3.0), 1e-6));
    assert!(vec3_approx_eq(c - a, b, 1e-6));

    let v = Vec3::ONE + Vec3::new(2.0, 3.0, 4.0) - Vec3::new(1.0, 2.0, 3.0);
    assert!(vec3_approx_eq(v, Vec3::splat(2.0), 1e-6));
    assert!(vec3_approx_eq((v * 3.0) / 2.0, Vec3::splat(3.0), 1e-6));
}

#[test]
fn vec3_cross_right_handed() {
    let i = Vec3::new(1.0, 0.0, 0.0);
    let j = Vec3::new(0.0, 1.0, 0.0);
    let k = Vec3::new(0.0, 0.0, 1.0);
    assert!(vec3_approx_eq(i.cross(j), k, 1e-6));
    assert!(vec3_approx_eq(j.cross(k), i, 1e-6));
    assert!(vec3_approx_eq(k.cross(i), j, 1e-6));
}

#[test]
fn vec3_length_and_bits() {
    assert!(approx_eq(Vec3::new(3.0, 4.0, 0.0).length(), 5.0, 1e-6));
    let v = Vec3::new(0.5, -1.25, 8.0);
    assert_eq!(v.to_array(), [0.5, -1.25, 8.0]);
    assert_eq!(v.to_bits(), [0.5f32.to_bits(), (-1.25f32).to_bits(), 8.0f32.to_bits()]);
    assert_eq!(Vec3::from(v.to_array()), v);
}

#[test]
fn aabb_empty_then_include() {
    let mut b = Aabb::default();
    assert!(b.is_empty());
    assert!(vec3_approx_eq(b.extent(), Vec3::ZERO, 0.0));

    b.include(Vec3::new(1.0, 2.0, 3.0));
    assert!(!b.is_empty());
    assert!(vec3_approx_eq(b.extent(), Vec3::ZERO, 0.0));

    b.include(Vec3::new(-1.0, 4.0, 0.0));
    assert!(vec3_approx_eq(b.min, Vec3::new(-1.0, 2.0, 0.0), 1e-6));
    assert!(vec3_approx_eq(b.max, Vec3::new(1.0, 4.0, 3.0), 1e-6));
    assert!(vec3_approx_eq(b.center(), Vec3::new(0.0, 3.0, 1.5), 1e-6));
}

#[test]
fn aabb_from_points_bounds_all() {
    let pts = [
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(2.0, -3.0, 1.0),
        Vec3::new(-0.25, 7.0, 4.5),
    ];
    let b = Aabb::from_points(pts);
    assert_eq!(b.min, Vec3::new(-0.25, -3.0, 0.5));
    assert_eq!(b.max, Vec3::new(2.0, 7.0, 4.5));
    assert!(Aabb::from_points(std::iter::empty()).is_empty());
}
