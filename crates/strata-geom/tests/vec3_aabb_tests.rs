use strata_geom::{Aabb, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_from_flat_reads_triples() {
    let buf = [0.0, 1.0, 2.0, -3.0, 4.5, 6.0];
    assert_eq!(Vec3::from_flat(&buf, 0), Some(Vec3::new(0.0, 1.0, 2.0)));
    assert_eq!(Vec3::from_flat(&buf, 1), Some(Vec3::new(-3.0, 4.5, 6.0)));
    assert_eq!(Vec3::from_flat(&buf, 2), None);
    assert_eq!(Vec3::from_flat(&buf[..5], 1), None);
}

#[test]
fn vec3_cross_of_grid_edges_points_up() {
    // Edge down the grid (+Z) crossed with edge across the grid (+X).
    let down = Vec3::new(0.0, 0.0, 1.0);
    let across = Vec3::new(1.0, 0.0, 0.0);
    assert!(vec3_approx_eq(down.cross(across), Vec3::UP, 1e-6));
}

#[test]
fn vec3_normalized_zero_is_noop() {
    let n = Vec3::ZERO.normalized();
    assert!(vec3_approx_eq(n, Vec3::ZERO, 1e-6));
    let v = Vec3::new(3.0, 4.0, 0.0).normalized();
    assert!(vec3_approx_eq(v, Vec3::new(0.6, 0.8, 0.0), 1e-6));
}

#[test]
fn aabb_empty_has_zero_extent() {
    let b = Aabb::default();
    assert!(b.is_empty());
    assert_eq!(b.extent(), Vec3::ZERO);
    assert!(Aabb::from_flat(&[]).is_empty());
}

#[test]
fn aabb_from_flat_covers_all_vertices() {
    let buf = [-2.0, 0.5, -2.0, 1.0, -3.0, 1.0, 0.0, 7.0, 0.0];
    let b = Aabb::from_flat(&buf);
    assert!(!b.is_empty());
    assert!(vec3_approx_eq(b.min, Vec3::new(-2.0, -3.0, -2.0), 1e-6));
    assert!(vec3_approx_eq(b.max, Vec3::new(1.0, 7.0, 1.0), 1e-6));
    assert!(vec3_approx_eq(b.extent(), Vec3::new(3.0, 10.0, 3.0), 1e-6));
    assert!(vec3_approx_eq(b.center(), Vec3::new(-0.5, 2.0, -0.5), 1e-6));
}
