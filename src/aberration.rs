//! RMS spot-size aberration metric.

use crate::ray::Ray;

/// Absolute tolerance used to match recorded vertices to a plane's axial
/// position.
///
/// Vertex coordinates come out of `position + t * direction` arithmetic, so
/// exact equality would silently drop most matches after a few propagation
/// steps.
pub const PLANE_MATCH_TOLERANCE: f64 = 1e-9;

/// Root-mean-square transverse displacement of a ray collection at the
/// plane z = `target_z`.
///
/// Scans every recorded vertex of every ray, accumulates x² + y² over the
/// vertices lying on the target plane, averages over the number of rays and
/// takes the square root. Meant to be called with the axial position of a
/// surface every ray visits exactly once, typically the output plane.
/// Returns 0.0 for an empty collection.
pub fn rms_spot_size(rays: &[Ray], target_z: f64) -> f64 {
    if rays.is_empty() {
        return 0.0;
    }
    let total: f64 = rays
        .iter()
        .flat_map(|ray| ray.vertices())
        .filter(|vertex| (vertex.z - target_z).abs() <= PLANE_MATCH_TOLERANCE)
        .map(|vertex| vertex.x * vertex.x + vertex.y * vertex.y)
        .sum();
    (total / rays.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn ray_ending_at(x: f64, y: f64, z: f64) -> Ray {
        let mut ray = Ray::new(DVec3::new(0.0, 0.0, -20.0), DVec3::new(0.0, 0.0, 1.0));
        ray.terminate(DVec3::new(x, y, z));
        ray
    }

    #[test]
    fn three_ray_reference_value() {
        let rays = vec![
            ray_ending_at(1.0, 1.0, 10.0),
            ray_ending_at(-1.0, 1.0, 10.0),
            ray_ending_at(0.0, 1.0 - 3.0f64.sqrt(), 10.0),
        ];

        let rms = rms_spot_size(&rays, 10.0);
        let expected = ((2.0 + 2.0 + (3.0f64.sqrt() - 1.0).powi(2)) / 3.0).sqrt();
        assert!((rms - expected).abs() < 1e-12);
        assert!((rms - 1.2296).abs() < 1e-4);
    }

    #[test]
    fn vertices_off_the_plane_are_ignored() {
        let rays = vec![ray_ending_at(3.0, 4.0, 10.0)];
        // Launch vertex at z = -20 does not contribute.
        assert!((rms_spot_size(&rays, 10.0) - 5.0).abs() < 1e-12);
        assert_eq!(rms_spot_size(&rays, 25.0), 0.0);
    }

    #[test]
    fn matching_tolerates_float_drift() {
        let rays = vec![ray_ending_at(2.0, 0.0, 10.0 + 1e-12)];
        assert!((rms_spot_size(&rays, 10.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_collection_is_zero() {
        assert_eq!(rms_spot_size(&[], 0.0), 0.0);
    }
}
