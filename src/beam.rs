//! Beam generators: ray-collection constructors for standard illumination
//! patterns.
//!
//! All beams launch from a plane z = `z_start` and share the convention that
//! the axial direction component is 100, so transverse components encode
//! tan(angle) directly. Angled beams shift their start positions by
//! −|z_start|·tan(angle) so the beam axis crosses the optical axis at z = 0.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::DVec3;
use thiserror::Error;

use crate::ray::Ray;

/// Axial direction component shared by every generated ray.
const AXIAL_COMPONENT: f64 = 100.0;

/// Beam configuration errors, fatal at beam construction.
#[derive(Debug, Error)]
pub enum BeamError {
    /// A beam angle at or beyond a quarter turn cannot propagate along +z.
    #[error("beam angle {angle} rad is too steep to propagate along the axis")]
    AngleTooSteep {
        /// The offending angle, radians.
        angle: f64,
    },
}

fn check_angle(angle: f64) -> Result<(), BeamError> {
    if angle.abs() >= FRAC_PI_2 {
        return Err(BeamError::AngleTooSteep { angle });
    }
    Ok(())
}

/// Point source at (x, 0, z_start) radiating a symmetric fan in the yz
/// plane, with y-direction components 0, ±spacing, ±2·spacing, …
///
/// Returns 2·count − 1 rays (the axial ray is not duplicated).
pub fn point_fan(count: usize, spacing: f64, x: f64, z_start: f64) -> Vec<Ray> {
    let origin = DVec3::new(x, 0.0, z_start);
    let mut rays = Vec::with_capacity(2 * count.max(1) - 1);
    for step in 0..count {
        let y_component = spacing * step as f64;
        rays.push(Ray::new(origin, DVec3::new(0.0, y_component, AXIAL_COMPONENT)));
        if step != 0 {
            rays.push(Ray::new(origin, DVec3::new(0.0, -y_component, AXIAL_COMPONENT)));
        }
    }
    rays
}

/// Collimated fan: parallel rays spaced along y at 0, ±spacing, …, all
/// tilted by `y_angle` about the x axis.
///
/// Returns 2·count − 1 rays.
pub fn collimated_fan(
    count: usize,
    spacing: f64,
    x: f64,
    y_angle: f64,
    z_start: f64,
) -> Result<Vec<Ray>, BeamError> {
    check_angle(y_angle)?;
    let direction = DVec3::new(0.0, y_angle.tan() * AXIAL_COMPONENT, AXIAL_COMPONENT);
    let y_offset = -z_start.abs() * y_angle.tan();

    let mut rays = Vec::with_capacity(2 * count.max(1) - 1);
    for step in 0..count {
        let y = spacing * step as f64;
        rays.push(Ray::new(DVec3::new(x, y + y_offset, z_start), direction));
        if step != 0 {
            rays.push(Ray::new(DVec3::new(x, -y + y_offset, z_start), direction));
        }
    }
    Ok(rays)
}

/// Beam with a square cross-section: collimated fans placed side by side at
/// x-offsets 0, ±spacing, …
pub fn rectangular_beam(
    count: usize,
    spacing: f64,
    y_angle: f64,
    z_start: f64,
) -> Result<Vec<Ray>, BeamError> {
    let mut rays = Vec::new();
    for step in 0..count {
        if step == 0 {
            rays.extend(collimated_fan(count, spacing, 0.0, y_angle, z_start)?);
        } else {
            let x = spacing * step as f64;
            rays.extend(collimated_fan(count, spacing, x, y_angle, z_start)?);
            rays.extend(collimated_fan(count, spacing, -x, y_angle, z_start)?);
        }
    }
    Ok(rays)
}

/// Cylindrical beam: a central ray plus concentric rings of radius
/// ring_step·n.
///
/// The point count per ring scales with its radius (arc spacing fixed at
/// (π/4)·ring_step), keeping the areal ray density constant across the
/// cross-section. `x_angle`/`y_angle` tilt the whole beam off axis.
pub fn cylindrical_beam(
    rings: usize,
    ring_step: f64,
    x_angle: f64,
    y_angle: f64,
    z_start: f64,
) -> Result<Vec<Ray>, BeamError> {
    check_angle(x_angle)?;
    check_angle(y_angle)?;

    // Arc distance between neighbouring rays on a ring.
    let arc_length = FRAC_PI_4 * ring_step;
    let direction = DVec3::new(
        x_angle.tan() * AXIAL_COMPONENT,
        y_angle.tan() * AXIAL_COMPONENT,
        AXIAL_COMPONENT,
    );
    let x_offset = -z_start.abs() * x_angle.tan();
    let y_offset = -z_start.abs() * y_angle.tan();

    let mut rays = Vec::new();
    for ring in 0..rings {
        if ring == 0 {
            rays.push(Ray::new(DVec3::new(x_offset, y_offset, z_start), direction));
            continue;
        }
        let radius = ring as f64 * ring_step;
        let points = (TAU * radius / arc_length) as usize;
        let theta_step = arc_length / radius;
        for point in 0..points {
            let theta = theta_step * point as f64;
            let position = DVec3::new(
                radius * theta.cos() + x_offset,
                radius * theta.sin() + y_offset,
                z_start,
            );
            rays.push(Ray::new(position, direction));
        }
    }
    Ok(rays)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_fan_ray_count_and_symmetry() {
        let rays = point_fan(3, 0.1, 0.0, -20.0);
        assert_eq!(rays.len(), 5);
        // All rays share the source point.
        assert!(rays
            .iter()
            .all(|ray| ray.position() == DVec3::new(0.0, 0.0, -20.0)));
        // The fan is symmetric about the axis.
        let sum: f64 = rays.iter().map(|ray| ray.direction().y).sum();
        assert!(sum.abs() < 1e-12);
    }

    #[test]
    fn collimated_fan_shares_one_direction() {
        let rays = collimated_fan(4, 0.5, 0.0, 0.1, -20.0).unwrap();
        assert_eq!(rays.len(), 7);
        let direction = rays[0].direction();
        assert!(rays.iter().all(|ray| ray.direction() == direction));
        assert!((direction.y / direction.z - 0.1f64.tan()).abs() < 1e-12);
        // Start positions are shifted so the beam axis crosses z = 0 on axis.
        assert!((rays[0].position().y + 20.0 * 0.1f64.tan()).abs() < 1e-12);
    }

    #[test]
    fn steep_angles_are_rejected() {
        assert!(collimated_fan(3, 0.5, 0.0, FRAC_PI_2, -20.0).is_err());
        assert!(cylindrical_beam(3, 0.1, 0.0, FRAC_PI_2, -20.0).is_err());
        assert!(cylindrical_beam(3, 0.1, -FRAC_PI_2, 0.0, -20.0).is_err());
    }

    #[test]
    fn rectangular_beam_squares_the_fan() {
        let rays = rectangular_beam(3, 0.5, 0.0, -20.0).unwrap();
        // 5 columns of 5 rays each.
        assert_eq!(rays.len(), 25);
        let xs: Vec<f64> = rays.iter().map(|ray| ray.position().x).collect();
        assert!(xs.iter().any(|&x| x == 1.0));
        assert!(xs.iter().any(|&x| x == -1.0));
    }

    #[test]
    fn cylindrical_beam_keeps_constant_density() {
        // Ring n holds 8n rays regardless of the step size.
        let rays = cylindrical_beam(2, 0.1, 0.0, 0.0, -20.0).unwrap();
        assert_eq!(rays.len(), 1 + 8);
        let rays = cylindrical_beam(3, 0.25, 0.0, 0.0, -20.0).unwrap();
        assert_eq!(rays.len(), 1 + 8 + 16);

        // First ring sits at the expected radius.
        let radius = rays[1].position().truncate().length();
        assert!((radius - 0.25).abs() < 1e-12);
    }

    #[test]
    fn cylindrical_beam_points_down_the_axis() {
        let rays = cylindrical_beam(2, 0.1, 0.0, 0.0, -20.0).unwrap();
        assert!(rays
            .iter()
            .all(|ray| ray.direction() == DVec3::new(0.0, 0.0, 100.0)));
        assert!(rays.iter().all(|ray| ray.position().z == -20.0));
    }
}
