//! Singlet lens optimization by brute-force curvature search.
//!
//! Sweeps candidate front-surface curvatures, pairs each with the rear
//! curvature that keeps the prescribed focal length (thick-lens lensmaker's
//! equation), and scores every candidate by the RMS spot size of a standard
//! evaluation beam at the focal plane.

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use crate::aberration::rms_spot_size;
use crate::beam::{cylindrical_beam, BeamError};
use crate::surface::{Surface, SurfaceError};
use crate::system::propagate;

/// Rings in the evaluation beam.
const EVALUATION_RINGS: usize = 20;
/// Radial ring spacing of the evaluation beam, mm.
const EVALUATION_RING_STEP: f64 = 0.2;
/// Launch plane of the evaluation beam.
const EVALUATION_LAUNCH_Z: f64 = -20.0;

/// Errors from assembling an optimization sweep.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// A candidate surface violated its construction invariant.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// The evaluation beam configuration was invalid.
    #[error(transparent)]
    Beam(#[from] BeamError),
}

/// A scored singlet configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingletDesign {
    /// Curvature of the front (air-to-glass) surface, 1/mm.
    pub front_curvature: f64,
    /// Curvature of the rear (glass-to-air) surface, 1/mm.
    pub rear_curvature: f64,
    /// RMS spot size at the focal plane, mm.
    pub rms: f64,
}

/// Rear-surface curvature fixing `focal_length` for a given front curvature.
///
/// Rearrangement of the thick-lens lensmaker's equation
/// 1/f = (n−1)·(c1 − c2 + (n−1)·d·c1·c2/n) solved for c2, with d the axial
/// thickness between the two surfaces.
pub fn matching_rear_curvature(
    front_curvature: f64,
    focal_length: f64,
    lens_index: f64,
    thickness: f64,
) -> f64 {
    let top = 1.0 / (focal_length * (lens_index - 1.0)) - front_curvature;
    let bottom = ((lens_index - 1.0) * thickness / lens_index) * front_curvature - 1.0;
    top / bottom
}

/// Half-open sweep of curvatures from `start` toward `stop` in `step`
/// increments (arange-style, so accumulated rounding may drop or keep the
/// endpoint).
pub fn curvature_grid(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut grid = Vec::new();
    let mut value = start;
    while value < stop {
        grid.push(value);
        value += step;
    }
    grid
}

/// Score every candidate front curvature and return the best design.
///
/// Each candidate singlet has its front surface at z = 0, its rear surface
/// at z = `thickness`, and the output plane at focal_length + thickness/2
/// (focal length measured from the lens centre). The evaluation beam is a
/// 20-ring cylindrical beam launched on axis from z = −20. Returns `None`
/// for an empty candidate list.
pub fn optimize_singlet(
    focal_length: f64,
    lens_index: f64,
    thickness: f64,
    aperture_radius: f64,
    front_curvatures: &[f64],
) -> Result<Option<SingletDesign>, OptimizeError> {
    let output_z = focal_length + thickness / 2.0;
    let beam = cylindrical_beam(
        EVALUATION_RINGS,
        EVALUATION_RING_STEP,
        0.0,
        0.0,
        EVALUATION_LAUNCH_Z,
    )?;

    let pb = ProgressBar::new(front_curvatures.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} ETA: {eta}")
            .unwrap(),
    );

    let mut best: Option<SingletDesign> = None;
    for &front_curvature in front_curvatures {
        let rear_curvature =
            matching_rear_curvature(front_curvature, focal_length, lens_index, thickness);
        let surfaces = [
            Surface::lens(0.0, front_curvature, 1.0, lens_index, aperture_radius)?,
            Surface::lens(thickness, rear_curvature, lens_index, 1.0, aperture_radius)?,
            Surface::output_plane(output_z),
        ];

        let mut rays = beam.clone();
        propagate(&surfaces, &mut rays);
        let rms = rms_spot_size(&rays, output_z);

        if best.map_or(true, |design| rms < design.rms) {
            best = Some(SingletDesign {
                front_curvature,
                rear_curvature,
                rms,
            });
        }
        pb.inc(1);
    }
    pb.finish();

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rear_curvature_satisfies_the_lensmaker_equation() {
        let (f, n, d) = (35.487, 1.5168, 10.0);
        for c1 in [0.01, 0.02, 0.05, 0.1, 0.15] {
            let c2 = matching_rear_curvature(c1, f, n, d);
            let focal_power = (n - 1.0) * (c1 - c2 + (n - 1.0) * d * c1 * c2 / n);
            assert!((focal_power - 1.0 / f).abs() < 1e-12);
        }
    }

    #[test]
    fn curvature_grid_matches_the_reference_sweep() {
        let grid = curvature_grid(0.01, 0.151, 0.01);
        assert_eq!(grid.len(), 15);
        assert!((grid[0] - 0.01).abs() < 1e-12);
        assert!((grid[14] - 0.15).abs() < 1e-9);
    }

    #[test]
    fn empty_grid_yields_no_design() {
        let best = optimize_singlet(35.487, 1.5168, 10.0, 5.0, &[]).unwrap();
        assert!(best.is_none());
    }

    #[test]
    fn best_design_minimizes_the_rms() {
        let (f, n, d, ap) = (35.487, 1.5168, 10.0, 5.0);
        let a = optimize_singlet(f, n, d, ap, &[0.01]).unwrap().unwrap();
        let b = optimize_singlet(f, n, d, ap, &[0.05]).unwrap().unwrap();
        let combined = optimize_singlet(f, n, d, ap, &[0.01, 0.05]).unwrap().unwrap();

        assert!(a.rms >= 0.0 && b.rms >= 0.0);
        let expected = if a.rms <= b.rms { a } else { b };
        assert_eq!(combined, expected);
    }
}
