//! Sequential propagation of ray collections through an optical system.

use log::debug;

use crate::ray::Ray;
use crate::surface::Surface;

/// Propagate every ray through each surface in order, in place.
///
/// Surfaces must be supplied in physically increasing-z traversal order; the
/// ordering is not validated. Each surface is applied to the whole
/// collection before the next one is considered, since later intersection
/// geometry is evaluated against the updated ray positions.
pub fn propagate(surfaces: &[Surface], rays: &mut [Ray]) {
    debug!(
        "propagating {} rays through {} surfaces",
        rays.len(),
        surfaces.len()
    );
    for surface in surfaces {
        surface.encounter(rays);
    }
}
