//! Optical surfaces and the per-ray propagation state machine.
//!
//! Two kinds of surface exist: a refracting interface (spherical, or planar
//! when its curvature is zero) and the terminal output plane that ends every
//! trajectory. Both are rotationally symmetric about the z axis and sit at a
//! fixed axial position. A surface encounter either refracts the ray onward
//! or terminates it; per-ray failures (missed surface, total internal
//! reflection) never abort the rest of the collection.

use glam::DVec3;
use rayon::prelude::*;
use thiserror::Error;

use crate::ray::Ray;

/// Fatal construction-time errors for optical surfaces.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The aperture extends beyond the sphere the curvature describes.
    #[error("aperture radius {aperture} mm exceeds the {extent} mm physical extent of the surface")]
    ApertureExceedsExtent {
        /// Requested aperture radius, mm.
        aperture: f64,
        /// Radius of the sphere implied by the curvature, mm.
        extent: f64,
    },
}

/// Spherical or planar refracting interface centered on the optical axis.
///
/// Curvature is the signed reciprocal of the sphere radius: positive is
/// convex toward the incoming (−z) side, negative concave, zero planar.
/// `index_left`/`index_right` are the refractive indices on the incoming and
/// outgoing side of the interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefractingSurface {
    z0: f64,
    curvature: f64,
    index_left: f64,
    index_right: f64,
    aperture_radius: f64,
}

impl RefractingSurface {
    /// Create a refracting surface at axial position `z0`.
    ///
    /// Fails when a non-zero curvature implies a sphere smaller than the
    /// requested aperture: such a surface cannot physically exist.
    pub fn new(
        z0: f64,
        curvature: f64,
        index_left: f64,
        index_right: f64,
        aperture_radius: f64,
    ) -> Result<Self, SurfaceError> {
        if curvature != 0.0 {
            let extent = (1.0 / curvature).abs();
            if aperture_radius >= extent {
                return Err(SurfaceError::ApertureExceedsExtent {
                    aperture: aperture_radius,
                    extent,
                });
            }
        }
        Ok(Self {
            z0,
            curvature,
            index_left,
            index_right,
            aperture_radius,
        })
    }

    /// Axial position of the surface vertex.
    pub fn axial_position(&self) -> f64 {
        self.z0
    }

    /// Signed curvature, 1/mm.
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// Center of the sphere the surface lies on.
    ///
    /// Only meaningful for non-zero curvature.
    fn center(&self) -> DVec3 {
        DVec3::new(0.0, 0.0, self.z0 + 1.0 / self.curvature)
    }

    /// Intersection point of `ray` with this surface, if one exists within
    /// the aperture.
    ///
    /// For a spherical surface the quadratic root is chosen by orientation:
    /// the near-side intersection for a convex surface, the far side for a
    /// concave one. A negative discriminant, a ray running parallel to a
    /// planar surface, or an intersection outside the aperture all yield
    /// `None`.
    pub fn intercept(&self, ray: &Ray) -> Option<DVec3> {
        let point = if self.curvature == 0.0 {
            plane_intercept(self.z0, ray)?
        } else {
            let radius = 1.0 / self.curvature;
            let oc = self.center() - ray.position();
            let d = ray.direction();
            let a = d.length_squared();
            if a == 0.0 {
                // No direction to advance along.
                return None;
            }
            let h = d.dot(oc);
            let c = oc.length_squared() - radius * radius;
            let discriminant = h * h - a * c;
            if discriminant < 0.0 {
                return None;
            }
            let sqrtd = discriminant.sqrt();
            let t = if self.curvature > 0.0 {
                (h - sqrtd) / a
            } else {
                (h + sqrtd) / a
            };
            ray.at(t)
        };

        // The surface only acts within its aperture.
        if point.x.abs() > self.aperture_radius || point.y.abs() > self.aperture_radius {
            return None;
        }
        Some(point)
    }

    /// Surface normal at `point`, unnormalized.
    ///
    /// Planar surfaces report the fixed (0, 0, −1); spherical surfaces the
    /// vector from the sphere center, negated for concave curvature so the
    /// normal always faces the incoming ray.
    pub fn normal_at(&self, point: DVec3) -> DVec3 {
        if self.curvature == 0.0 {
            return DVec3::NEG_Z;
        }
        let normal = point - self.center();
        if self.curvature < 0.0 {
            -normal
        } else {
            normal
        }
    }

    /// Transmitted unit direction for a unit `incident` direction and unit
    /// surface `normal`, or `None` on total internal reflection.
    ///
    /// Vector form of Snell's law: the transmitted direction is the
    /// along-surface component of the incident direction scaled by n1/n2,
    /// plus a component along −normal sized so the result stays unit length.
    pub fn refract(&self, incident: DVec3, normal: DVec3) -> Option<DVec3> {
        let cos_incidence = incident.dot(normal).clamp(-1.0, 1.0);
        let sin_incidence = (1.0 - cos_incidence * cos_incidence).sqrt();
        if sin_incidence > self.index_right / self.index_left {
            // Total internal reflection: no transmitted ray.
            return None;
        }

        let ratio = self.index_left / self.index_right;
        let along_surface = ratio * normal.cross((-normal).cross(incident));
        let cross = normal.cross(incident);
        let along_normal = (1.0 - ratio * ratio * cross.length_squared()).max(0.0).sqrt();
        Some(along_surface - normal * along_normal)
    }

    fn propagate_ray(&self, ray: &mut Ray) {
        let fallback = fallback_point(self.z0, ray);
        let Some(point) = self.intercept(ray) else {
            ray.terminate(fallback);
            return;
        };

        let incident = ray.direction().normalize();
        let normal = self.normal_at(point).normalize();
        match self.refract(incident, normal) {
            Some(transmitted) => ray.append(point, transmitted),
            // Total internal reflection stops the ray where it struck.
            None => ray.terminate(point),
        }
    }
}

/// Terminal detector plane.
///
/// Unbounded in x and y: it represents a detector screen, not a lens, so it
/// accepts any non-parallel intersection without an aperture check and ends
/// every trajectory that reaches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputPlane {
    z0: f64,
}

impl OutputPlane {
    /// Create an output plane at axial position `z0`.
    pub fn new(z0: f64) -> Self {
        Self { z0 }
    }

    /// Axial position of the plane.
    pub fn axial_position(&self) -> f64 {
        self.z0
    }

    /// Intersection point of `ray` with the plane, `None` when the ray runs
    /// parallel to it.
    pub fn intercept(&self, ray: &Ray) -> Option<DVec3> {
        plane_intercept(self.z0, ray)
    }

    fn propagate_ray(&self, ray: &mut Ray) {
        // The detector is the unconditional end of the trajectory.
        match self.intercept(ray) {
            Some(point) => ray.terminate(point),
            None => ray.terminate(fallback_point(self.z0, ray)),
        }
    }
}

/// Closed set of surfaces a ray can encounter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Refracting interface, spherical or planar.
    Refracting(RefractingSurface),
    /// Terminal output plane.
    Output(OutputPlane),
}

impl Surface {
    /// Refracting surface, see [`RefractingSurface::new`].
    pub fn lens(
        z0: f64,
        curvature: f64,
        index_left: f64,
        index_right: f64,
        aperture_radius: f64,
    ) -> Result<Self, SurfaceError> {
        Ok(Self::Refracting(RefractingSurface::new(
            z0,
            curvature,
            index_left,
            index_right,
            aperture_radius,
        )?))
    }

    /// Terminal output plane at `z0`.
    pub fn output_plane(z0: f64) -> Self {
        Self::Output(OutputPlane::new(z0))
    }

    /// Axial position of the surface vertex.
    pub fn axial_position(&self) -> f64 {
        match self {
            Surface::Refracting(surface) => surface.axial_position(),
            Surface::Output(plane) => plane.axial_position(),
        }
    }

    /// Advance one ray through this surface.
    ///
    /// In-flight rays either refract onward (one history entry appended) or
    /// terminate at the surface; terminated rays pass through untouched.
    pub fn propagate_ray(&self, ray: &mut Ray) {
        if ray.is_terminated() {
            return;
        }
        match self {
            Surface::Refracting(surface) => surface.propagate_ray(ray),
            Surface::Output(plane) => plane.propagate_ray(ray),
        }
    }

    /// Advance every ray in the collection through this surface.
    ///
    /// Rays carry no cross-ray state, so the collection is processed in
    /// parallel; the outcome is independent of ordering and thread count.
    pub fn encounter(&self, rays: &mut [Ray]) {
        rays.par_iter_mut().for_each(|ray| self.propagate_ray(ray));
    }
}

/// Intersection of a ray with the plane z = z0.
fn plane_intercept(z0: f64, ray: &Ray) -> Option<DVec3> {
    let direction = ray.direction();
    if direction.z == 0.0 {
        return None;
    }
    let t = (z0 - ray.position().z) / direction.z;
    Some(ray.at(t))
}

/// Termination point for a ray that never cleanly leaves a surface: its
/// straight-line extrapolation to the surface plane, or its launch point
/// when it has no z motion to extrapolate with.
fn fallback_point(z0: f64, ray: &Ray) -> DVec3 {
    let direction = ray.direction();
    if direction.z != 0.0 {
        ray.at((z0 - ray.position().z) / direction.z)
    } else {
        ray.launch_point()
    }
}
