//! Ray representation for sequential lens tracing.
//!
//! A ray is defined as r(t) = position + t * direction, and additionally
//! carries the full record of every (position, direction) state it has
//! passed through, so spot diagrams and aberration metrics can be computed
//! after propagation has finished.

use glam::DVec3;

/// Light ray with current state and full propagation history.
///
/// The history is append-only and never empty: it is seeded with the
/// construction state, and its last entry always mirrors the current
/// (position, direction) pair. A ray whose direction is the zero vector is
/// terminated and is never moved again.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    /// Current location in world coordinates.
    position: DVec3,

    /// Current propagation direction.
    ///
    /// Not required to be unit length between steps; surfaces normalize it
    /// where the refraction math needs a unit vector.
    direction: DVec3,

    /// Every (position, direction) pair visited, in order.
    history: Vec<(DVec3, DVec3)>,
}

impl Ray {
    /// Create a new ray, seeding the history with the construction state.
    pub fn new(position: DVec3, direction: DVec3) -> Self {
        Self {
            position,
            direction,
            history: vec![(position, direction)],
        }
    }

    /// Current position.
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Current direction.
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = position + t * direction.
    pub fn at(&self, t: f64) -> DVec3 {
        self.position + t * self.direction
    }

    /// Record a new state, making it current.
    pub fn append(&mut self, position: DVec3, direction: DVec3) {
        self.history.push((position, direction));
        self.position = position;
        self.direction = direction;
    }

    /// Record a new position, keeping the current direction.
    pub fn extend_to(&mut self, position: DVec3) {
        let direction = self.direction;
        self.append(position, direction);
    }

    /// Stop the ray at `position` by zeroing its direction.
    ///
    /// Terminating an already-terminated ray is a no-op: the trajectory
    /// keeps its original terminal point and the history does not grow.
    pub fn terminate(&mut self, position: DVec3) {
        if self.is_terminated() {
            return;
        }
        self.append(position, DVec3::ZERO);
    }

    /// Whether the ray has been terminated (zero direction).
    pub fn is_terminated(&self) -> bool {
        self.direction == DVec3::ZERO
    }

    /// The position the ray was constructed with.
    pub fn launch_point(&self) -> DVec3 {
        self.history[0].0
    }

    /// Ordered view over every recorded position.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = DVec3> + '_ {
        self.history.iter().map(|(position, _)| *position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_seeded_with_construction_state() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, -20.0), DVec3::new(0.0, 0.1, 1.0));
        assert_eq!(ray.vertices().len(), 1);
        assert_eq!(ray.launch_point(), DVec3::new(0.0, 0.0, -20.0));
        assert_eq!(ray.position(), DVec3::new(0.0, 0.0, -20.0));
        assert!(!ray.is_terminated());
    }

    #[test]
    fn append_tracks_current_state() {
        let mut ray = Ray::new(DVec3::ZERO, DVec3::Z);
        ray.append(DVec3::new(0.0, 1.0, 5.0), DVec3::new(0.0, -0.1, 1.0));
        assert_eq!(ray.position(), DVec3::new(0.0, 1.0, 5.0));
        assert_eq!(ray.direction(), DVec3::new(0.0, -0.1, 1.0));
        assert_eq!(ray.vertices().len(), 2);
        assert_eq!(ray.vertices().last().unwrap(), ray.position());
    }

    #[test]
    fn extend_to_keeps_direction() {
        let mut ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.5, 1.0));
        ray.extend_to(DVec3::new(0.0, 2.5, 5.0));
        assert_eq!(ray.direction(), DVec3::new(0.0, 0.5, 1.0));
        assert_eq!(ray.vertices().len(), 2);
    }

    #[test]
    fn terminate_is_idempotent() {
        let mut ray = Ray::new(DVec3::ZERO, DVec3::Z);
        ray.terminate(DVec3::new(1.0, 2.0, 3.0));
        assert!(ray.is_terminated());
        assert_eq!(ray.position(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.vertices().len(), 2);

        // A second terminate must not move the ray or grow the history.
        ray.terminate(DVec3::new(9.0, 9.0, 9.0));
        assert_eq!(ray.position(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.direction(), DVec3::ZERO);
        assert_eq!(ray.vertices().len(), 2);
    }

    #[test]
    fn at_evaluates_along_the_ray() {
        let ray = Ray::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(ray.at(2.5), DVec3::new(1.0, 0.0, 5.0));
    }
}
