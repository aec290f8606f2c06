//! Spot-diagram output.
//!
//! Renders ray transverse positions at a plane into a PNG image, the
//! detector-side picture of the beam used alongside the RMS metric.

use image::{ImageBuffer, Rgb};
use log::{info, warn};

use crate::aberration::PLANE_MATCH_TOLERANCE;
use crate::ray::Ray;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([200, 200, 200]);
const DOT: Rgb<u8> = Rgb([20, 40, 160]);

/// Collect the (x, y) coordinates of ray vertices on the plane z = target_z.
fn spot_points(rays: &[Ray], target_z: f64) -> Vec<(f64, f64)> {
    rays.iter()
        .flat_map(|ray| ray.vertices())
        .filter(|vertex| (vertex.z - target_z).abs() <= PLANE_MATCH_TOLERANCE)
        .map(|vertex| (vertex.x, vertex.y))
        .collect()
}

/// Render spot points into a square image.
///
/// The frame spans symmetrically around the optical axis, scaled to the
/// largest transverse coordinate present plus a small margin, with a grey
/// axis cross and one dot per point.
fn spot_image(points: &[(f64, f64)], size: u32) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    let mut image = ImageBuffer::from_pixel(size, size, BACKGROUND);

    let centre = size / 2;
    for i in 0..size {
        image.put_pixel(i, centre, AXIS);
        image.put_pixel(centre, i, AXIS);
    }

    let extent = points
        .iter()
        .map(|&(x, y)| x.abs().max(y.abs()))
        .fold(0.0f64, f64::max);
    if extent == 0.0 {
        // Nothing off axis to scale by; dots (if any) land on the centre.
        if !points.is_empty() {
            image.put_pixel(centre, centre, DOT);
        }
        return image;
    }

    let scale = (size as f64 / 2.0 - 2.0) / (extent * 1.05);
    let centre = centre as i64;
    for &(x, y) in points {
        let px = centre + (x * scale).round() as i64;
        let py = centre - (y * scale).round() as i64;
        for dx in -1..=1i64 {
            for dy in -1..=1i64 {
                let (ix, iy) = (px + dx, py + dy);
                if ix >= 0 && iy >= 0 && ix < size as i64 && iy < size as i64 {
                    image.put_pixel(ix as u32, iy as u32, DOT);
                }
            }
        }
    }
    image
}

/// Save the spot diagram of `rays` at z = target_z as a PNG.
///
/// I/O failures are logged as warnings rather than propagated, so a failed
/// write never discards an otherwise finished trace.
pub fn save_spot_diagram(rays: &[Ray], target_z: f64, output_path: &str, size: u32) {
    let points = spot_points(rays, target_z);
    if points.is_empty() {
        warn!("no ray vertices on plane z = {target_z}, writing an empty spot diagram");
    }

    let image = spot_image(&points, size.max(8));
    match image.save(output_path) {
        Ok(_) => info!(
            "spot diagram ({} points) saved as {}",
            points.len(),
            output_path
        ),
        Err(e) => warn!("Failed to save spot diagram: {}", e),
    }
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
    fn spot_points_filter_by_plane() {
        let rays = vec![ray_ending_at(1.0, -2.0, 30.0), ray_ending_at(0.5, 0.5, 31.0)];
        let points = spot_points(&rays, 30.0);
        assert_eq!(points, vec![(1.0, -2.0)]);
    }

    #[test]
    fn spot_image_marks_the_points() {
        let image = spot_image(&[(0.0, 1.0)], 64);
        assert_eq!(image.dimensions(), (64, 64));
        // y = +1 at full extent lands above the centre row.
        let marked = image
            .enumerate_pixels()
            .filter(|&(_, _, pixel)| *pixel == DOT)
            .count();
        assert!(marked > 0);
        assert!(image
            .enumerate_pixels()
            .filter(|&(_, _, pixel)| *pixel == DOT)
            .all(|(_, y, _)| y < 32));
    }

    #[test]
    fn on_axis_points_land_on_the_centre() {
        let image = spot_image(&[(0.0, 0.0)], 32);
        assert_eq!(*image.get_pixel(16, 16), DOT);
    }
}
