/// Perspective projection onto a 2D surface
use nalgebra::Point3;

/// Distance from the eye to the projection plane in model units
pub const CAMERA_DISTANCE: f64 = 400.0;

/// A point in surface space
///
/// `z` is the untouched model-space depth, kept for culling and sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Pinhole camera looking down +z, centred on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub distance: f64,
}

impl Camera {
    pub fn new(distance: f64) -> Self {
        Self { distance }
    }

    /// Whether a rotated point lies strictly in front of the camera plane
    pub fn is_visible(&self, z: f64) -> bool {
        z > -self.distance
    }

    /// Project a 3D point to 2D screen space
    ///
    /// Returns `None` for points at or behind the camera plane, where the
    /// perspective factor is undefined.
    pub fn project_to_screen(&self, point: &Point3<f64>, width: u32, height: u32) -> Option<ScreenPoint> {
        if !self.is_visible(point.z) {
            return None;
        }

        let factor = self.distance / (self.distance + point.z);
        let x = point.x * factor + width as f64 / 2.0;
        let y = point.y * factor + height as f64 / 2.0;

        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        Some(ScreenPoint { x, y, z: point.z })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CAMERA_DISTANCE)
    }
}

/// Project with the default camera
pub fn project(point: &Point3<f64>, width: u32, height: u32) -> Option<ScreenPoint> {
    Camera::default().project_to_screen(point, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_centre() {
        let p = project(&Point3::origin(), 800, 600).unwrap();
        assert_eq!(p.x, 400.0);
        assert_eq!(p.y, 300.0);
        assert_eq!(p.z, 0.0);

        let p = project(&Point3::origin(), 101, 57).unwrap();
        assert_eq!(p.x, 50.5);
        assert_eq!(p.y, 28.5);
    }

    #[test]
    fn test_perspective_factor() {
        // z = 400 halves the offset from centre
        let p = project(&Point3::new(100.0, -50.0, 400.0), 0, 0).unwrap();
        assert!((p.x - 50.0).abs() < 1e-12);
        assert!((p.y + 25.0).abs() < 1e-12);
        assert_eq!(p.z, 400.0);

        // z < 0 magnifies
        let p = project(&Point3::new(100.0, 0.0, -200.0), 0, 0).unwrap();
        assert!((p.x - 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_camera_plane_is_culled() {
        assert!(project(&Point3::new(10.0, 10.0, -CAMERA_DISTANCE), 640, 480).is_none());
        assert!(project(&Point3::new(10.0, 10.0, -1000.0), 640, 480).is_none());
        assert!(project(&Point3::new(10.0, 10.0, -399.0), 640, 480).is_some());
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::default();
        assert_eq!(camera.distance, 400.0);
        assert!(camera.is_visible(-399.9));
        assert!(!camera.is_visible(-400.0));
    }
}
