/// The active shape instance and the per-frame render pipeline
use nalgebra::Point3;
use tracing::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{generate, PointCloud, ShapeFamily};
use crate::projection::Camera;
use crate::surface::Surface;
use crate::transform::{RotationSpeed, RotationState};

/// Disc radius for a point at rotated depth `z`: `max(1, 3 * (1 - z / 1000))`
pub fn point_radius(z: f64) -> f64 {
    (3.0 * (1.0 - z / 1000.0)).max(1.0)
}

/// Counts from one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub culled: usize,
}

/// Clear `surface` and draw every point after scale, rotation and projection
pub fn render_points<S: Surface + ?Sized>(
    points: &[Point3<f64>],
    scale: f64,
    rotation: &RotationState,
    color: Color,
    camera: &Camera,
    surface: &mut S,
) -> FrameStats {
    let (width, height) = surface.size();
    let matrix = rotation.matrix();
    let mut stats = FrameStats::default();

    surface.clear();

    for point in points {
        let rotated = matrix * Point3::from(point.coords * scale);

        match camera.project_to_screen(&rotated, width, height) {
            Some(screen) => {
                surface.fill_disc(screen.x, screen.y, point_radius(screen.z), color);
                stats.drawn += 1;
            }
            None => stats.culled += 1,
        }
    }

    stats
}

pub fn validate_scale(scale: f64) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScale(scale))
    }
}

/// Densest grid the controls accept; torus and sphere hold `resolution²` points
pub const MAX_RESOLUTION: u32 = 100;

pub fn validate_resolution(resolution: u32) -> Result<()> {
    if (1..=MAX_RESOLUTION).contains(&resolution) {
        Ok(())
    } else {
        Err(Error::InvalidResolution(resolution))
    }
}

/// One shape family instance with its transform state and cached points
#[derive(Debug, Clone)]
pub struct ShapeState {
    family: ShapeFamily,
    points: PointCloud,
    generated: bool,
    pub rotation: RotationState,
    scale: f64,
    color: Color,
    resolution: u32,
}

impl ShapeState {
    /// A fresh instance with zero rotation; points are generated on first render
    pub fn new(family: ShapeFamily, scale: f64, color: Color, resolution: u32) -> Self {
        Self {
            family,
            points: PointCloud::new(),
            generated: false,
            rotation: RotationState::zero(),
            scale,
            color,
            resolution,
        }
    }

    pub fn family(&self) -> ShapeFamily {
        self.family
    }

    pub fn points(&self) -> &PointCloud {
        &self.points
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        validate_scale(scale)?;
        self.scale = scale;
        Ok(())
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Change density and rebuild the point cloud immediately
    pub fn set_resolution(&mut self, resolution: u32) -> Result<()> {
        validate_resolution(resolution)?;
        self.resolution = resolution;
        self.invalidate();
        self.ensure_generated();
        Ok(())
    }

    /// Drop the cached points so the next render regenerates them
    pub fn invalidate(&mut self) {
        self.points = PointCloud::new();
        self.generated = false;
    }

    pub fn ensure_generated(&mut self) {
        if self.generated {
            return;
        }
        self.points = generate(self.family, self.resolution);
        self.generated = true;
        debug!(
            family = %self.family,
            resolution = self.resolution,
            points = self.points.len(),
            "generated point cloud"
        );
    }

    pub fn advance(&mut self, speed: &RotationSpeed) {
        self.rotation.advance(speed);
    }

    /// Draw one frame
    pub fn render<S: Surface + ?Sized>(&mut self, camera: &Camera, surface: &mut S) -> FrameStats {
        self.ensure_generated();
        render_points(
            self.points.as_slice(),
            self.scale,
            &self.rotation,
            self.color,
            camera,
            surface,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn torus_state() -> ShapeState {
        ShapeState::new(ShapeFamily::Torus, 1.0, Color::DEFAULT, 10)
    }

    #[test]
    fn test_point_radius() {
        assert_eq!(point_radius(0.0), 3.0);
        assert!((point_radius(-100.0) - 3.3).abs() < 1e-12);
        assert!((point_radius(500.0) - 1.5).abs() < 1e-12);
        // Clamped for far points
        assert_eq!(point_radius(900.0), 1.0);
        assert_eq!(point_radius(5000.0), 1.0);
    }

    #[test]
    fn test_points_generated_lazily() {
        let mut shape = torus_state();
        assert!(!shape.is_generated());
        assert!(shape.points().is_empty());

        let mut surface = RecordingSurface::new(640, 480);
        let stats = shape.render(&Camera::default(), &mut surface);
        assert!(shape.is_generated());
        assert_eq!(shape.points().len(), 100);
        assert_eq!(stats.drawn, 100);
        assert_eq!(surface.discs().len(), 100);
    }

    #[test]
    fn test_resolution_change_regenerates_synchronously() {
        let mut shape = torus_state();
        shape.ensure_generated();
        shape.set_resolution(7).unwrap();
        assert!(shape.is_generated());
        assert_eq!(shape.points().len(), 49);

        assert_eq!(shape.set_resolution(0), Err(Error::InvalidResolution(0)));
        assert_eq!(shape.resolution(), 7);
        assert_eq!(shape.points().len(), 49);
    }

    #[test]
    fn test_resolution_upper_bound() {
        let mut shape = torus_state();
        shape.set_resolution(MAX_RESOLUTION).unwrap();
        assert_eq!(shape.points().len(), (MAX_RESOLUTION * MAX_RESOLUTION) as usize);

        for resolution in [MAX_RESOLUTION + 1, 100_000, u32::MAX] {
            assert_eq!(
                shape.set_resolution(resolution),
                Err(Error::InvalidResolution(resolution))
            );
        }
        assert_eq!(shape.resolution(), MAX_RESOLUTION);
        assert_eq!(shape.points().len(), (MAX_RESOLUTION * MAX_RESOLUTION) as usize);
    }

    #[test]
    fn test_render_clears_every_frame() {
        let mut shape = torus_state();
        let mut surface = RecordingSurface::new(300, 200);
        let camera = Camera::default();
        shape.render(&camera, &mut surface);
        shape.render(&camera, &mut surface);
        assert_eq!(surface.clears(), 2);
        assert_eq!(surface.discs().len(), 100);
    }

    #[test]
    fn test_render_uses_current_surface_size() {
        let mut shape = ShapeState::new(ShapeFamily::Sphere, 1.0, Color::DEFAULT, 1);
        let camera = Camera::default();
        let mut surface = RecordingSurface::new(200, 100);
        shape.render(&camera, &mut surface);
        // Resolution 1 yields the single pole point (0, 0, 80)
        let disc = surface.discs()[0];
        assert!((disc.x - 100.0).abs() < 1e-9);
        assert!((disc.y - 50.0).abs() < 1e-9);

        surface.resize(1000, 800);
        shape.render(&camera, &mut surface);
        let disc = surface.discs()[0];
        assert!((disc.x - 500.0).abs() < 1e-9);
        assert!((disc.y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_applied_before_rotation() {
        let mut shape = ShapeState::new(ShapeFamily::Sphere, 2.0, Color::rgb(1, 2, 3), 1);
        shape.rotation = RotationState::new(std::f64::consts::FRAC_PI_2, 0.0, 0.0);
        let mut surface = RecordingSurface::new(0, 0);
        shape.render(&Camera::default(), &mut surface);

        // (0, 0, 160) rotated a quarter turn about X lands on (0, -160, 0)
        let disc = surface.discs()[0];
        assert!(disc.x.abs() < 1e-9);
        assert!((disc.y + 160.0).abs() < 1e-9);
        assert!((disc.radius - 3.0).abs() < 1e-9);
        assert_eq!(disc.color, Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_points_behind_camera_are_culled() {
        // Scaled far enough that the back of the sphere passes the camera plane
        let mut shape = ShapeState::new(ShapeFamily::Sphere, 10.0, Color::DEFAULT, 20);
        let mut surface = RecordingSurface::new(640, 480);
        let stats = shape.render(&Camera::default(), &mut surface);

        assert!(stats.culled > 0);
        assert_eq!(stats.drawn + stats.culled, 400);
        assert_eq!(surface.discs().len(), stats.drawn);
        for disc in surface.discs() {
            assert!(disc.x.is_finite() && disc.y.is_finite());
            assert!(disc.radius >= 1.0);
        }
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let mut shape = torus_state();
        assert!(shape.set_scale(0.0).is_err());
        assert!(shape.set_scale(-1.0).is_err());
        assert!(shape.set_scale(f64::INFINITY).is_err());
        assert_eq!(shape.scale(), 1.0);
        shape.set_scale(1.5).unwrap();
        assert_eq!(shape.scale(), 1.5);
    }
}
