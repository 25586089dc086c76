/// Point-cloud generators, one per shape family
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::Error;

pub const TORUS_MAJOR_RADIUS: f64 = 100.0;
pub const TORUS_MINOR_RADIUS: f64 = 40.0;
pub const SPHERE_RADIUS: f64 = 80.0;
pub const CUBE_HALF_SIZE: i32 = 70;
pub const PYRAMID_HALF_BASE: i32 = 80;
pub const PYRAMID_HEIGHT: f64 = 100.0;
/// Samples along each pyramid edge, both endpoints included
pub const PYRAMID_EDGE_SAMPLES: u32 = 5;

/// The supported shape generators
///
/// Deserializing never fails: unknown names become the torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeFamily {
    #[default]
    Torus,
    Sphere,
    Cube,
    Pyramid,
}

impl ShapeFamily {
    pub const ALL: [ShapeFamily; 4] = [
        ShapeFamily::Torus,
        ShapeFamily::Sphere,
        ShapeFamily::Cube,
        ShapeFamily::Pyramid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeFamily::Torus => "torus",
            ShapeFamily::Sphere => "sphere",
            ShapeFamily::Cube => "cube",
            ShapeFamily::Pyramid => "pyramid",
        }
    }

    /// Resolve a family name, falling back to the torus for anything unknown
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(name, "unknown shape family, falling back to torus");
            ShapeFamily::default()
        })
    }
}

impl fmt::Display for ShapeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "torus" | "donut" => Ok(ShapeFamily::Torus),
            "sphere" => Ok(ShapeFamily::Sphere),
            "cube" => Ok(ShapeFamily::Cube),
            "pyramid" => Ok(ShapeFamily::Pyramid),
            other => Err(Error::Parse(format!("unknown shape family {other:?}"))),
        }
    }
}

impl From<String> for ShapeFamily {
    fn from(name: String) -> Self {
        ShapeFamily::from_name_or_default(&name)
    }
}

impl From<ShapeFamily> for String {
    fn from(family: ShapeFamily) -> Self {
        family.name().to_string()
    }
}

/// An ordered set of model-space points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<Point3<f64>>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn add_point(&mut self, x: f64, y: f64, z: f64) {
        self.points.push(Point3::new(x, y, z));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Point3<f64>] {
        &self.points
    }
}

/// Generate the point cloud for a family at the given resolution
pub fn generate(family: ShapeFamily, resolution: u32) -> PointCloud {
    match family {
        ShapeFamily::Torus => torus(resolution),
        ShapeFamily::Sphere => sphere(resolution),
        ShapeFamily::Cube => cube(resolution),
        ShapeFamily::Pyramid => pyramid(resolution),
    }
}

/// Grid spacing for the cube and pyramid: `max(1, floor(resolution / 5))`
pub fn grid_step(resolution: u32) -> usize {
    (resolution / 5).max(1) as usize
}

fn grid(half: i32, step: usize) -> impl Iterator<Item = f64> + Clone {
    (-half..=half).step_by(step).map(f64::from)
}

pub fn torus(resolution: u32) -> PointCloud {
    let n = resolution as usize;
    let mut cloud = PointCloud::with_capacity(n * n);
    let res = resolution as f64;

    for i in 0..resolution {
        let theta = i as f64 / res * TAU;
        for j in 0..resolution {
            let phi = j as f64 / res * TAU;
            let ring = TORUS_MAJOR_RADIUS + TORUS_MINOR_RADIUS * phi.cos();
            cloud.add_point(ring * theta.cos(), TORUS_MINOR_RADIUS * phi.sin(), ring * theta.sin());
        }
    }

    cloud
}

pub fn sphere(resolution: u32) -> PointCloud {
    let n = resolution as usize;
    let mut cloud = PointCloud::with_capacity(n * n);
    let res = resolution as f64;

    for i in 0..resolution {
        let theta = i as f64 / res * PI;
        for j in 0..resolution {
            let phi = j as f64 / res * TAU;
            cloud.add_point(
                SPHERE_RADIUS * theta.sin() * phi.cos(),
                SPHERE_RADIUS * theta.sin() * phi.sin(),
                SPHERE_RADIUS * theta.cos(),
            );
        }
    }

    cloud
}

pub fn cube(resolution: u32) -> PointCloud {
    let step = grid_step(resolution);
    let size = f64::from(CUBE_HALF_SIZE);
    let axis = grid(CUBE_HALF_SIZE, step);
    let per_axis = axis.clone().count();
    let mut cloud = PointCloud::with_capacity(6 * per_axis * per_axis);

    // Front and back (z = ±size)
    for x in axis.clone() {
        for y in axis.clone() {
            cloud.add_point(x, y, size);
            cloud.add_point(x, y, -size);
        }
    }

    // Top and bottom (y = ±size)
    for x in axis.clone() {
        for z in axis.clone() {
            cloud.add_point(x, size, z);
            cloud.add_point(x, -size, z);
        }
    }

    // Left and right (x = ±size)
    for y in axis.clone() {
        for z in axis.clone() {
            cloud.add_point(-size, y, z);
            cloud.add_point(size, y, z);
        }
    }

    cloud
}

pub fn pyramid(resolution: u32) -> PointCloud {
    let step = grid_step(resolution);
    let base_y = -PYRAMID_HEIGHT / 2.0;
    let apex_y = PYRAMID_HEIGHT / 2.0;
    let radius = f64::from(PYRAMID_HALF_BASE);
    let axis = grid(PYRAMID_HALF_BASE, step);
    let per_axis = axis.clone().count();
    let spokes = resolution as usize * 2;
    let mut cloud = PointCloud::with_capacity(per_axis * per_axis + spokes * PYRAMID_EDGE_SAMPLES as usize);

    for x in axis.clone() {
        for z in axis.clone() {
            cloud.add_point(x, base_y, z);
        }
    }

    // Spokes from the base perimeter to the apex. The angle runs over
    // i / resolution, so the circle is swept twice.
    let res = resolution as f64;
    let last = f64::from(PYRAMID_EDGE_SAMPLES - 1);
    for i in 0..spokes {
        let angle = i as f64 / res * TAU;
        let (bx, bz) = (radius * angle.cos(), radius * angle.sin());
        for j in 0..PYRAMID_EDGE_SAMPLES {
            let t = f64::from(j) / last;
            cloud.add_point(bx * (1.0 - t), base_y * (1.0 - t) + apex_y * t, bz * (1.0 - t));
        }
    }

    cloud
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_families_finite_and_non_empty() {
        for family in ShapeFamily::ALL {
            for resolution in [5, 30, 60] {
                let cloud = generate(family, resolution);
                assert!(!cloud.is_empty(), "{family} @ {resolution}");
                assert!(
                    cloud.points.iter().all(|p| p.iter().all(|c| c.is_finite())),
                    "{family} @ {resolution}"
                );
            }
        }
    }

    #[test]
    fn test_torus_and_sphere_counts() {
        for resolution in [1, 5, 30, 60] {
            let n = (resolution * resolution) as usize;
            assert_eq!(torus(resolution).len(), n);
            assert_eq!(sphere(resolution).len(), n);
        }
    }

    #[test]
    fn test_torus_points_on_surface() {
        for p in &torus(12).points {
            let ring = (p.x * p.x + p.z * p.z).sqrt() - TORUS_MAJOR_RADIUS;
            let tube = (ring * ring + p.y * p.y).sqrt();
            assert!((tube - TORUS_MINOR_RADIUS).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sphere_points_on_surface() {
        let cloud = sphere(10);
        for p in &cloud.points {
            assert!((p.coords.norm() - SPHERE_RADIUS).abs() < 1e-9);
        }
        // First latitude row is the north pole
        assert!((cloud.points[0].z - SPHERE_RADIUS).abs() < 1e-12);
    }

    #[test]
    fn test_cube_resolution_30() {
        assert_eq!(grid_step(30), 6);
        let cloud = cube(30);
        // -70, -64, ..., 68: 24 grid lines per axis
        assert_eq!(cloud.len(), 6 * 24 * 24);
        assert_eq!(cloud.points[0], Point3::new(-70.0, -70.0, 70.0));
        assert_eq!(cloud.points[1], Point3::new(-70.0, -70.0, -70.0));
        for p in &cloud.points {
            let on_face = p.x.abs() == 70.0 || p.y.abs() == 70.0 || p.z.abs() == 70.0;
            assert!(on_face);
            assert!(p.iter().all(|c| c.abs() <= 70.0));
        }
    }

    #[test]
    fn test_cube_step_quantization() {
        // Resolutions 1..=9 all collapse to step 1
        assert_eq!(grid_step(1), 1);
        assert_eq!(grid_step(9), 1);
        assert_eq!(cube(4).len(), 6 * 141 * 141);
        assert_eq!(cube(9).len(), cube(5).len());
        // 10..=14 share step 2
        assert_eq!(cube(10).len(), cube(14).len());
        assert_eq!(cube(10).len(), 6 * 71 * 71);
    }

    #[test]
    fn test_pyramid_layout() {
        let resolution = 30;
        let cloud = pyramid(resolution);
        // Base: -80..=80 step 6 -> 27 lines; spokes: 60 * 5
        let base = 27 * 27;
        assert_eq!(cloud.len(), base + 60 * 5);

        assert!(cloud.points[..base].iter().all(|p| p.y == -50.0));

        let first_spoke = &cloud.points[base..base + 5];
        assert_eq!(first_spoke[0], Point3::new(80.0, -50.0, 0.0));
        assert_eq!(first_spoke[4], Point3::new(0.0, 50.0, 0.0));
        assert!((first_spoke[2].x - 40.0).abs() < 1e-12);
        assert!(first_spoke[2].y.abs() < 1e-12);
    }

    #[test]
    fn test_family_names() {
        assert_eq!("cube".parse::<ShapeFamily>().unwrap(), ShapeFamily::Cube);
        assert_eq!("Donut".parse::<ShapeFamily>().unwrap(), ShapeFamily::Torus);
        assert!("dodecahedron".parse::<ShapeFamily>().is_err());
        assert_eq!(ShapeFamily::from_name_or_default("dodecahedron"), ShapeFamily::Torus);
        assert_eq!(ShapeFamily::from_name_or_default("pyramid"), ShapeFamily::Pyramid);
        for family in ShapeFamily::ALL {
            assert_eq!(family.name().parse::<ShapeFamily>().unwrap(), family);
        }
    }
}
