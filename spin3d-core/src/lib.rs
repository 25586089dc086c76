/// spin3d core library - point-cloud shapes, transforms and the frame loop
///
/// This library holds everything that does not touch a real display:
/// shape generation, rotation and projection, the per-frame render pipeline,
/// the animation state machine and the controller that owns them.

pub mod color;
pub mod command;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod shape;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use color::Color;
pub use command::{parse_command, Command, ShapeProperty};
pub use config::ControlValues;
pub use controller::Controller;
pub use driver::{AnimationDriver, DriverState, FrameHandle, FrameQueue, FrameScheduler};
pub use error::{Error, Result};
pub use geometry::{generate, PointCloud, ShapeFamily};
pub use projection::{project, Camera, ScreenPoint, CAMERA_DISTANCE};
pub use shape::{render_points, FrameStats, ShapeState, MAX_RESOLUTION};
pub use surface::{Disc, RecordingSurface, Surface};
pub use transform::{rotate_x, rotate_y, rotate_z, Axis, RotationSpeed, RotationState};
