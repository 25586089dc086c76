/// Top-level owner of the active shape, the animation driver and the
/// current control values
use tracing::{debug, warn};

use crate::color::Color;
use crate::command::{Command, ShapeProperty};
use crate::config::ControlValues;
use crate::driver::{AnimationDriver, FrameHandle, FrameScheduler};
use crate::error::Result;
use crate::geometry::ShapeFamily;
use crate::projection::Camera;
use crate::shape::{FrameStats, ShapeState};
use crate::surface::Surface;
use crate::transform::Axis;

/// Everything a control surface or host frame callback needs to reach
pub struct Controller {
    values: ControlValues,
    shape: ShapeState,
    driver: AnimationDriver,
    camera: Camera,
}

impl Controller {
    pub fn new(values: ControlValues) -> Result<Self> {
        values.validate()?;
        Ok(Self::with_values(values))
    }

    fn with_values(values: ControlValues) -> Self {
        Self {
            shape: ShapeState::new(values.shape, values.scale, values.color, values.resolution),
            driver: AnimationDriver::new(values.speed),
            camera: Camera::default(),
            values,
        }
    }

    /// Current control values, with speed as held by the driver
    pub fn config(&self) -> ControlValues {
        ControlValues {
            speed: self.driver.speed(),
            ..self.values
        }
    }

    pub fn shape(&self) -> &ShapeState {
        &self.shape
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// Replace the active shape; rotation restarts from zero
    pub fn select_shape(&mut self, family: ShapeFamily) {
        self.values.shape = family;
        self.shape = ShapeState::new(family, self.values.scale, self.values.color, self.values.resolution);
        debug!(%family, "selected shape");
    }

    pub fn set_property(&mut self, property: ShapeProperty) -> Result<()> {
        match property {
            ShapeProperty::Scale(scale) => {
                self.shape.set_scale(scale)?;
                self.values.scale = scale;
            }
            ShapeProperty::Resolution(resolution) => {
                self.shape.set_resolution(resolution)?;
                self.values.resolution = resolution;
            }
            ShapeProperty::Color(color) => self.set_color(color),
        }
        debug!(property = property.name(), "updated property");
        Ok(())
    }

    fn set_color(&mut self, color: Color) {
        self.shape.set_color(color);
        self.values.color = color;
    }

    pub fn set_rotation_speed(&mut self, axis: Axis, value: f64) -> Result<()> {
        let mut speed = self.driver.speed();
        speed.set(axis, value);
        speed.validate()?;
        self.driver.set_speed(axis, value);
        Ok(())
    }

    /// Torus, scale 1.0, speed (0.01, 0.02, 0.005), resolution 30, `#ff6b6b`
    pub fn reset_to_defaults(&mut self) {
        let defaults = ControlValues::default();
        self.values = defaults;
        self.driver.set_speeds(defaults.speed);
        self.select_shape(defaults.shape);
    }

    pub fn apply(&mut self, command: Command) -> Result<()> {
        let result = match command {
            Command::SelectShape(family) => {
                self.select_shape(family);
                Ok(())
            }
            Command::SetProperty(property) => self.set_property(property),
            Command::SetRotationSpeed(axis, value) => self.set_rotation_speed(axis, value),
            Command::ResetToDefaults => {
                self.reset_to_defaults();
                Ok(())
            }
        };
        if let Err(err) = &result {
            warn!(?command, %err, "rejected control command");
        }
        result
    }

    pub fn start<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> Result<()> {
        self.driver.start(scheduler)
    }

    /// Deliver a frame callback from the host
    pub fn tick<S, F>(
        &mut self,
        handle: FrameHandle,
        surface: &mut S,
        scheduler: &mut F,
    ) -> Result<Option<FrameStats>>
    where
        S: Surface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        self.driver
            .tick(handle, &mut self.shape, &self.camera, surface, scheduler)
    }

    /// Host visibility changed
    pub fn set_visible<F: FrameScheduler + ?Sized>(&mut self, visible: bool, scheduler: &mut F) -> Result<()> {
        if visible {
            self.driver.resume(scheduler)
        } else {
            self.driver.pause(scheduler);
            Ok(())
        }
    }

    pub fn teardown<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        self.driver.teardown(scheduler);
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::with_values(ControlValues::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::FrameQueue;
    use crate::error::Error;
    use crate::surface::RecordingSurface;
    use crate::transform::{RotationSpeed, RotationState};

    fn running() -> (Controller, FrameQueue, RecordingSurface) {
        let mut controller = Controller::default();
        let mut queue = FrameQueue::new();
        controller.start(&mut queue).unwrap();
        (controller, queue, RecordingSurface::new(800, 600))
    }

    fn run(controller: &mut Controller, queue: &mut FrameQueue, surface: &mut RecordingSurface, n: usize) {
        for _ in 0..n {
            let handle = queue.pop_due().unwrap();
            controller.tick(handle, surface, queue).unwrap();
        }
    }

    #[test]
    fn test_select_shape_resets_rotation() {
        let (mut controller, mut queue, mut surface) = running();
        run(&mut controller, &mut queue, &mut surface, 5);
        assert_ne!(controller.shape().rotation, RotationState::zero());

        controller.select_shape(ShapeFamily::Pyramid);
        assert_eq!(controller.shape().rotation, RotationState::zero());
        assert_eq!(controller.shape().family(), ShapeFamily::Pyramid);
        assert_eq!(controller.config().shape, ShapeFamily::Pyramid);
    }

    #[test]
    fn test_shape_switch_carries_controls() {
        let mut controller = Controller::default();
        controller.set_property(ShapeProperty::Scale(2.0)).unwrap();
        controller.set_property(ShapeProperty::Resolution(12)).unwrap();
        controller.set_property(ShapeProperty::Color(Color::rgb(9, 9, 9))).unwrap();
        controller.set_rotation_speed(Axis::Z, 0.5).unwrap();

        controller.select_shape(ShapeFamily::Sphere);
        let shape = controller.shape();
        assert_eq!(shape.scale(), 2.0);
        assert_eq!(shape.resolution(), 12);
        assert_eq!(shape.color(), Color::rgb(9, 9, 9));
        assert_eq!(controller.driver().speed().z, 0.5);
    }

    #[test]
    fn test_reset_restores_every_control() {
        let (mut controller, mut queue, mut surface) = running();
        controller.select_shape(ShapeFamily::Cube);
        controller.set_property(ShapeProperty::Scale(0.4)).unwrap();
        controller.set_property(ShapeProperty::Resolution(55)).unwrap();
        controller.set_property(ShapeProperty::Color(Color::rgb(0, 0, 255))).unwrap();
        for axis in Axis::ALL {
            controller.set_rotation_speed(axis, 1.0).unwrap();
        }
        run(&mut controller, &mut queue, &mut surface, 2);

        controller.reset_to_defaults();
        let config = controller.config();
        assert_eq!(config.shape, ShapeFamily::Torus);
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.speed, RotationSpeed::new(0.01, 0.02, 0.005));
        assert_eq!(config.resolution, 30);
        assert_eq!(config.color, Color::DEFAULT);
        assert_eq!(controller.shape().family(), ShapeFamily::Torus);
        assert_eq!(controller.shape().rotation, RotationState::zero());
        assert!(controller.driver().is_running());
    }

    #[test]
    fn test_resolution_visible_to_next_render() {
        let (mut controller, mut queue, mut surface) = running();
        run(&mut controller, &mut queue, &mut surface, 1);
        assert_eq!(surface.discs().len(), 900);

        controller.set_property(ShapeProperty::Resolution(8)).unwrap();
        assert_eq!(controller.shape().points().len(), 64);
        run(&mut controller, &mut queue, &mut surface, 1);
        assert_eq!(surface.discs().len(), 64);
    }

    #[test]
    fn test_invalid_values_leave_state_untouched() {
        let mut controller = Controller::default();
        let before = controller.config();

        assert_eq!(
            controller.set_property(ShapeProperty::Scale(-1.0)),
            Err(Error::InvalidScale(-1.0))
        );
        assert_eq!(
            controller.set_property(ShapeProperty::Resolution(0)),
            Err(Error::InvalidResolution(0))
        );
        assert_eq!(
            controller.set_property(ShapeProperty::Resolution(u32::MAX)),
            Err(Error::InvalidResolution(u32::MAX))
        );
        assert!(controller.apply(crate::command::parse_command("resolution 4294967295").unwrap()).is_err());
        assert!(controller.set_rotation_speed(Axis::X, f64::INFINITY).is_err());
        assert_eq!(controller.config(), before);
    }

    #[test]
    fn test_apply_commands() {
        let mut controller = Controller::default();
        controller.apply(crate::command::parse_command("shape cube").unwrap()).unwrap();
        controller.apply(crate::command::parse_command("speed x 0.25").unwrap()).unwrap();
        assert_eq!(controller.config().shape, ShapeFamily::Cube);
        assert_eq!(controller.config().speed.x, 0.25);
        assert!(controller.apply(Command::SetProperty(ShapeProperty::Scale(0.0))).is_err());
    }

    #[test]
    fn test_visibility_pauses_and_resumes() {
        let (mut controller, mut queue, mut surface) = running();
        run(&mut controller, &mut queue, &mut surface, 3);
        let rotation = controller.shape().rotation;

        controller.set_visible(false, &mut queue).unwrap();
        assert!(queue.is_empty());
        assert!(!controller.driver().is_running());
        assert_eq!(controller.shape().rotation, rotation);

        controller.set_visible(true, &mut queue).unwrap();
        controller.set_visible(true, &mut queue).unwrap();
        assert_eq!(queue.len(), 1);
        run(&mut controller, &mut queue, &mut surface, 1);
        assert!((controller.shape().rotation.y - (rotation.y + 0.02)).abs() < 1e-12);
    }

    #[test]
    fn test_new_rejects_invalid_values() {
        let values = ControlValues {
            resolution: 0,
            ..ControlValues::default()
        };
        assert!(Controller::new(values).is_err());
    }
}
