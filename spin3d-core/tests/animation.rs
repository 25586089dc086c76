/// End-to-end checks of the controller driven by a frame queue
use spin3d_core::{
    parse_command, Color, ControlValues, Controller, FrameQueue, FrameScheduler, RecordingSurface,
    RotationState, ShapeFamily, Surface,
};

fn step(controller: &mut Controller, queue: &mut FrameQueue, surface: &mut RecordingSurface) -> usize {
    let handle = queue.pop_due().expect("a frame should be pending");
    controller
        .tick(handle, surface, queue)
        .expect("tick should succeed")
        .map(|stats| stats.drawn)
        .unwrap_or(0)
}

#[test]
fn session_from_config_through_commands() -> spin3d_core::Result<()> {
    let values = ControlValues::from_json_str(r##"{"shape": "sphere", "resolution": 10, "color": "#336699"}"##)?;
    let mut controller = Controller::new(values)?;
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new(640, 480);

    controller.start(&mut queue)?;
    assert_eq!(step(&mut controller, &mut queue, &mut surface), 100);
    assert!(surface.discs().iter().all(|d| d.color == Color::rgb(0x33, 0x66, 0x99)));

    for line in ["shape cube", "resolution 10", "scale 0.5", "speed z 0.1"] {
        controller.apply(parse_command(line)?)?;
    }
    assert_eq!(controller.shape().rotation, RotationState::zero());

    // step 2 over [-70, 70] gives 71 lines per axis
    assert_eq!(step(&mut controller, &mut queue, &mut surface), 6 * 71 * 71);
    assert!((controller.shape().rotation.z - 0.1).abs() < 1e-12);

    controller.apply(parse_command("reset")?)?;
    assert_eq!(controller.config(), ControlValues::default());
    assert_eq!(step(&mut controller, &mut queue, &mut surface), 900);
    Ok(())
}

#[test]
fn hidden_view_stops_ticks_until_visible() -> spin3d_core::Result<()> {
    let mut controller = Controller::default();
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new(320, 240);

    controller.start(&mut queue)?;
    step(&mut controller, &mut queue, &mut surface);
    controller.set_visible(false, &mut queue)?;
    assert!(queue.pop_due().is_none());

    // A frame requested by someone else must not advance this driver
    let foreign = queue.request_frame()?;
    assert_eq!(queue.pop_due(), Some(foreign));
    assert!(controller.tick(foreign, &mut surface, &mut queue)?.is_none());
    assert_eq!(controller.driver().ticks(), 1);

    controller.set_visible(true, &mut queue)?;
    step(&mut controller, &mut queue, &mut surface);
    assert_eq!(controller.driver().ticks(), 2);

    controller.teardown(&mut queue);
    controller.teardown(&mut queue);
    assert!(queue.is_empty());
    Ok(())
}

#[test]
fn resize_between_ticks_uses_new_size() -> spin3d_core::Result<()> {
    let mut controller = Controller::new(ControlValues {
        shape: ShapeFamily::Sphere,
        resolution: 1,
        ..ControlValues::default()
    })?;
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new(100, 100);
    controller.start(&mut queue)?;

    step(&mut controller, &mut queue, &mut surface);
    surface.resize(400, 300);
    assert_eq!(surface.size(), (400, 300));
    step(&mut controller, &mut queue, &mut surface);

    // The lone pole point stays near the centre of the new surface
    let disc = surface.discs()[0];
    assert!((disc.x - 200.0).abs() < 5.0);
    assert!((disc.y - 150.0).abs() < 5.0);
    Ok(())
}
