/// Example: render a few frames of each shape without taking over the terminal
///
/// Usage: cargo run --example frame_dump -- [cols] [rows]

use spin3d_core::{Controller, FrameQueue, ShapeFamily};
use spin3d_terminal::AsciiRenderer;
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let cols = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(80);
    let rows = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(30);

    let mut renderer = AsciiRenderer::new(cols, rows);
    let mut frames = FrameQueue::new();
    let mut controller = Controller::default();
    controller.start(&mut frames)?;

    for family in ShapeFamily::ALL {
        controller.select_shape(family);
        let mut last = None;
        for _ in 0..10 {
            if let Some(handle) = frames.pop_due() {
                last = controller.tick(handle, &mut renderer, &mut frames)?;
            }
        }

        println!("== {family} ({} points) {last:?}", controller.shape().points().len());
        for row in 0..renderer.rows() {
            let line: String = (0..renderer.cols()).map(|col| renderer.glyph_at(col, row)).collect();
            println!("{}", line.trim_end());
        }
    }

    controller.teardown(&mut frames);
    Ok(())
}
