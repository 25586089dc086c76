/// spin3d terminal demo - rotating point-cloud shapes
///
/// Controls:
///   - 1-4: torus, sphere, cube, pyramid
///   - +/-: scale, [/]: resolution
///   - x/X, y/Y, z/Z: rotation speed per axis
///   - c: cycle color, r: reset, p: pause/resume
///   - ':': type a command (e.g. `speed y 0.05`)
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use spin3d_core::{parse_command, Color, ControlValues, ShapeFamily};
use spin3d_terminal::{RunOptions, TerminalApp};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "spin3d-terminal", version, about = "Rotating 3D point clouds in the terminal")]
struct Args {
    /// JSON file with initial control values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shape family (torus, sphere, cube, pyramid); unknown names fall back to torus
    #[arg(long)]
    shape: Option<String>,

    /// Uniform scale
    #[arg(long)]
    scale: Option<f64>,

    /// Point density
    #[arg(long)]
    resolution: Option<u32>,

    /// Fill color as #rrggbb
    #[arg(long)]
    color: Option<Color>,

    /// Rotation speed about X in radians per frame
    #[arg(long, allow_hyphen_values = true)]
    speed_x: Option<f64>,

    /// Rotation speed about Y in radians per frame
    #[arg(long, allow_hyphen_values = true)]
    speed_y: Option<f64>,

    /// Rotation speed about Z in radians per frame
    #[arg(long, allow_hyphen_values = true)]
    speed_z: Option<f64>,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Exit after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Control command to run after startup; may be repeated
    #[arg(long = "exec", value_name = "COMMAND")]
    exec: Vec<String>,
}

impl Args {
    fn control_values(&self) -> anyhow::Result<ControlValues> {
        let mut values = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                ControlValues::from_json_str(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => ControlValues::default(),
        };

        if let Some(shape) = &self.shape {
            values.shape = ShapeFamily::from_name_or_default(shape);
        }
        if let Some(scale) = self.scale {
            values.scale = scale;
        }
        if let Some(resolution) = self.resolution {
            values.resolution = resolution;
        }
        if let Some(color) = self.color {
            values.color = color;
        }
        if let Some(x) = self.speed_x {
            values.speed.x = x;
        }
        if let Some(y) = self.speed_y {
            values.speed.y = y;
        }
        if let Some(z) = self.speed_z {
            values.speed.z = z;
        }

        values.validate().context("invalid control values")?;
        Ok(values)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let values = args.control_values()?;
    let options = RunOptions {
        fps: args.fps,
        max_frames: args.frames,
    };

    let mut app = TerminalApp::new(values, options).context("failed to initialise terminal")?;
    for line in &args.exec {
        let command = parse_command(line).with_context(|| format!("bad --exec command {line:?}"))?;
        app.apply(command)?;
    }

    app.run()
}
