/// Terminal host for the spin3d core: keyboard control surface, frame
/// pacing and ASCII output
use crossterm::{
    cursor,
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use spin3d_core::{
    parse_command, Axis, Color as FillColor, Command, ControlValues, Controller, FrameQueue, ShapeFamily,
    ShapeProperty, MAX_RESOLUTION,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Colors cycled by the `c` key, starting from the default
const PALETTE: [FillColor; 6] = [
    FillColor::DEFAULT,
    FillColor::rgb(0x4e, 0xcd, 0xc4),
    FillColor::rgb(0xff, 0xe6, 0x6d),
    FillColor::rgb(0x95, 0xe1, 0xd3),
    FillColor::rgb(0xa2, 0x9b, 0xfe),
    FillColor::rgb(0xff, 0xff, 0xff),
];

const SCALE_STEP: f64 = 0.1;
const MIN_SCALE: f64 = 0.1;
const SPEED_STEP: f64 = 0.005;

/// Frame pacing and run length for [`TerminalApp`]
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub fps: u32,
    /// Stop after this many ticks
    pub max_frames: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            max_frames: None,
        }
    }
}

/// What the input line is currently doing
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    Keys,
    Command(String),
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    controller: Controller,
    renderer: AsciiRenderer,
    frames: FrameQueue,
    options: RunOptions,
    mode: InputMode,
    status: Option<String>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Fails when the terminal size cannot be read; nothing is started then
    pub fn new(values: ControlValues, options: RunOptions) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size()
            .map_err(|e| spin3d_core::Error::SurfaceUnavailable(format!("terminal size: {e}")))?;
        let controller = Controller::new(values)?;

        Ok(Self {
            controller,
            renderer: AsciiRenderer::new(cols as usize, rows as usize),
            frames: FrameQueue::new(),
            options,
            mode: InputMode::Keys,
            status: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Apply a control command before or during the run
    pub fn apply(&mut self, command: Command) -> spin3d_core::Result<()> {
        self.controller.apply(command)
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableFocusChange)?;

        let result = self.main_loop();

        // Cleanup
        self.controller.teardown(&mut self.frames);
        execute!(stdout(), DisableFocusChange, terminal::LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.options.fps.max(1)));
        self.controller.start(&mut self.frames)?;
        info!(config = ?self.controller.config(), "animation started");

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            // Tick
            if let Some(handle) = self.frames.pop_due() {
                if self.controller.tick(handle, &mut self.renderer, &mut self.frames)?.is_some() {
                    self.frame_count += 1;
                    self.present()?;
                }
            }

            if let Some(max) = self.options.max_frames {
                if self.controller.driver().ticks() >= max {
                    self.running = false;
                }
            }

            // Frame timing
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!(ticks = self.controller.driver().ticks(), "animation stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Resize(cols, rows) => {
                self.renderer.resize(cols as usize, rows as usize);
                Ok(())
            }
            Event::FocusLost => {
                self.controller.set_visible(false, &mut self.frames)?;
                Ok(())
            }
            Event::FocusGained => {
                self.controller.set_visible(true, &mut self.frames)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        if let InputMode::Command(line) = &mut self.mode {
            match key.code {
                KeyCode::Enter => {
                    let line = std::mem::take(line);
                    self.mode = InputMode::Keys;
                    self.run_command_line(&line);
                }
                KeyCode::Esc => self.mode = InputMode::Keys,
                KeyCode::Backspace => {
                    line.pop();
                }
                KeyCode::Char(c) => line.push(c),
                _ => {}
            }
            return self.present_if_paused();
        }

        let config = self.controller.config();
        let result = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                Ok(())
            }
            KeyCode::Char(':') => {
                self.mode = InputMode::Command(String::new());
                Ok(())
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.apply(Command::SelectShape(ShapeFamily::ALL[index]))
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.apply(Command::SetProperty(ShapeProperty::Scale(config.scale + SCALE_STEP)))
            }
            KeyCode::Char('-') => self.apply(Command::SetProperty(ShapeProperty::Scale(
                (config.scale - SCALE_STEP).max(MIN_SCALE),
            ))),
            KeyCode::Char(']') => {
                self.apply(Command::SetProperty(ShapeProperty::Resolution(
                    (config.resolution + 1).min(MAX_RESOLUTION),
                )))
            }
            KeyCode::Char('[') => self.apply(Command::SetProperty(ShapeProperty::Resolution(
                config.resolution.saturating_sub(1).max(1),
            ))),
            KeyCode::Char(c @ ('x' | 'X' | 'y' | 'Y' | 'z' | 'Z')) => {
                let axis = match c.to_ascii_lowercase() {
                    'x' => Axis::X,
                    'y' => Axis::Y,
                    _ => Axis::Z,
                };
                let delta = if c.is_ascii_uppercase() { SPEED_STEP } else { -SPEED_STEP };
                self.apply(Command::SetRotationSpeed(axis, config.speed.get(axis) + delta))
            }
            KeyCode::Char('c') => {
                let next = PALETTE
                    .iter()
                    .position(|&c| c == config.color)
                    .map_or(0, |i| (i + 1) % PALETTE.len());
                self.apply(Command::SetProperty(ShapeProperty::Color(PALETTE[next])))
            }
            KeyCode::Char('r') => self.apply(Command::ResetToDefaults),
            KeyCode::Char('p') => {
                let visible = !self.controller.driver().is_running();
                self.controller.set_visible(visible, &mut self.frames)
            }
            _ => Ok(()),
        };

        self.status = result.err().map(|e| e.to_string());
        self.present_if_paused()
    }

    fn run_command_line(&mut self, line: &str) {
        let result = parse_command(line).and_then(|command| self.apply(command));
        self.status = match result {
            Ok(()) => None,
            Err(e) => {
                warn!(line, error = %e, "command failed");
                Some(e.to_string())
            }
        };
    }

    /// Keep the overlay responsive while no frames are being rendered
    fn present_if_paused(&mut self) -> anyhow::Result<()> {
        if !self.controller.driver().is_running() {
            self.present()?;
        }
        Ok(())
    }

    fn present(&mut self) -> anyhow::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;
        self.draw_overlay(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn draw_overlay<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let config = self.controller.config();
        let state = if self.controller.driver().is_running() { "" } else { " [paused]" };
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "spin3d | {} x{:.1} res {} | speed {:.3}/{:.3}/{:.3} | {} | FPS {:.1}{}",
                config.shape,
                config.scale,
                config.resolution,
                config.speed.x,
                config.speed.y,
                config.speed.z,
                config.color,
                self.fps,
                state,
            )),
            cursor::MoveTo(0, 1),
            SetForegroundColor(Color::DarkGrey),
            Print("1-4 shape  +/- scale  [/] res  x/X y/Y z/Z speed  c color  r reset  p pause  : command  q quit"),
            ResetColor
        )?;

        let bottom = self.renderer.rows().saturating_sub(1) as u16;
        match (&self.mode, &self.status) {
            (InputMode::Command(line), _) => queue!(
                out,
                cursor::MoveTo(0, bottom),
                terminal::Clear(ClearType::CurrentLine),
                Print(format!(":{line}"))
            )?,
            (InputMode::Keys, Some(status)) => queue!(
                out,
                cursor::MoveTo(0, bottom),
                terminal::Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::Red),
                Print(status),
                ResetColor
            )?,
            (InputMode::Keys, None) => {}
        }
        Ok(())
    }
}
