use crate::framebuffer::Framebuffer;
use crate::interpreter::RunState;
use crossterm::{cursor, execute, terminal};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the host loop to put the framebuffer on a screen. It
/// should abstract the implementation details, so a variety of kinds of screen
/// would work.
pub trait Display {
    /// draw the whole frame
    fn draw(&mut self, frame: &Framebuffer, run_state: RunState) -> Result<(), io::Error>;
}

// store useful metadata about the screen
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coords of every pixel in one bitplane; y grows downward on the
    /// chip-8 and upward on the canvas
    fn bitplane_coords(&self, frame: &Framebuffer, lit: bool) -> Vec<(f64, f64)> {
        frame
            .points(lit)
            .map(|(x, y)| (x as f64, -1.0 * y as f64))
            .collect()
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
    fg: Color,
    bg: Color,
}

impl MonoTermDisplay {
    pub fn new(fg: Color, bg: Color) -> Result<MonoTermDisplay, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(crate::framebuffer::WIDTH, crate::framebuffer::HEIGHT),
            fg,
            bg,
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        // best effort; the terminal may already be gone
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    }
}

fn title(run_state: RunState) -> &'static str {
    match run_state {
        RunState::Running => "CHIP-8",
        RunState::Paused => "CHIP-8 [paused]",
        RunState::Halted => "CHIP-8 [halted]",
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Framebuffer, run_state: RunState) -> Result<(), io::Error> {
        let lit = self.resolution.bitplane_coords(frame, true);
        let unlit = self.resolution.bitplane_coords(frame, false);
        let (fg, bg) = (self.fg, self.bg);
        let x_bounds = self.resolution.x_bounds();
        let y_bounds = self.resolution.y_bounds();
        let width = self.resolution.0 as u16;
        let height = self.resolution.1 as u16;

        // one terminal cell per pixel, plus the border
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + width, 2 + height).intersection(f.size());

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title(title(run_state))
                        .borders(Borders::ALL)
                        .style(Style::default().bg(bg)),
                )
                .x_bounds(x_bounds)
                .y_bounds(y_bounds)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: bg,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: fg,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing the host loop; remembers what it was asked to draw
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub lit_pixels: usize,
    pub last_state: Option<RunState>,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &Framebuffer, run_state: RunState) -> Result<(), io::Error> {
        self.frames += 1;
        self.lit_pixels = frame.points(true).count();
        self.last_state = Some(run_state);
        Ok(())
    }
}
