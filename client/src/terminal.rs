use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame, Terminal,
};
use sim::{PixelBuffer, Surface, World, WorldStats};
use std::io::{self, Stdout};

const FILLED: &str = "█";

/// Rows kept for the status line under the field
pub const STATUS_ROWS: u16 = 1;

/// Surface size in pixels for a terminal of `cols x rows` characters
pub fn field_size(cols: u16, rows: u16) -> (u32, u32) {
    (cols as u32, rows.saturating_sub(STATUS_ROWS) as u32)
}

/// Paints a pixel buffer, one character per pixel
pub struct FieldView<'a> {
    pixels: &'a PixelBuffer,
}

impl<'a> FieldView<'a> {
    pub fn new(pixels: &'a PixelBuffer) -> Self {
        Self { pixels }
    }
}

impl Widget for FieldView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (area.width as u32).min(self.pixels.width());
        let height = (area.height as u32).min(self.pixels.height());

        for y in 0..height {
            for x in 0..width {
                if let Some(color) = self.pixels.pixel(x, y) {
                    buf.get_mut(area.x + x as u16, area.y + y as u16)
                        .set_symbol(FILLED)
                        .set_fg(Color::Rgb(color.r, color.g, color.b));
                }
            }
        }
    }
}

fn status_line(stats: &WorldStats, fps: u32) -> Line<'static> {
    let rate = if fps == 0 {
        Span::styled("paused", Style::default().fg(Color::Yellow))
    } else {
        Span::raw(format!("{fps} fps"))
    };

    Line::from(vec![
        Span::styled(" snakefield ", Style::default().fg(Color::Black).bg(Color::Green)),
        Span::raw(" "),
        rate,
        Span::raw(format!(
            " | tick {} | snakes {} | food {} | deaths {} | meals {}",
            stats.ticks, stats.snakes, stats.food, stats.deaths, stats.meals
        )),
        Span::styled(
            "  q quit  space pause  +/- speed  s save  r reset",
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Draw one full frame: the field, then the status line
pub fn render(frame: &mut Frame<'_>, pixels: &PixelBuffer, stats: &WorldStats, fps: u32) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(STATUS_ROWS)])
        .split(frame.size());

    frame.render_widget(FieldView::new(pixels), chunks[0]);
    frame.render_widget(Paragraph::new(status_line(stats, fps)), chunks[1]);
}

/// Terminal plus the pixel buffer the world is painted into
pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
    pixels: PixelBuffer,
}

impl<B: Backend> Screen<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            pixels: PixelBuffer::new(0, 0),
        }
    }

    /// Paint `world` and push it to the terminal
    pub fn show(&mut self, world: &World) -> io::Result<()> {
        let grid = world.grid();
        self.pixels.resize(grid.width(), grid.height());
        world.draw(&mut self.pixels);

        let stats = world.stats();
        let fps = world.config().fps;
        let pixels = &self.pixels;
        self.terminal
            .draw(|frame| render(frame, pixels, &stats, fps))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

/// Raw mode and the alternate screen
pub fn enter() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("Failed to build terminal backend")?;
    terminal.hide_cursor().ok();
    Ok(terminal)
}

/// Undo `enter`. Safe to call even if `enter` failed halfway.
pub fn leave() {
    if let Err(e) = disable_raw_mode() {
        tracing::error!("Failed to disable raw mode: {}", e);
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show) {
        tracing::error!("Failed to leave alternate screen: {}", e);
    }
}
