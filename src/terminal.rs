use crate::color::Rgb;
use crate::render::Canvas;
use crossterm::{
    cursor, execute, queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use crossterm::event::{self, Event};
use log::{debug, warn};
use std::io::{self, Write};
use std::time::Duration;

/// Input and output of the frame loop
pub trait Frontend {
    /// Waits up to `timeout` for an input event
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
    fn present(&mut self, canvas: &Canvas) -> io::Result<()>;
}

/// Full-screen render surface. Dropping it restores the terminal.
pub struct Terminal {
    out: io::Stdout,
}

impl Terminal {
    /// Enters raw mode and the alternate screen. The guard exists as soon as
    /// raw mode is on, so a failure after that point still restores the
    /// terminal on drop.
    pub fn open() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut terminal = Terminal { out: io::stdout() };
        execute!(
            terminal.out,
            EnterAlternateScreen,
            DisableLineWrap,
            cursor::Hide
        )?;
        debug!("Terminal surface acquired");
        Ok(terminal)
    }

    /// Current size as (cols, rows)
    pub fn size() -> (u16, u16) {
        termsize::get()
            .map(|size| (size.cols, size.rows))
            .unwrap_or((80, 24))
    }

    fn draw(&mut self, canvas: &Canvas) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate, cursor::MoveTo(0, 0))?;
        let background = canvas.background();
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;
        for row in 0..canvas.rows() {
            queue!(self.out, cursor::MoveTo(0, row))?;
            for col in 0..canvas.cols() {
                let Some(cell) = canvas.cell(col, row) else {
                    continue;
                };
                let cell_bg = cell.bg.unwrap_or(background);
                if bg != Some(cell_bg) {
                    queue!(self.out, SetBackgroundColor(cell_bg.into()))?;
                    bg = Some(cell_bg);
                }
                if cell.glyph != ' ' && fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(cell.fg.into()))?;
                    fg = Some(cell.fg);
                }
                queue!(self.out, Print(cell.glyph))?;
            }
        }
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

impl Frontend for Terminal {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }

    /// Writes the whole canvas in one synchronized update
    fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        self.draw(canvas)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let restored = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )
        .and_then(|_| terminal::disable_raw_mode());
        match restored {
            Ok(()) => debug!("Terminal surface released"),
            Err(e) => warn!("Failed to restore terminal: {}", e),
        }
    }
}
