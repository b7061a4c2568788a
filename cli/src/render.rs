use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use minesweep_core::{CellView, Coord, PlayEngine};

const LINE: &str = "───";

/// Draws the board as a box grid, 1-based labels on every side.
#[derive(Copy, Clone, Debug)]
pub struct Renderer {
    pub color: bool,
    pub clear_screen: bool,
}

impl Renderer {
    pub fn plain() -> Self {
        Self {
            color: false,
            clear_screen: false,
        }
    }

    /// One turn's screen: board as the player sees it, mines left and the last status message.
    pub fn draw_frame<W: Write>(
        &self,
        out: &mut W,
        engine: &PlayEngine,
        status: Option<&str>,
    ) -> io::Result<()> {
        if self.clear_screen {
            queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        writeln!(out, "{}", self.paint("Current Board", |s| s.bold().to_string()))?;
        self.draw_board(out, engine, false)?;
        writeln!(out, "Mines left: {}", engine.mines_left())?;
        if let Some(status) = status {
            writeln!(out, "{}", status)?;
        }
        out.flush()
    }

    pub fn draw_board<W: Write>(
        &self,
        out: &mut W,
        engine: &PlayEngine,
        disclose: bool,
    ) -> io::Result<()> {
        let (width, height) = engine.size();

        write_column_labels(out, width)?;
        write_rule(out, width, ('┌', '┬', '┐'))?;
        for y in 0..height {
            write!(out, "{:>4}│", usize::from(y) + 1)?;
            for x in 0..width {
                let view = if disclose {
                    engine.truth_view((x, y))
                } else {
                    engine.cell_view((x, y))
                };
                let view = view.map_err(io::Error::other)?;
                write!(out, "{}│", self.glyph(view))?;
            }
            writeln!(out)?;
            if y + 1 < height {
                write_rule(out, width, ('├', '┼', '┤'))?;
            }
        }
        write_rule(out, width, ('└', '┴', '┘'))?;
        write_column_labels(out, width)
    }

    fn glyph(&self, view: CellView) -> String {
        match view {
            CellView::Hidden => self.paint(" - ", |s| s.black().on_white().to_string()),
            CellView::Flagged => self.paint(" ? ", |s| s.black().on_yellow().to_string()),
            CellView::Mine => self.paint(" X ", |s| s.red().bold().on_dark_red().to_string()),
            CellView::Count(0) => self.paint(" 0 ", |s| s.black().on_cyan().to_string()),
            CellView::Count(count) => {
                let text = format!(" {} ", count);
                self.paint(&text, |s| s.black().on_green().to_string())
            }
        }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_owned()
        }
    }
}

fn write_column_labels<W: Write>(out: &mut W, width: Coord) -> io::Result<()> {
    write!(out, "     ")?;
    for x in 0..width {
        write!(out, "{:^3} ", usize::from(x) + 1)?;
    }
    writeln!(out)
}

fn write_rule<W: Write>(out: &mut W, width: Coord, (left, mid, right): (char, char, char)) -> io::Result<()> {
    let cells = vec![LINE; usize::from(width)];
    writeln!(out, "    {}{}{}", left, cells.join(&mid.to_string()), right)
}
