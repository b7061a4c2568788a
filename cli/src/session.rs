use std::io::{self, BufRead, Write};

use minesweep_core::{CellView, EngineState, GameError, MoveOutcome, PlayEngine};

use crate::input::PlayerMove;
use crate::render::Renderer;

const PROMPT: &str = "Please choose a spot to check for a mine [origin at 1,1] (row,col)[,?]: ";

/// Turn loop: one line read, one move applied, one frame drawn, until the game ends or input runs out.
pub struct Session<R, W> {
    engine: PlayEngine,
    input: R,
    out: W,
    renderer: Renderer,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(engine: PlayEngine, input: R, out: W, renderer: Renderer) -> Self {
        Self {
            engine,
            input,
            out,
            renderer,
        }
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn run(&mut self) -> io::Result<EngineState> {
        let mut status: Option<String> = None;
        let mut line = Vec::new();

        while !self.engine.is_finished() {
            self.renderer
                .draw_frame(&mut self.out, &self.engine, status.as_deref())?;
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            line.clear();
            // bytes, so a line that isn't UTF-8 is rejected like any other malformed move
            match self.input.read_until(b'\n', &mut line) {
                Ok(0) => {
                    writeln!(self.out)?;
                    self.engine.abandon();
                }
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    status = Some(self.play_line(text.trim()));
                }
                Err(err) => {
                    log::warn!("could not read move: {}", err);
                    writeln!(self.out, "\nI/O Error: {}", err)?;
                    self.engine.abandon();
                }
            }
        }

        self.finish()?;
        Ok(self.engine.state())
    }

    /// Applies one line of input, returns the message to show with the next frame.
    fn play_line(&mut self, line: &str) -> String {
        let mv: PlayerMove = match line.parse() {
            Ok(mv) => mv,
            Err(err) => {
                log::debug!("malformed input {:?}: {}", line, err);
                return err.to_string();
            }
        };

        let outcome = mv
            .coords()
            .and_then(|coords| self.engine.apply_move(coords, mv.intent));
        let (row, col) = (mv.row, mv.col);
        match outcome {
            Ok(MoveOutcome::Flagged) => format!("Flagged space {},{}", row, col),
            Ok(MoveOutcome::Unflagged) => format!("Resetting space {},{} back to hidden", row, col),
            Ok(MoveOutcome::Revealed(count)) => format!("Space {},{}: {}", row, col, count),
            Ok(MoveOutcome::Won | MoveOutcome::Lost) => String::new(),
            Err(GameError::OutOfBounds) => "** Out of Range".to_owned(),
            Err(GameError::AlreadyRevealed) => {
                let flagged = mv
                    .coords()
                    .and_then(|coords| self.engine.cell_view(coords))
                    .is_ok_and(|view| view == CellView::Flagged);
                if flagged {
                    format!("Space {},{} is flagged, clear it first with {},{},?", row, col, row, col)
                } else {
                    format!("You have already revealed space {},{}", row, col)
                }
            }
            Err(err) => err.to_string(),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        let banner = match self.engine.state() {
            EngineState::Won => "YOU WIN !!!",
            EngineState::Lost => "BOOM!!! YOU LOST !!!",
            EngineState::Abandoned | EngineState::InProgress => {
                writeln!(self.out, "Game abandoned")?;
                return self.out.flush();
            }
        };
        let banner = if self.renderer.color {
            use crossterm::style::Stylize;
            match self.engine.state() {
                EngineState::Won => banner.black().on_green().to_string(),
                _ => banner.white().on_red().to_string(),
            }
        } else {
            banner.to_owned()
        };

        writeln!(self.out, "{}", banner)?;
        self.renderer.draw_board(&mut self.out, &self.engine, true)?;
        self.out.flush()
    }
}
