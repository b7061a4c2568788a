use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use minesweep_core::{CellCount, Coord, Coord2, GameConfig, PlayEngine, RandomMineGenerator};

use render::Renderer;
use session::Session;

mod input;
mod render;
mod session;

#[derive(Parser, Debug)]
#[command(name = "minesweep", version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Number of mines
    #[arg(short, long, default_value_t = 9)]
    mines: CellCount,

    /// Board width
    #[arg(long, default_value_t = 9)]
    width: Coord,

    /// Board height
    #[arg(long, default_value_t = 9)]
    height: Coord,

    /// Board size as <width>,<height>, overrides --width and --height
    #[arg(short, long, value_parser = parse_size)]
    size: Option<Coord2>,

    /// Force a seed instead of random
    #[arg(long)]
    seed: Option<u64>,

    /// Do not color the board
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        let size = self.size.unwrap_or((self.width, self.height));
        match GameConfig::new(size, self.mines) {
            Ok(config) => config,
            Err(err) => Args::command()
                .error(
                    ErrorKind::ValueValidation,
                    format!("{} (got {}x{} with {} mines)", err, size.0, size.1, self.mines),
                )
                .exit(),
        }
    }
}

fn parse_size(value: &str) -> Result<Coord2, String> {
    let (width, height) = value
        .split_once(',')
        .ok_or_else(|| format!("expected <width>,<height>, got '{}'", value))?;
    let parse = |axis: &str| {
        axis.trim()
            .parse::<Coord>()
            .map_err(|err| format!("invalid dimension '{}': {}", axis, err))
    };
    Ok((parse(width)?, parse(height)?))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.game_config();
    let generator = match args.seed {
        Some(seed) => RandomMineGenerator::new(seed),
        None => RandomMineGenerator::from_entropy(),
    };
    log::debug!("seed: {}", generator.seed());
    let engine = PlayEngine::generate(generator, config).context("could not lay out the board")?;

    let stdout = io::stdout();
    let tty = stdout.is_terminal();
    let renderer = if tty {
        Renderer {
            color: !args.no_color,
            clear_screen: true,
        }
    } else {
        Renderer::plain()
    };

    let mut session = Session::new(engine, io::stdin().lock(), stdout.lock(), renderer);
    let state = session.run().context("terminal I/O failed")?;
    log::debug!(
        "session ended {:?} with {} safe cells revealed",
        state,
        session.engine().board().revealed_safe_count()
    );
    Ok(())
}
