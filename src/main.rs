use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use othello::command::Command;
use othello::config::load_settings;
use othello::error::GameError;
use othello::game::{Game, Outcome};
use othello::types::BOARD_SIZE;

const COLOR_RED: &str = "\x1b[31m";
const COLOR_RESET: &str = "\x1b[0m";

#[derive(Parser, Debug)]
#[command(about = "Two-player Othello for the terminal")]
struct Cli {
    /// Directory save files are written to and read from.
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(dir) = cli.save_dir {
        settings.save_dir = dir;
    }

    let mut game = Game::new(settings.save_dir);
    info!(save_dir = %game.save_dir().display(), "session started");
    render(&game);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        match dispatch(&mut game, &line) {
            Ok(true) => render(&game),
            Ok(false) => {}
            Err(err) => {
                debug!(input = line, %err, "command rejected");
                eprintln!("{COLOR_RED}{err}{COLOR_RESET}");
                render(&game);
            }
        }
    }
}

/// Runs one command against the session. `Ok(true)` means the board
/// changed (or was asked for) and should be redrawn.
fn dispatch(game: &mut Game, line: &str) -> Result<bool, GameError> {
    let Some(command) = Command::parse(line)? else {
        return Ok(false);
    };

    match command {
        Command::New => {
            game.reset();
            Ok(true)
        }
        Command::Place(pos) => {
            game.make_move(pos)?;
            Ok(true)
        }
        Command::Save(name) => {
            let path = game.save_game(&name)?;
            println!("Saved to {}", path.display());
            Ok(false)
        }
        Command::Load(name) => {
            game.load_game(&name)?;
            Ok(true)
        }
        Command::Undo => Ok(game.undo_last_move()),
        Command::Redo => Ok(game.redo_last_move()),
        Command::Exit => std::process::exit(0),
    }
}

fn render(game: &Game) {
    let grid = game.grid();

    print!(" ");
    for col in 0..BOARD_SIZE {
        print!(" {}", (b'A' + col as u8) as char);
    }
    println!();
    for row in 0..BOARD_SIZE {
        print!("{} ", row + 1);
        for col in 0..BOARD_SIZE {
            print!("{} ", grid.cell(row * BOARD_SIZE + col).symbol());
        }
        println!();
    }

    if !game.is_finished() {
        println!("Player Turn: {}", game.current().symbol());
    }
    let (black, white) = game.scores();
    println!("Score - B: {black} | W: {white}");
    match game.outcome() {
        Some(Outcome::Winner(color)) => println!("Winner: {color}"),
        Some(Outcome::Draw) => println!("Game ended in a draw!"),
        None => {}
    }
}
