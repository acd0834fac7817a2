use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::board::{Board, Grid};
use crate::error::GameError;
use crate::types::{Disc, Position};

/// Final standing of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Disc),
    Draw,
}

/// Turn controller: owns the rules engine, the mover, and the finished
/// flag. Scores are derived from the grid, never stored.
#[derive(Debug)]
pub struct Game {
    board: Board,
    current: Disc,
    finished: bool,
    save_dir: PathBuf,
}

impl Game {
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            board: Board::new(),
            current: Disc::Black,
            finished: false,
            save_dir: save_dir.into(),
        }
    }

    /// Starts a fresh game in place.
    pub fn reset(&mut self) {
        self.board.reset();
        self.current = Disc::Black;
        self.finished = false;
    }

    pub fn grid(&self) -> Grid {
        self.board.grid()
    }

    pub fn current(&self) -> Disc {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns `(black_score, white_score)`.
    pub fn scores(&self) -> (u8, u8) {
        self.board.scores()
    }

    /// Winner by disc count, or a draw; `None` while the game is running.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.finished {
            return None;
        }
        let (black, white) = self.board.scores();
        Some(if black > white {
            Outcome::Winner(Disc::Black)
        } else if white > black {
            Outcome::Winner(Disc::White)
        } else {
            Outcome::Draw
        })
    }

    /// Places the mover's disc and advances the turn. Engine failures
    /// propagate unchanged.
    pub fn make_move(&mut self, pos: Position) -> Result<u64, GameError> {
        let flips = self.board.place_piece(pos, self.current)?;
        self.next_turn();
        Ok(flips)
    }

    /// Whether `color` can place anywhere on the grid.
    pub fn has_valid_moves(&self, color: Disc) -> bool {
        self.board.has_any_move(color)
    }

    /// Writes the grid plus a mover marker line to `<save_dir>/<name>`.
    pub fn save_game(&self, name: &str) -> Result<PathBuf, GameError> {
        fs::create_dir_all(&self.save_dir)?;
        let path = self.save_dir.join(name);

        let mut out = BufWriter::new(File::create(&path)?);
        self.board.serialize(&mut out)?;
        writeln!(out, "{}", self.current.symbol())?;
        out.flush()?;

        info!(path = %path.display(), "game saved");
        Ok(path)
    }

    /// Restores a session written by [`Game::save_game`].
    ///
    /// Nothing is replaced until the whole file parses, so a corrupt save
    /// leaves the session as it was. Mover legality is re-validated the
    /// same way a normal turn advance is; the loaded session may already
    /// be finished.
    pub fn load_game(&mut self, name: &str) -> Result<(), GameError> {
        let path = self.save_dir.join(name);
        let contents = fs::read_to_string(&path)?;

        let mut tokens = contents.split_whitespace();
        let mut board = Board::new();
        board.deserialize(&mut tokens)?;
        let mover = match tokens.next() {
            Some("B") => Disc::Black,
            Some("W") => Disc::White,
            Some(other) => {
                return Err(GameError::CorruptData(format!("bad turn marker {other:?}")));
            }
            None => return Err(GameError::CorruptData("missing turn marker".into())),
        };

        self.board = board;
        self.current = mover;
        self.finished = false;
        self.skip_stuck_mover();

        info!(path = %path.display(), "game loaded");
        Ok(())
    }

    /// Rolls back the most recent placement and re-derives the mover.
    /// No-op when there is no history.
    pub fn undo_last_move(&mut self) -> bool {
        if self.board.undo() {
            self.next_turn();
            true
        } else {
            false
        }
    }

    /// Re-applies the most recently undone placement and re-derives the
    /// mover. No-op when there is nothing to redo.
    pub fn redo_last_move(&mut self) -> bool {
        if self.board.redo() {
            self.next_turn();
            true
        } else {
            false
        }
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Switches the mover, then skips a stuck player; when both sides are
    /// stuck the session is finished.
    fn next_turn(&mut self) {
        self.current = self.current.opponent();
        self.skip_stuck_mover();
    }

    fn skip_stuck_mover(&mut self) {
        if !self.has_valid_moves(self.current) {
            self.current = self.current.opponent();
            if !self.has_valid_moves(self.current) {
                self.finished = true;
                let (black, white) = self.board.scores();
                info!(black, white, "no legal moves for either side; game over");
            }
        }
    }

    #[cfg(test)]
    fn set_position_for_test(&mut self, grid: Grid, current: Disc) {
        self.board = Board::from_grid(grid);
        self.current = current;
        self.finished = false;
    }
}
