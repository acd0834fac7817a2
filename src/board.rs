use std::io::{self, Write};

use crate::error::GameError;
use crate::types::{BOARD_SIZE, Cell, Disc, Position};

const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Disc layout for one position, one bitboard per color.
///
/// Bit index is `row * 8 + col` with row 0 at the top, so snapshots are
/// two-word value copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    black: u64,
    white: u64,
}

impl Grid {
    /// Creates the canonical opening position:
    /// d4=white, e4=black, d5=black, e5=white.
    pub fn initial() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    pub fn from_bitboards(black: u64, white: u64) -> Self {
        debug_assert_eq!(black & white, 0, "a square cannot hold two discs");
        Self { black, white }
    }

    pub fn cell(&self, pos: usize) -> Cell {
        let square = bit(pos);
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Returns legal move mask for the given color.
    pub fn legal_moves(&self, color: Disc) -> u64 {
        let (me, opp) = self.sides(color);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Places one disc and flips captured discs.
    /// Returns flipped bit mask. Returns 0 and leaves the grid unchanged
    /// when the move is illegal.
    pub fn place(&mut self, pos: usize, color: Disc) -> u64 {
        let (me, opp) = self.sides(color);

        let flips = Self::collect_flips(pos, me, opp);
        if flips == 0 {
            return 0;
        }

        let move_bit = bit(pos);
        let next_me = me | move_bit | flips;
        let next_opp = opp & !flips;

        match color {
            Disc::Black => {
                self.black = next_me;
                self.white = next_opp;
            }
            Disc::White => {
                self.white = next_me;
                self.black = next_opp;
            }
        }

        flips
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    /// Writes the grid as 8 rows of 8 space-separated cell characters.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if col > 0 {
                    write!(out, " ")?;
                }
                write!(out, "{}", self.cell(row * BOARD_SIZE + col).symbol())?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Reads the 64 cell tokens produced by [`Grid::write_to`].
    pub fn from_tokens<'a, I>(tokens: &mut I) -> Result<Self, GameError>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut black = 0u64;
        let mut white = 0u64;

        for pos in 0..NUM_SQUARES {
            let token = tokens
                .next()
                .ok_or_else(|| GameError::CorruptData("board data ended early".into()))?;
            let mut chars = token.chars();
            let cell = match (chars.next().and_then(Cell::from_symbol), chars.next()) {
                (Some(cell), None) => cell,
                _ => {
                    return Err(GameError::CorruptData(format!("bad cell token {token:?}")));
                }
            };
            match cell {
                Cell::Black => black |= bit(pos),
                Cell::White => white |= bit(pos),
                Cell::Empty => {}
            }
        }

        Ok(Self { black, white })
    }

    fn sides(&self, color: Disc) -> (u64, u64) {
        match color {
            Disc::Black => (self.black, self.white),
            Disc::White => (self.white, self.black),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES {
            return 0;
        }

        let move_bit = bit(pos);
        if ((me | opp) & move_bit) != 0 {
            return 0;
        }

        let (row, col) = pos_to_row_col(pos);
        let mut flips = 0u64;

        for (dr, dc) in DIRECTIONS {
            let mut r = row + dr;
            let mut c = col + dc;
            let mut line = 0u64;
            let mut has_opponent = false;

            while in_bounds(r, c) {
                let square = bit((r as usize) * BOARD_SIZE + c as usize);
                if (opp & square) != 0 {
                    has_opponent = true;
                    line |= square;
                } else if (me & square) != 0 {
                    if has_opponent {
                        flips |= line;
                    }
                    break;
                } else {
                    break;
                }

                r += dr;
                c += dc;
            }
        }

        flips
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::initial()
    }
}

/// Rules engine: the current grid plus undo/redo snapshot stacks.
#[derive(Debug, Clone, Default)]
pub struct Board {
    grid: Grid,
    undo_stack: Vec<Grid>,
    redo_stack: Vec<Grid>,
}

impl Board {
    pub fn new() -> Self {
        Self::from_grid(Grid::initial())
    }

    /// An engine positioned at `grid` with no history.
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Restores the opening position and discards all history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Places `color` at `pos`, flipping every bracketed run, and returns
    /// the flipped mask.
    ///
    /// The pre-move grid is pushed onto the undo stack. Pending redo
    /// entries refer to an abandoned line of play and are dropped.
    pub fn place_piece(&mut self, pos: Position, color: Disc) -> Result<u64, GameError> {
        if self.grid.cell(pos.index()) != Cell::Empty {
            return Err(GameError::CellOccupied);
        }

        let snapshot = self.grid;
        let flips = self.grid.place(pos.index(), color);
        if flips == 0 {
            return Err(GameError::IllegalMove);
        }

        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        Ok(flips)
    }

    /// Read-only bracket check for a single square.
    pub fn is_valid_move(&self, pos: Position, color: Disc) -> bool {
        let (me, opp) = self.grid.sides(color);
        Grid::collect_flips(pos.index(), me, opp) != 0
    }

    /// Whether `color` can place anywhere on the grid.
    pub fn has_any_move(&self, color: Disc) -> bool {
        self.grid.legal_moves(color) != 0
    }

    /// Returns `(black_score, white_score)`.
    pub fn scores(&self) -> (u8, u8) {
        self.grid.count()
    }

    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.grid.write_to(out)
    }

    /// Replaces the grid with one parsed from `tokens`. History does not
    /// survive across a load.
    pub fn deserialize<'a, I>(&mut self, tokens: &mut I) -> Result<(), GameError>
    where
        I: Iterator<Item = &'a str>,
    {
        *self = Self::from_grid(Grid::from_tokens(tokens)?);
        Ok(())
    }

    /// Steps back one placement. Returns false when there is nothing to
    /// undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(prev) => {
                self.redo_stack.push(self.grid);
                self.grid = prev;
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone placement.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(self.grid);
                self.grid = next;
                true
            }
            None => false,
        }
    }
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
