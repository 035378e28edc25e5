//! Byter, a self-modifying 16×16 grid
//!
//! The cursor walks the grid and each cell decides the next step. Arrow
//! cells flip to their opposite when passed, emitting cells print their own
//! index (`row * 16 + col`) as a character.

use {crate::host::HostIo, derive_more::Display};

pub const SIDE: usize = 16;

/// Characters that make up a program, anything else is a comment
pub const COMMANDS: &[u8] = b"0<>VA{}+-$#";

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum ByterError {
    #[display(fmt = "program has {} commands, expected 256", _0)]
    InvalidSize(usize),

    #[display(fmt = "{}x{} is not a valid point in the grid", row, col)]
    OutOfGrid { row: isize, col: isize },
}

impl core::error::Error for ByterError {}

pub struct Byter {
    pub grid: [[u8; SIDE]; SIDE],
}

impl Byter {
    pub fn new(source: &str) -> Result<Self, ByterError> {
        let mut commands = source.bytes().filter(|b| COMMANDS.contains(b));
        let mut grid = [[0; SIDE]; SIDE];
        let mut count = 0;
        for (cell, command) in grid.iter_mut().flatten().zip(&mut commands) {
            *cell = command;
            count += 1;
        }
        count += commands.count();

        if count != SIDE * SIDE {
            return Err(ByterError::InvalidSize(count));
        }
        Ok(Self { grid })
    }

    /// Walk from the top left corner until a `#`
    pub fn run(&mut self, host: &mut impl HostIo) -> Result<(), ByterError> {
        let (mut row, mut col) = (0isize, 0isize);
        loop {
            let cell = match (usize::try_from(row), usize::try_from(col)) {
                (Ok(r), Ok(c)) if r < SIDE && c < SIDE => &mut self.grid[r][c],
                _ => return Err(ByterError::OutOfGrid { row, col }),
            };

            let index = (row * SIDE as isize + col) as u8;
            let (dr, dc) = match *cell {
                b'0' => (0, -1),
                b'<' => {
                    *cell = b'>';
                    (0, -1)
                }
                b'>' => {
                    *cell = b'<';
                    (0, 1)
                }
                b'V' => {
                    *cell = b'A';
                    (1, 0)
                }
                b'A' => {
                    *cell = b'V';
                    (-1, 0)
                }
                b'{' | b'}' | b'+' | b'-' | b'$' => {
                    host.emit_char(char::from(index));
                    match *cell {
                        b'{' => (0, -1),
                        b'}' => (0, 1),
                        b'+' => (-1, 0),
                        b'-' => (1, 0),
                        _ => {
                            (row, col) = (0, 0);
                            continue;
                        }
                    }
                }
                _ => {
                    log::debug!("byter halted at {row}x{col}");
                    return Ok(());
                }
            };

            row += dr;
            col += dc;
        }
    }
}
