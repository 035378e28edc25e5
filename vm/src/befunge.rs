//! Befunge-93 on a torus
//!
//! The playfield is as wide as the longest source line and as tall as the
//! line count, shorter lines are padded with spaces. Leaving one edge enters
//! the opposite one.

use {
    crate::host::{Emit, HostIo},
    alloc::vec::Vec,
    core::fmt::Write,
    derive_more::Display,
    rand_core::RngCore,
};

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum BefungeError {
    #[display(fmt = "division by zero at {}x{}", x, y)]
    DivideByZero { x: usize, y: usize },

    #[display(fmt = "{}x{} is outside the playfield", x, y)]
    OutOfBounds { x: i64, y: i64 },

    #[display(fmt = "input is not a number")]
    InvalidNumericInput,
}

impl core::error::Error for BefungeError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Right, Self::Left];

    fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}

pub struct Befunge93<R> {
    /// Row-major cells
    pub grid: Vec<i64>,
    pub width: usize,
    pub height: usize,
    pub stack: Vec<i64>,
    x: usize,
    y: usize,
    dir: Direction,
    string_mode: bool,
    rng: R,
}

impl<R: RngCore> Befunge93<R> {
    pub fn new(source: &str, rng: R) -> Self {
        let width = source.lines().map(|l| l.chars().count()).max().unwrap_or(0).max(1);
        let height = source.lines().count().max(1);
        let mut grid = alloc::vec![b' ' as i64; width * height];
        for (y, line) in source.lines().enumerate() {
            for (x, c) in line.chars().enumerate() {
                grid[y * width + x] = c as i64;
            }
        }

        Self {
            grid,
            width,
            height,
            stack: Vec::new(),
            x: 0,
            y: 0,
            dir: Direction::Right,
            string_mode: false,
            rng,
        }
    }

    fn pop(&mut self) -> i64 {
        self.stack.pop().unwrap_or(0)
    }

    fn cell(&mut self, x: i64, y: i64) -> Result<&mut i64, BefungeError> {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(col), Ok(row)) if col < self.width && row < self.height => {
                Ok(&mut self.grid[row * self.width + col])
            }
            _ => Err(BefungeError::OutOfBounds { x, y }),
        }
    }

    fn advance(&mut self) {
        match self.dir {
            Direction::Up => self.y = self.y.checked_sub(1).unwrap_or(self.height - 1),
            Direction::Down => self.y = (self.y + 1) % self.height,
            Direction::Right => self.x = (self.x + 1) % self.width,
            Direction::Left => self.x = self.x.checked_sub(1).unwrap_or(self.width - 1),
        }
    }

    /// Execute until `@`
    pub fn run(&mut self, host: &mut impl HostIo) -> Result<(), BefungeError> {
        loop {
            let value = self.grid[self.y * self.width + self.x];
            if self.string_mode {
                match value {
                    v if v == b'"' as i64 => self.string_mode = false,
                    v => self.stack.push(v),
                }
                self.advance();
                continue;
            }

            let c = u32::try_from(value).ok().and_then(char::from_u32).unwrap_or(' ');
            log::trace!("{}x{} {c:?} {:?}", self.x, self.y, self.stack);
            match c {
                '0'..='9' => self.stack.push(value - b'0' as i64),
                '+' | '-' | '*' | '`' => {
                    let a = self.pop();
                    let b = self.pop();
                    self.stack.push(match c {
                        '+' => b.wrapping_add(a),
                        '-' => b.wrapping_sub(a),
                        '*' => b.wrapping_mul(a),
                        _ => (b > a) as i64,
                    });
                }
                '/' | '%' => {
                    let a = self.pop();
                    let b = self.pop();
                    if a == 0 {
                        return Err(BefungeError::DivideByZero { x: self.x, y: self.y });
                    }
                    self.stack.push(match c {
                        '/' => b.wrapping_div(a),
                        _ => b.wrapping_rem(a),
                    });
                }
                '!' => {
                    let v = self.pop();
                    self.stack.push((v == 0) as i64);
                }
                '>' => self.dir = Direction::Right,
                '<' => self.dir = Direction::Left,
                '^' => self.dir = Direction::Up,
                'v' => self.dir = Direction::Down,
                '?' => self.dir = Direction::ALL[(self.rng.next_u32() % 4) as usize],
                '_' => {
                    self.dir = if self.pop() == 0 { Direction::Right } else { Direction::Left }
                }
                '|' => self.dir = if self.pop() == 0 { Direction::Down } else { Direction::Up },
                '"' => self.string_mode = true,
                ':' => {
                    // Duplicating nothing leaves a single zero
                    let v = self.stack.last().copied().unwrap_or(0);
                    self.stack.push(v);
                }
                '\\' => {
                    let a = self.pop();
                    let b = self.pop();
                    self.stack.extend([a, b]);
                }
                '$' => _ = self.pop(),
                '.' => {
                    let v = self.pop();
                    // `Emit` never fails
                    _ = write!(Emit(&mut *host), "{v} ");
                }
                ',' => {
                    let v = self.pop();
                    let c = u32::try_from(v).ok().and_then(char::from_u32);
                    host.emit_char(c.unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                '#' => self.advance(),
                'p' => {
                    let y = self.pop();
                    let x = self.pop();
                    let v = self.pop();
                    *self.cell(x, y)? = v;
                }
                'g' => {
                    let y = self.pop();
                    let x = self.pop();
                    let v = *self.cell(x, y)?;
                    self.stack.push(v);
                }
                '&' => {
                    let v = match host.read_line() {
                        Some(line) => {
                            line.trim().parse().map_err(|_| BefungeError::InvalidNumericInput)?
                        }
                        None => -1,
                    };
                    self.stack.push(v);
                }
                '~' => {
                    let v = host.read_char().map_or(-1, |c| c as i64);
                    self.stack.push(v);
                }
                '@' => {
                    log::debug!("befunge halted at {}x{}", self.x, self.y);
                    return Ok(());
                }
                ' ' => {}
                _ => self.dir = self.dir.reverse(),
            }

            self.advance();
        }
    }
}
