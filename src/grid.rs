use crate::error::Error;
use rand::{thread_rng, Rng};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Index,
};

pub(crate) const DEAD: u8 = 0;
pub(crate) const ALIVE: u8 = 1;

/// Default width of a grid.
pub const DEFAULT_WIDTH: i64 = 50;
/// Default height of a grid.
pub const DEFAULT_HEIGHT: i64 = 30;

/// A fixed-size rectangular grid of cells.
///
/// Each cell is either `0` (dead) or `1` (alive). The grid is stored row by
/// row. `x` is the column and `y` is the row; `(0, 0)` is the top left corner.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            width: DEFAULT_WIDTH as usize,
            height: DEFAULT_HEIGHT as usize,
            cells: vec![DEAD; (DEFAULT_WIDTH * DEFAULT_HEIGHT) as usize],
        }
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = u8;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) is outside a {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        &self.cells[y * self.width + x]
    }
}

impl Grid {
    /// Creates a grid with all cells dead.
    pub fn new(width: i64, height: i64) -> Result<Self, Error> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or(Error::InvalidDimension { width, height })?;
        Ok(Grid {
            width: width as usize,
            height: height as usize,
            cells: vec![DEAD; len],
        })
    }

    /// Creates a grid from a list of rows.
    ///
    /// If `dimensions` is `Some((width, height))`, the matrix must have exactly
    /// `height` rows of `width` cells. Otherwise the dimensions are taken from
    /// the matrix itself, and every row must be as long as the first one.
    pub fn from_matrix(matrix: Vec<Vec<u8>>, dimensions: Option<(i64, i64)>) -> Result<Self, Error> {
        let (width, height) = match dimensions {
            Some((width, height)) => {
                if width <= 0 || height <= 0 {
                    return Err(Error::InvalidDimension { width, height });
                }
                (width as usize, height as usize)
            }
            None => {
                let width = matrix.first().map_or(0, Vec::len);
                if width == 0 {
                    return Err(Error::InvalidDimension {
                        width: width as i64,
                        height: matrix.len() as i64,
                    });
                }
                (width, matrix.len())
            }
        };
        if matrix.len() != height {
            return Err(Error::ShapeMismatch {
                expected: (height, width),
                found: (matrix.len(), matrix.first().map_or(0, Vec::len)),
            });
        }
        if let Some(row) = matrix.iter().find(|row| row.len() != width) {
            return Err(Error::ShapeMismatch {
                expected: (height, width),
                found: (matrix.len(), row.len()),
            });
        }
        let cells: Vec<u8> = matrix.into_iter().flatten().collect();
        if let Some(&value) = cells.iter().find(|&&value| value > ALIVE) {
            return Err(Error::InvalidValue(value));
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    /// `(width, height)` of the grid.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, x: i64, y: i64) -> Result<usize, Error> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(Error::OutOfBounds { x, y });
        }
        Ok(y as usize * self.width + x as usize)
    }

    /// Gets the state of the cell at column `x`, row `y`.
    pub fn get_cell(&self, x: i64, y: i64) -> Result<u8, Error> {
        self.offset(x, y).map(|i| self.cells[i])
    }

    /// Sets the state of the cell at column `x`, row `y` to `value`,
    /// which must be `0` or `1`.
    pub fn set_cell(&mut self, x: i64, y: i64, value: u8) -> Result<&mut Self, Error> {
        let i = self.offset(x, y)?;
        if value > ALIVE {
            return Err(Error::InvalidValue(value));
        }
        self.cells[i] = value;
        Ok(self)
    }

    /// Flips the cell at column `x`, row `y`, and returns its new state.
    pub fn toggle_cell(&mut self, x: i64, y: i64) -> Result<u8, Error> {
        let i = self.offset(x, y)?;
        self.cells[i] ^= ALIVE;
        Ok(self.cells[i])
    }

    /// Makes every cell alive with probability 1/2, independently.
    pub fn randomize(&mut self) {
        self.randomize_with(&mut thread_rng())
    }

    /// Like [`randomize`](Grid::randomize), but draws from the given
    /// random number generator.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cells
            .iter_mut()
            .for_each(|cell| *cell = rng.gen_bool(0.5) as u8);
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = DEAD);
    }

    /// Number of living cells.
    pub fn population(&self) -> u64 {
        self.cells.iter().map(|&cell| cell as u64).sum()
    }

    /// Whether all cells are dead.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == DEAD)
    }

    pub(crate) fn raw(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    pub(crate) fn same_shape(&self, other: &Grid) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Plaintext rendering: one line per row, `o` for living cells and `.` for
/// dead cells.
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for row in self.rows() {
            for &cell in row {
                f.write_str(if cell == ALIVE { "o" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
