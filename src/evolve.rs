use crate::{grid::Grid, rule::Rule};

/// Computes successive generations of a [`Grid`] under B3/S23.
///
/// The grid is a torus: the left edge is adjacent to the right edge and the
/// top edge to the bottom edge. Every new generation is computed from an
/// untouched copy of the previous one.
#[derive(Clone, Debug, Default)]
pub struct GenerationEngine {
    rule: Rule,
}

impl GenerationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next generation of `grid`.
    pub fn advance(&self, grid: &Grid) -> Grid {
        let mut next = grid.clone();
        self.advance_into(grid, &mut next);
        next
    }

    /// Writes the next generation of `src` into `dst`.
    ///
    /// `dst` is reshaped to match `src` if necessary, so any grid can be used
    /// as the back buffer.
    pub fn advance_into(&self, src: &Grid, dst: &mut Grid) {
        if !dst.same_shape(src) {
            *dst = src.clone();
        }
        let (width, height) = src.dimensions();
        let cells = src.raw();
        let next = dst.cells_mut();
        for y in 0..height {
            let up = (y + height - 1) % height * width;
            let row = y * width;
            let down = (y + 1) % height * width;
            for x in 0..width {
                let left = (x + width - 1) % width;
                let right = (x + 1) % width;
                let count = cells[up + left]
                    + cells[up + x]
                    + cells[up + right]
                    + cells[row + left]
                    + cells[row + right]
                    + cells[down + left]
                    + cells[down + x]
                    + cells[down + right];
                next[row + x] = self.rule.next_state(cells[row + x], count);
            }
        }
    }

    /// Number of living cells among the 8 neighbors of `(x, y)`, wrapping
    /// around the edges.
    ///
    /// On grids narrower or shorter than 3 cells, the same cell can be a
    /// neighbor more than once, and is counted each time.
    pub fn neighbor_count(grid: &Grid, x: usize, y: usize) -> u8 {
        let (width, height) = grid.dimensions();
        neighbors(width, height, x, y)
            .map(|(nx, ny)| grid[(nx, ny)])
            .sum()
    }
}

/// The 8 wrapped neighbors of `(x, y)` on a `width` × `height` torus.
/// `width` and `height` must be positive.
pub(crate) fn neighbors(
    width: usize,
    height: usize,
    x: usize,
    y: usize,
) -> impl Iterator<Item = (usize, usize)> {
    static OFFSETS: [(usize, usize); 8] = [
        (0, 0),
        (1, 0),
        (2, 0),
        (0, 1),
        (2, 1),
        (0, 2),
        (1, 2),
        (2, 2),
    ];
    OFFSETS.iter().map(move |&(dx, dy)| {
        (
            (x % width + width + dx - 1) % width,
            (y % height + height + dy - 1) % height,
        )
    })
}
