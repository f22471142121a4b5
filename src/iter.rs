use crate::grid::{Grid, ALIVE};

impl Grid {
    /// Iterates over the rows of the grid, from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let (width, _) = self.dimensions();
        (0..self.height()).map(move |y| {
            let start = y * width;
            &self.raw()[start..start + width]
        })
    }

    /// Iterates over the coordinates `(x, y)` of living cells, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &cell)| cell == ALIVE)
                .map(move |(x, _)| (x, y))
        })
    }

    /// Calls `f` on the coordinates of every living cell.
    ///
    /// Renderers usually want this rather than reading every cell.
    pub fn for_living_cells<F>(&self, f: F)
    where
        F: FnMut((usize, usize)),
    {
        self.live_cells().for_each(f)
    }
}
