use thiserror::Error;

/// Tile code for a traversable cell.
pub const EMPTY: u8 = 0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows or no columns")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unexpected character {ch:?} at row {row}, column {col}")]
    BadTile { row: usize, col: usize, ch: char },
}

/// Rectangular occupancy map, row-major. Read-only once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<u8>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            tiles.extend_from_slice(cells);
        }

        Ok(Self {
            width,
            height: rows.len(),
            tiles,
        })
    }

    /// Builds a grid from one line per row, one digit per tile.
    /// Leading/trailing whitespace and blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (row, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let cells = line
                .chars()
                .enumerate()
                .map(|(col, ch)| {
                    ch.to_digit(10)
                        .map(|d| d as u8)
                        .ok_or(GridError::BadTile { row, col, ch })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
        Self::new(rows)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile code at integer coordinates, `None` outside the map.
    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.tiles[y as usize * self.width + x as usize])
    }

    /// Tile code under a continuous point.
    #[inline]
    pub fn tile_at(&self, p: [f32; 2]) -> Option<u8> {
        let [x, y] = tile_coords(p);
        self.tile(x, y)
    }

    /// Out-of-range tiles block.
    #[inline]
    pub fn is_blocking(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_none_or(|t| t != EMPTY)
    }

    #[inline]
    pub fn is_boundary(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x as usize + 1 == self.width || y as usize + 1 == self.height
    }

    /// Highest wall code in use; `0` for an open map.
    pub fn max_tile(&self) -> u8 {
        self.tiles.iter().copied().max().unwrap_or(EMPTY)
    }
}

#[inline]
pub fn tile_coords(p: [f32; 2]) -> [i32; 2] {
    [p[0].floor() as i32, p[1].floor() as i32]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn rejects_ragged_rows() {
        let err = Grid::new(vec![vec![1, 1, 1], vec![1, 0]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(Grid::new(Vec::new()), Err(GridError::Empty));
        assert_eq!(Grid::new(vec![Vec::new()]), Err(GridError::Empty));
    }

    #[test]
    fn parse_reads_digits_row_major() {
        let grid = Grid::parse(
            "
            123
            405
            ",
        )
        .unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.tile(0, 0), Some(1));
        assert_eq!(grid.tile(2, 0), Some(3));
        assert_eq!(grid.tile(1, 1), Some(0));
        assert_eq!(grid.max_tile(), 5);
    }

    #[test]
    fn parse_rejects_non_digits() {
        let err = Grid::parse("11\n1x").unwrap_err();
        assert_eq!(
            err,
            GridError::BadTile {
                row: 1,
                col: 1,
                ch: 'x'
            }
        );
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(0, -1)]
    #[case(3, 0)]
    #[case(0, 3)]
    fn out_of_range_tiles_block(#[case] x: i32, #[case] y: i32) {
        let grid = Grid::parse("111\n101\n111").unwrap();
        assert_eq!(grid.tile(x, y), None);
        assert!(grid.is_blocking(x, y));
    }

    #[test]
    fn floors_negative_points_outside() {
        let grid = Grid::parse("000\n000").unwrap();
        assert_eq!(tile_coords([-0.2, 0.5]), [-1, 0]);
        assert_eq!(grid.tile_at([-0.2, 0.5]), None);
        assert_eq!(grid.tile_at([2.9, 1.9]), Some(0));
    }

    #[test]
    fn boundary_covers_outer_ring_only() {
        let grid = Grid::parse("111\n101\n111").unwrap();
        assert!(grid.is_boundary(0, 1));
        assert!(grid.is_boundary(2, 2));
        assert!(!grid.is_boundary(1, 1));
    }
}
