// ============================================================================
// PIXEL GRID — rows of color strings, owned and edited by the viewer
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::PixelError;

/// Cell position on a pixel grid. Signed, because pointer positions left of
/// or above the surface map to negative cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when `0 <= x < cols` and `0 <= y < rows`.
    pub fn in_bounds(&self, cols: usize, rows: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < cols && (self.y as usize) < rows
    }
}

/// A rectangular grid of `rgba(r, g, b, a)` cells, indexed `[y][x]`.
///
/// Serializes as a plain array of rows so exported JSON matches what a
/// hand-authored sprite looks like.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelGrid {
    rows: Vec<Vec<String>>,
}

impl PixelGrid {
    /// Wrap caller-supplied rows. Not validated; see [`PixelGrid::validate`].
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Grid of `cols × rows` cells all set to `color`.
    pub fn filled(cols: usize, rows: usize, color: &str) -> Self {
        Self {
            rows: vec![vec![color.to_string(); cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Width of the first row (0 for an empty grid).
    pub fn cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols() == 0
    }

    pub fn row_slice(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&str> {
        self.rows.get(y)?.get(x).map(String::as_str)
    }

    pub fn get_at(&self, coord: GridCoord) -> Option<&str> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        self.get(coord.x as usize, coord.y as usize)
    }

    /// Overwrite one cell in place. Returns `false` (and changes nothing)
    /// when the cell does not exist.
    pub fn set(&mut self, x: usize, y: usize, color: impl Into<String>) -> bool {
        match self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) => {
                *cell = color.into();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.in_bounds(self.cols(), self.rows())
    }

    /// Check that every row has the same length as the first one.
    pub fn validate(&self) -> Result<(), PixelError> {
        let expected = self.cols();
        for (row, cells) in self.rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(PixelError::MalformedGrid {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> PixelGrid {
        PixelGrid::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn dimensions_come_from_rows() {
        let g = PixelGrid::filled(3, 2, "rgba(1, 1, 1, 1)");
        assert_eq!((g.cols(), g.rows()), (3, 2));
        assert!(!g.is_empty());
        assert!(PixelGrid::default().is_empty());
        assert_eq!(PixelGrid::default().cols(), 0);
    }

    #[test]
    fn set_edits_in_place_and_ignores_out_of_range() {
        let mut g = PixelGrid::filled(2, 2, "a");
        assert!(g.set(1, 0, "b"));
        assert_eq!(g.get(1, 0), Some("b"));
        assert!(!g.set(2, 0, "c"));
        assert!(!g.set(0, 5, "c"));
    }

    #[test]
    fn get_at_rejects_negative_coordinates() {
        let g = PixelGrid::filled(2, 2, "a");
        assert_eq!(g.get_at(GridCoord::new(-1, 0)), None);
        assert_eq!(g.get_at(GridCoord::new(1, 1)), Some("a"));
    }

    #[test]
    fn coord_bounds() {
        assert!(GridCoord::new(0, 0).in_bounds(1, 1));
        assert!(!GridCoord::new(1, 0).in_bounds(1, 1));
        assert!(!GridCoord::new(0, -1).in_bounds(1, 1));
    }

    #[test]
    fn validate_flags_first_ragged_row() {
        let g = grid(&[&["a", "b"], &["a", "b"], &["a"]]);
        match g.validate() {
            Err(PixelError::MalformedGrid { row, expected, found }) => {
                assert_eq!((row, expected, found), (2, 2, 1));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(grid(&[&["a"], &["b"]]).validate().is_ok());
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let g = grid(&[&["rgba(0, 0, 0, 0)", "rgba(1, 2, 3, 4)"]]);
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, r#"[["rgba(0, 0, 0, 0)","rgba(1, 2, 3, 4)"]]"#);
        let back: PixelGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
