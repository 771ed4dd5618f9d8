// ============================================================================
// COORDINATE MAPPING — pointer position on a surface → grid cell
// ============================================================================

use crate::grid::GridCoord;

/// A pointer position in client (screen) coordinates, tagged by the input
/// device it came from. Touch input carries only the first touch point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerSample {
    Mouse { x: f32, y: f32 },
    Touch { x: f32, y: f32 },
}

impl PointerSample {
    pub fn position(&self) -> (f32, f32) {
        match *self {
            PointerSample::Mouse { x, y } | PointerSample::Touch { x, y } => (x, y),
        }
    }
}

/// On-screen bounding box of the drawing surface, in the same units as the
/// pointer samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }
}

/// Map a pointer sample onto a `cols × rows` grid drawn across `rect`.
///
/// The result is not clamped: a pointer outside the surface yields a cell
/// outside the grid (possibly negative). Check with [`GridCoord::in_bounds`]
/// before indexing. Non-finite results (zero-sized surface) saturate.
pub fn get_coord(sample: PointerSample, rect: SurfaceRect, cols: usize, rows: usize) -> GridCoord {
    let (client_x, client_y) = sample.position();
    let pos_x = client_x - rect.left;
    let pos_y = client_y - rect.top;

    let cell_w = rect.width / cols as f32;
    let cell_h = rect.height / rows as f32;

    GridCoord {
        x: (pos_x / cell_w).floor() as i32,
        y: (pos_y / cell_h).floor() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_sample_maps_to_cell() {
        let rect = SurfaceRect::new(0.0, 0.0, 100.0, 100.0);
        let c = get_coord(PointerSample::Mouse { x: 55.0, y: 23.0 }, rect, 10, 10);
        assert_eq!(c, GridCoord::new(5, 2));
    }

    #[test]
    fn touch_sample_maps_like_mouse() {
        let rect = SurfaceRect::new(0.0, 0.0, 100.0, 100.0);
        let c = get_coord(PointerSample::Touch { x: 55.0, y: 23.0 }, rect, 10, 10);
        assert_eq!(c, GridCoord::new(5, 2));
    }

    #[test]
    fn offset_surface_and_non_square_cells() {
        let rect = SurfaceRect::new(20.0, 40.0, 64.0, 30.0);
        // 8 columns of 8px, 3 rows of 10px
        let c = get_coord(PointerSample::Mouse { x: 20.0 + 63.9, y: 40.0 + 10.0 }, rect, 8, 3);
        assert_eq!(c, GridCoord::new(7, 1));
    }

    #[test]
    fn outside_pointer_gives_out_of_bounds_cell() {
        let rect = SurfaceRect::new(10.0, 10.0, 100.0, 100.0);
        let left = get_coord(PointerSample::Mouse { x: 5.0, y: 50.0 }, rect, 10, 10);
        assert_eq!(left.x, -1);
        assert!(!left.in_bounds(10, 10));

        let below = get_coord(PointerSample::Mouse { x: 50.0, y: 111.0 }, rect, 10, 10);
        assert_eq!(below.y, 10);
        assert!(!below.in_bounds(10, 10));
    }

    #[test]
    fn zero_sized_surface_does_not_panic() {
        let rect = SurfaceRect::new(0.0, 0.0, 0.0, 0.0);
        let c = get_coord(PointerSample::Mouse { x: 3.0, y: 3.0 }, rect, 4, 4);
        assert!(!c.in_bounds(4, 4));
    }
}
