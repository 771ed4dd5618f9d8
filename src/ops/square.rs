// ============================================================================
// FIT SQUARE — pad short grids / crop tall grids toward a square
// ============================================================================

use crate::color::TRANSPARENT;
use crate::error::PixelError;
use crate::grid::PixelGrid;

/// Make a grid (roughly) square by adjusting its height.
///
/// `half = floor(|cols - rows| / 2)`:
///   - wider than tall: `half` transparent rows are added above and below
///   - taller than wide: `half` rows are cut from the top and the bottom
///   - already square: returned unchanged
///
/// When the difference is odd the result is still one row off square; that
/// residual is kept. Ragged grids are rejected with `MalformedGrid`.
pub fn fit_square(grid: &PixelGrid) -> Result<PixelGrid, PixelError> {
    grid.validate()?;

    let width = grid.cols();
    let height = grid.rows();
    let half = width.abs_diff(height) / 2;

    if height < width {
        let pad = vec![TRANSPARENT.to_string(); width];
        let mut rows = Vec::with_capacity(height + 2 * half);
        rows.extend(std::iter::repeat_n(pad.clone(), half));
        rows.extend(grid.row_slice().iter().cloned());
        rows.extend(std::iter::repeat_n(pad, half));
        return Ok(PixelGrid::from_rows(rows));
    }

    if height > width {
        let rows = grid.row_slice()[half..height - half].to_vec();
        return Ok(PixelGrid::from_rows(rows));
    }

    Ok(grid.clone())
}
