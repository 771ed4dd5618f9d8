// ============================================================================
// PIXELIZE — raw raster → grid of "rgba(r, g, b, a)" cells
// ============================================================================

use rayon::prelude::*;

use crate::color::format_rgba;
use crate::error::PixelError;
use crate::grid::PixelGrid;
use crate::raster::RawRaster;

/// Convert a raster into a pixel grid with `rows = height`, `cols = width`.
///
/// Four-channel rasters carry their alpha byte through unchanged; three-channel
/// rasters are treated as opaque. Other channel counts are rejected.
pub fn to_pixel_grid(raster: &RawRaster) -> Result<PixelGrid, PixelError> {
    let channels = raster.channels() as usize;
    if channels != 3 && channels != 4 {
        return Err(PixelError::InvalidArgument(format!(
            "cannot pixelize a {}-channel raster (need RGB or RGBA)",
            channels
        )));
    }
    if raster.width() == 0 {
        return Ok(PixelGrid::from_rows(vec![Vec::new(); raster.height() as usize]));
    }

    let rows: Vec<Vec<String>> = raster
        .data()
        .par_chunks(raster.stride())
        .map(|row| {
            row.chunks_exact(channels)
                .map(|px| {
                    let a = if channels == 4 { px[3] } else { 255 };
                    format_rgba([px[0], px[1], px[2], a])
                })
                .collect()
        })
        .collect();

    Ok(PixelGrid::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cell_matches_its_raster_offset() {
        let (w, h) = (5u32, 3u32);
        let data: Vec<u8> = (0..w * h * 4).map(|i| (i * 7 % 256) as u8).collect();
        let raster = RawRaster::new(w, h, 4, data.clone()).unwrap();
        let grid = to_pixel_grid(&raster).unwrap();

        assert_eq!((grid.cols(), grid.rows()), (5, 3));
        for y in 0..h as usize {
            for x in 0..w as usize {
                let pos = 4 * (y * w as usize + x);
                let expected = format!(
                    "rgba({}, {}, {}, {})",
                    data[pos],
                    data[pos + 1],
                    data[pos + 2],
                    data[pos + 3]
                );
                assert_eq!(grid.get(x, y), Some(expected.as_str()));
            }
        }
    }

    #[test]
    fn alpha_is_not_normalized() {
        let raster = RawRaster::new(1, 1, 4, vec![10, 20, 30, 128]).unwrap();
        let grid = to_pixel_grid(&raster).unwrap();
        assert_eq!(grid.get(0, 0), Some("rgba(10, 20, 30, 128)"));
    }

    #[test]
    fn rgb_rasters_are_opaque() {
        let raster = RawRaster::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let grid = to_pixel_grid(&raster).unwrap();
        assert_eq!(grid.get(1, 0), Some("rgba(4, 5, 6, 255)"));
    }

    #[test]
    fn grayscale_is_rejected() {
        let raster = RawRaster::new(2, 1, 1, vec![1, 2]).unwrap();
        assert!(matches!(to_pixel_grid(&raster), Err(PixelError::InvalidArgument(_))));
    }

    #[test]
    fn zero_width_gives_empty_rows() {
        let raster = RawRaster::new(0, 2, 4, Vec::new()).unwrap();
        let grid = to_pixel_grid(&raster).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 0));
    }
}
