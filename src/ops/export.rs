// ============================================================================
// EXPORT — rasterize a pixel grid back into an image (PNG for "save")
// ============================================================================

use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};
use rayon::prelude::*;

use crate::color::cell_rgba;
use crate::error::PixelError;
use crate::grid::PixelGrid;

/// Parse every cell once; unreadable cells become transparent.
fn decode_cells(grid: &PixelGrid) -> Vec<[u8; 4]> {
    grid.row_slice()
        .iter()
        .flat_map(|row| row.iter().map(|c| cell_rgba(c)))
        .collect()
}

/// Draw the grid onto a `width × height` image. Each destination pixel takes
/// the color of the cell it falls in, so cells stretch to fill the surface.
pub fn rasterize(grid: &PixelGrid, width: u32, height: u32) -> Result<RgbaImage, PixelError> {
    grid.validate()?;
    let mut img = RgbaImage::new(width, height);
    let cols = grid.cols() as u64;
    let rows = grid.rows() as u64;
    if grid.is_empty() || width == 0 || height == 0 {
        return Ok(img);
    }

    let cells = decode_cells(grid);
    let stride = width as usize * 4;
    let buf: &mut [u8] = &mut img;

    buf.par_chunks_mut(stride).enumerate().for_each(|(py, row)| {
        let cy = (py as u64 * rows / height as u64) as usize;
        let base = cy * cols as usize;
        for (px, dst) in row.chunks_exact_mut(4).enumerate() {
            let cx = (px as u64 * cols / width as u64) as usize;
            dst.copy_from_slice(&cells[base + cx]);
        }
    });

    Ok(img)
}

/// Render the grid with every cell as a `cell_size × cell_size` block.
pub fn grid_to_image(grid: &PixelGrid, cell_size: u32) -> Result<RgbaImage, PixelError> {
    if cell_size == 0 {
        return Err(PixelError::InvalidArgument(
            "cell size must be positive".to_string(),
        ));
    }
    let width = (grid.cols() as u32).checked_mul(cell_size);
    let height = (grid.rows() as u32).checked_mul(cell_size);
    match (width, height) {
        (Some(w), Some(h)) => rasterize(grid, w, h),
        _ => Err(PixelError::InvalidArgument(format!(
            "{}x{} grid at cell size {} is too large",
            grid.cols(),
            grid.rows(),
            cell_size
        ))),
    }
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PixelError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker() -> PixelGrid {
        PixelGrid::from_rows(vec![
            vec!["rgba(255, 0, 0, 255)".into(), "rgba(0, 255, 0, 255)".into()],
            vec!["rgba(0, 0, 255, 255)".into(), "rgba(0, 0, 0, 0)".into()],
        ])
    }

    #[test]
    fn one_pixel_per_cell() {
        let img = grid_to_image(&checker(), 1).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(*img.get_pixel(1, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(1, 1), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn cells_scale_to_blocks() {
        let img = grid_to_image(&checker(), 3).unwrap();
        assert_eq!(img.dimensions(), (6, 6));
        assert_eq!(*img.get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(3, 2), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(2, 3), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn zero_cell_size_is_invalid() {
        assert!(matches!(grid_to_image(&checker(), 0), Err(PixelError::InvalidArgument(_))));
    }

    #[test]
    fn rasterize_stretches_to_surface() {
        let img = rasterize(&checker(), 5, 3).unwrap();
        assert_eq!(img.dimensions(), (5, 3));
        // Column 2 of 5 lies in cell 0 (2*2/5 = 0), column 3 in cell 1.
        assert_eq!(*img.get_pixel(2, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(3, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(0, 2), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn png_bytes_decode_to_same_pixels() {
        let img = grid_to_image(&checker(), 1).unwrap();
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(back, img);
    }
}
