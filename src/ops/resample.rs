// ============================================================================
// RESAMPLE — box-averaging downscale / nearest-sample upscale
// ============================================================================

use rayon::prelude::*;

use crate::error::PixelError;
use crate::raster::RawRaster;

/// Largest output a resample may produce, in pixels (4096 × 4096).
pub const MAX_OUTPUT_PIXELS: u64 = 4096 * 4096;

/// Resample `raster` to `desired_width` pixels wide, preserving aspect ratio.
///
/// With `factor = desired_width / width`:
///   - output size is `floor(width * factor) × floor(height * factor)`
///   - downscaling (`factor < 1`) averages a `ceil(1/factor)²` block of
///     source pixels anchored at `floor(y/factor), floor(x/factor)`
///   - upscaling (`factor >= 1`) copies the single source pixel at the anchor
///
/// All positions are computed in integer arithmetic, so `desired_width ==
/// width` is an exact identity. Block samples are clamped to the raster
/// bounds and the sum is divided by the number of samples taken, so a uniform
/// image stays uniform. Each channel is averaged independently.
///
/// Outputs above [`MAX_OUTPUT_PIXELS`] are rejected before anything is
/// allocated.
pub fn resample(raster: &RawRaster, desired_width: u32) -> Result<RawRaster, PixelError> {
    if desired_width == 0 {
        return Err(PixelError::InvalidArgument(
            "target width must be positive".to_string(),
        ));
    }
    if raster.width() == 0 || raster.height() == 0 {
        return Err(PixelError::InvalidArgument(format!(
            "cannot resample a {}x{} raster",
            raster.width(), raster.height()
        )));
    }

    let src_w = raster.width() as u64;
    let dst_w = desired_width as u64;
    let new_width = desired_width;
    let new_height = raster.height() as u64 * dst_w / src_w;
    if dst_w * new_height > MAX_OUTPUT_PIXELS {
        return Err(PixelError::InvalidArgument(format!(
            "resampling {}x{} to width {} would produce {}x{} pixels (limit {})",
            raster.width(),
            raster.height(),
            desired_width,
            desired_width,
            new_height,
            MAX_OUTPUT_PIXELS
        )));
    }
    let new_height = new_height as u32;
    let channels = raster.channels() as usize;

    // Samples per axis: ceil(1 / factor) when shrinking, a single one otherwise.
    let block = if dst_w >= src_w { 1 } else { src_w.div_ceil(dst_w) as u32 };
    let samples = block as u64 * block as u64;

    let stride = new_width as usize * channels;
    let mut out = vec![0u8; stride * new_height as usize];
    if out.is_empty() {
        return RawRaster::new(new_width, new_height, raster.channels(), out);
    }

    let max_x = raster.width() - 1;
    let max_y = raster.height() - 1;

    out.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
        let anchor_y = (y as u64 * src_w / dst_w) as u32;
        let mut sums = vec![0u64; channels];

        for x in 0..new_width as usize {
            let anchor_x = (x as u64 * src_w / dst_w) as u32;
            sums.iter_mut().for_each(|s| *s = 0);

            for y_off in 0..block {
                let sy = anchor_y.saturating_add(y_off).min(max_y);
                for x_off in 0..block {
                    let sx = anchor_x.saturating_add(x_off).min(max_x);
                    let px = raster.pixel(sx, sy);
                    for (sum, &v) in sums.iter_mut().zip(px) {
                        *sum += v as u64;
                    }
                }
            }

            let dst = &mut row[x * channels..(x + 1) * channels];
            for (d, &sum) in dst.iter_mut().zip(&sums) {
                // Round half up; a mean of bytes never exceeds 255.
                *d = ((sum + samples / 2) / samples).min(255) as u8;
            }
        }
    });

    crate::log_info!(
        "Resampled {}x{} -> {}x{} (block {})",
        raster.width(),
        raster.height(),
        new_width,
        new_height,
        block
    );

    RawRaster::new(new_width, new_height, raster.channels(), out)
}
