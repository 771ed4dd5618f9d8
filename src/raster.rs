// ============================================================================
// RAW RASTER — flat row-major byte buffer as handed over by the image decoder
// ============================================================================

use image::RgbaImage;

use crate::error::PixelError;

/// A decoded image: `width * height` pixels of `channels` bytes each,
/// stored row-major. Channel order is R,G,B,A when `channels == 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRaster {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl RawRaster {
    /// Wrap a byte buffer, checking that its length matches the dimensions.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, PixelError> {
        if channels == 0 {
            return Err(PixelError::InvalidArgument(
                "raster must have at least one channel".to_string(),
            ));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(PixelError::InvalidArgument(format!(
                "raster buffer holds {} bytes, expected {} ({}x{}x{})",
                data.len(),
                expected,
                width,
                height,
                channels
            )));
        }
        Ok(Self { width, height, channels, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Row-major channel bytes; always `width * height * channels` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes in one row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    /// Channel bytes of pixel `(x, y)`. Panics when out of range.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let pos = self.offset(x, y);
        &self.data[pos..pos + self.channels as usize]
    }

    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: 4,
            data: img.into_raw(),
        }
    }

    /// Convert back into an `RgbaImage`. Only 4-channel rasters qualify.
    pub fn into_rgba_image(self) -> Result<RgbaImage, PixelError> {
        if self.channels != 4 {
            return Err(PixelError::InvalidArgument(format!(
                "expected an RGBA raster, got {} channels",
                self.channels
            )));
        }
        let (w, h) = (self.width, self.height);
        RgbaImage::from_raw(w, h, self.data).ok_or_else(|| {
            PixelError::InvalidArgument(format!("raster buffer does not fit {}x{}", w, h))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_buffer_length_mismatch() {
        let err = RawRaster::new(2, 2, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(err, PixelError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_zero_channels() {
        assert!(RawRaster::new(0, 0, 0, Vec::new()).is_err());
    }

    #[test]
    fn short_buffer_never_becomes_a_raster() {
        // 4x4 RGBA needs 64 bytes; only the constructor can build a raster.
        let err = RawRaster::new(4, 4, 4, vec![0; 8]).unwrap_err();
        assert!(err.to_string().contains("expected 64"));
        let ok = RawRaster::new(4, 4, 4, vec![0; 64]).unwrap();
        assert_eq!(ok.data().len(), ok.stride() * ok.height() as usize);
    }

    #[test]
    fn pixel_reads_row_major() {
        let data: Vec<u8> = (0..24).collect();
        let raster = RawRaster::new(3, 2, 4, data).unwrap();
        assert_eq!(raster.stride(), 12);
        assert_eq!(raster.pixel(1, 1), &[16, 17, 18, 19]);
    }

    #[test]
    fn rgba_image_conversion_keeps_bytes() {
        let img = RgbaImage::from_pixel(2, 3, image::Rgba([9, 8, 7, 6]));
        let raster = RawRaster::from_rgba_image(img.clone());
        assert_eq!((raster.width(), raster.height(), raster.channels()), (2, 3, 4));
        assert_eq!(raster.into_rgba_image().unwrap(), img);
    }

    #[test]
    fn three_channel_raster_is_not_rgba() {
        let raster = RawRaster::new(1, 1, 3, vec![1, 2, 3]).unwrap();
        assert!(raster.into_rgba_image().is_err());
    }
}
