// ============================================================================
// ERRORS — one error type shared by the resampler, pixelizer, squarer and IO
// ============================================================================

use image::ImageError;

/// Error type for every fallible pixel-grid operation.
#[derive(Debug)]
pub enum PixelError {
    /// Non-positive dimensions, zero scale target, bad channel count, …
    InvalidArgument(String),
    /// A grid whose rows do not all share the first row's length.
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The image source could not be loaded or decoded.
    Decode(String),
    /// Encoding an export (PNG, JSON) failed.
    Encode(String),
    Io(std::io::Error),
}

impl std::fmt::Display for PixelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            PixelError::MalformedGrid { row, expected, found } => write!(
                f,
                "Malformed grid: row {} has {} cells, expected {}",
                row, found, expected
            ),
            PixelError::Decode(e) => write!(f, "Decode error: {}", e),
            PixelError::Encode(e) => write!(f, "Encode error: {}", e),
            PixelError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PixelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PixelError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PixelError {
    fn from(e: std::io::Error) -> Self {
        PixelError::Io(e)
    }
}

impl From<ImageError> for PixelError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::IoError(io) => PixelError::Io(io),
            ImageError::Encoding(enc) => PixelError::Encode(enc.to_string()),
            other => PixelError::Decode(other.to_string()),
        }
    }
}
