// ============================================================================
// PIXEL OPERATIONS — resample, pixelize, square-fit and export
// ============================================================================

pub mod export;
pub mod pixelize;
pub mod resample;
pub mod square;

pub use export::{encode_png, grid_to_image, rasterize};
pub use pixelize::to_pixel_grid;
pub use resample::{MAX_OUTPUT_PIXELS, resample};
pub use square::fit_square;
