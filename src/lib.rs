//! Pixel-art viewer/editor core.
//!
//! Turns decoded images into grids of `rgba(r, g, b, a)` cells (with optional
//! box-averaging downscale), squares grids, maps pointer positions to cells
//! and keeps a drawing surface's backing resolution in step with its on-screen
//! size. `PixelView` is the egui widget built on top; `app` and `cli` are the
//! desktop and headless front ends used by the binary.

pub mod logger;

pub mod app;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod coords;
pub mod error;
pub mod grid;
pub mod io;
pub mod ops;
pub mod raster;
pub mod settings;
pub mod surface;

pub use canvas::{CellEvent, PixelEvent, PixelView};
pub use coords::{PointerSample, SurfaceRect, get_coord};
pub use error::PixelError;
pub use grid::{GridCoord, PixelGrid};
pub use io::{ImageSource, PendingPixels, load_pixels_sync, pixels_from_source};
pub use ops::{fit_square, resample, to_pixel_grid};
pub use raster::RawRaster;
pub use settings::ViewerSettings;
pub use surface::{AutoResize, Surface, fit_surface};
