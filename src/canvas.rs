// ============================================================================
// PIXEL VIEW — egui widget that draws a pixel grid on a backing texture
// ============================================================================
//
// The grid is rasterized on the CPU into a texture whose resolution tracks
// `density × displayed size` through `AutoResize`. Pointer input is mapped to
// cells with `get_coord`; hover changes come out as focus/blur events, brush
// strokes edit the grid in place, and the context menu exports a PNG.

use std::time::{Duration, Instant};

use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2};

use crate::coords::{PointerSample, SurfaceRect, get_coord};
use crate::grid::{GridCoord, PixelGrid};
use crate::ops::{encode_png, grid_to_image, rasterize};
use crate::settings::ViewerSettings;
use crate::surface::{AutoResize, Surface};

/// Cell-size threshold (screen px) below which the grid overlay is hidden.
const MIN_GRID_CELL_PX: f32 = 4.0;

/// A cell the pointer or brush interacted with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellEvent {
    pub x: usize,
    pub y: usize,
    pub color: String,
}

/// What the view reports back to its owner after each frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PixelEvent {
    /// Pointer entered a cell.
    Focus(CellEvent),
    /// Pointer left a cell.
    Blur(CellEvent),
    /// The brush painted a cell (`color` is the new value).
    Edit(CellEvent),
    /// User asked to save; PNG bytes, one pixel per cell.
    Save(Vec<u8>),
}

/// Displayed/backing sizes of the view's texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WidgetSurface {
    pub displayed: (u32, u32),
    pub backing: (u32, u32),
}

impl Surface for WidgetSurface {
    fn displayed_size(&self) -> (u32, u32) {
        self.displayed
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
    }
}

pub struct PixelView {
    /// Plain-image mode: no overlay, no interaction.
    pub as_image: bool,
    pub grid_shown: bool,
    /// Color written by primary-button strokes; `None` disables editing.
    pub brush: Option<String>,
    density: u32,
    resize_window: Duration,
    surface: WidgetSurface,
    auto_resize: Option<AutoResize>,
    texture: Option<TextureHandle>,
    needs_render: bool,
    hovered: Option<GridCoord>,
    last_dims: (usize, usize),
}

impl PixelView {
    pub fn new(settings: &ViewerSettings) -> Self {
        Self {
            as_image: settings.as_image,
            grid_shown: settings.grid_shown,
            brush: None,
            density: settings.density.max(1),
            resize_window: settings.resize_window(),
            surface: WidgetSurface::default(),
            auto_resize: None,
            texture: None,
            needs_render: true,
            hovered: None,
            last_dims: (0, 0),
        }
    }

    /// Pick up changed settings. A new density re-attaches the fitter.
    pub fn apply_settings(&mut self, settings: &ViewerSettings) {
        self.as_image = settings.as_image;
        self.grid_shown = settings.grid_shown;
        let density = settings.density.max(1);
        if density != self.density || settings.resize_window() != self.resize_window {
            self.density = density;
            self.resize_window = settings.resize_window();
            if let Some(auto) = self.auto_resize.take() {
                auto.dispose();
            }
        }
    }

    /// Force a re-render on the next frame (call after replacing the grid).
    pub fn invalidate(&mut self) {
        self.needs_render = true;
    }

    pub fn surface(&self) -> WidgetSurface {
        self.surface
    }

    pub fn hovered(&self) -> Option<GridCoord> {
        self.hovered
    }

    /// Lay out, draw and handle input for one frame.
    pub fn show(&mut self, ui: &mut egui::Ui, grid: &mut PixelGrid) -> Vec<PixelEvent> {
        let mut events = Vec::new();
        let dims = (grid.cols(), grid.rows());
        if dims != self.last_dims {
            self.last_dims = dims;
            self.needs_render = true;
        }

        let size = fit_size(ui.available_size(), dims.0, dims.1);
        let sense = if self.as_image { Sense::hover() } else { Sense::click_and_drag() };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if let Some(wait) = self.track_surface(rect, Instant::now()) {
            ui.ctx().request_repaint_after(wait);
        }

        if self.as_image {
            events.extend(hover_transition(grid, self.hovered.take(), None));
        } else {
            let bounds = SurfaceRect::new(rect.left(), rect.top(), rect.width(), rect.height());
            let touch = ui.input(|i| i.any_touches());
            let hovered = response
                .hover_pos()
                .map(|pos| {
                    let sample = if touch {
                        PointerSample::Touch { x: pos.x, y: pos.y }
                    } else {
                        PointerSample::Mouse { x: pos.x, y: pos.y }
                    };
                    get_coord(sample, bounds, dims.0, dims.1)
                })
                .filter(|c| grid.contains(*c));

            events.extend(hover_transition(grid, self.hovered, hovered));
            self.hovered = hovered;

            let painting = response.is_pointer_button_down_on() && ui.input(|i| i.pointer.primary_down());
            if painting {
                if let (Some(brush), Some(cell)) = (&self.brush, hovered) {
                    if let Some(edit) = paint_cell(grid, cell, brush) {
                        self.needs_render = true;
                        events.push(PixelEvent::Edit(edit));
                    }
                }
            }
        }

        if self.needs_render {
            self.upload(ui.ctx(), grid);
        }

        let painter = ui.painter_at(rect);
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
        if self.grid_shown && !self.as_image {
            draw_cell_grid(&painter, rect, dims.0, dims.1);
        }

        if !self.as_image {
            let mut save_requested = false;
            let _ = response.context_menu(|ui| {
                if ui.button("Save image").clicked() {
                    save_requested = true;
                    ui.close_menu();
                }
            });
            if save_requested {
                match grid_to_image(grid, 1).and_then(|img| encode_png(&img)) {
                    Ok(bytes) => events.push(PixelEvent::Save(bytes)),
                    Err(e) => crate::log_err!("Could not export grid: {}", e),
                }
            }
        }

        events
    }

    /// Feed the current on-screen size to the fitter. Returns how long until
    /// a pending trailing fit is due.
    fn track_surface(&mut self, rect: Rect, now: Instant) -> Option<Duration> {
        let displayed = (rect.width().round() as u32, rect.height().round() as u32);
        let Self {
            surface,
            auto_resize,
            needs_render,
            density,
            resize_window,
            ..
        } = self;
        let mut render = |_: &mut WidgetSurface| *needs_render = true;

        if let Some(auto) = auto_resize.as_mut() {
            if surface.displayed != displayed {
                surface.displayed = displayed;
                auto.notify_resize(now, surface, &mut render);
            }
            return auto.poll(now, surface, &mut render);
        }

        surface.displayed = displayed;
        *auto_resize = Some(AutoResize::attach(surface, *density, *resize_window, &mut render));
        None
    }

    fn upload(&mut self, ctx: &egui::Context, grid: &PixelGrid) {
        self.needs_render = false;
        let (w, h) = self.surface.backing;
        if w == 0 || h == 0 || grid.is_empty() {
            self.texture = None;
            return;
        }
        match rasterize(grid, w, h) {
            Ok(img) => {
                let image = ColorImage::from_rgba_unmultiplied([w as usize, h as usize], img.as_raw());
                match &mut self.texture {
                    Some(texture) => texture.set(image, TextureOptions::NEAREST),
                    None => {
                        self.texture = Some(ctx.load_texture("pixelview-surface", image, TextureOptions::NEAREST));
                    }
                }
            }
            Err(e) => {
                crate::log_warn!("Cannot render grid: {}", e);
                self.texture = None;
            }
        }
    }
}

/// Largest size with square cells that fits in `available`.
pub fn fit_size(available: Vec2, cols: usize, rows: usize) -> Vec2 {
    if cols == 0 || rows == 0 {
        return Vec2::ZERO;
    }
    let cell = (available.x / cols as f32).min(available.y / rows as f32).max(0.0);
    Vec2::new(cell * cols as f32, cell * rows as f32)
}

/// Blur for the cell being left, then focus for the cell being entered.
pub fn hover_transition(
    grid: &PixelGrid,
    prev: Option<GridCoord>,
    next: Option<GridCoord>,
) -> Vec<PixelEvent> {
    let mut events = Vec::new();
    if prev == next {
        return events;
    }
    if let Some(cell) = prev.and_then(|c| cell_event(grid, c)) {
        events.push(PixelEvent::Blur(cell));
    }
    if let Some(cell) = next.and_then(|c| cell_event(grid, c)) {
        events.push(PixelEvent::Focus(cell));
    }
    events
}

fn cell_event(grid: &PixelGrid, coord: GridCoord) -> Option<CellEvent> {
    let color = grid.get_at(coord)?.to_string();
    Some(CellEvent {
        x: coord.x as usize,
        y: coord.y as usize,
        color,
    })
}

/// Write `brush` into a cell. `None` when the cell is missing or unchanged.
pub fn paint_cell(grid: &mut PixelGrid, coord: GridCoord, brush: &str) -> Option<CellEvent> {
    if grid.get_at(coord)? == brush {
        return None;
    }
    let (x, y) = (coord.x as usize, coord.y as usize);
    grid.set(x, y, brush);
    Some(CellEvent {
        x,
        y,
        color: brush.to_string(),
    })
}

/// Cell borders, drawn black-outline + white-center so they show on any color.
fn draw_cell_grid(painter: &egui::Painter, rect: Rect, cols: usize, rows: usize) {
    if cols == 0 || rows == 0 {
        return;
    }
    let cell_w = rect.width() / cols as f32;
    let cell_h = rect.height() / rows as f32;
    if cell_w.min(cell_h) < MIN_GRID_CELL_PX {
        return;
    }

    let outline = (1.2, Color32::from_black_alpha(90));
    let center = (0.6, Color32::from_white_alpha(100));

    for x in 0..=cols {
        let sx = rect.min.x + x as f32 * cell_w;
        let seg = [Pos2::new(sx, rect.min.y), Pos2::new(sx, rect.max.y)];
        painter.line_segment(seg, outline);
        painter.line_segment(seg, center);
    }
    for y in 0..=rows {
        let sy = rect.min.y + y as f32 * cell_h;
        let seg = [Pos2::new(rect.min.x, sy), Pos2::new(rect.max.x, sy)];
        painter.line_segment(seg, outline);
        painter.line_segment(seg, center);
    }
}
