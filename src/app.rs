// ============================================================================
// PIXELVIEW APP — desktop shell around the PixelView widget
// ============================================================================

use std::time::Duration;

use eframe::egui;
use egui::Color32;
use rfd::FileDialog;

use crate::canvas::{CellEvent, PixelEvent, PixelView};
use crate::color::format_rgba;
use crate::error::PixelError;
use crate::grid::PixelGrid;
use crate::io::{IMAGE_EXTENSIONS, ImageSource, PendingPixels, is_url, pixels_from_source};
use crate::ops::fit_square;
use crate::settings::ViewerSettings;

/// Upper bound of the width control.
const MAX_TARGET_WIDTH: u32 = 1024;

/// Poll interval while a background load is running.
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct PixelViewApp {
    settings: ViewerSettings,
    grid: PixelGrid,
    view: PixelView,

    // Async image load (one at a time; a new load replaces the old handle)
    pending: Option<PendingPixels>,
    source: Option<ImageSource>,
    url_input: String,

    // Editing
    brush_enabled: bool,
    brush_color: Color32,

    focused: Option<CellEvent>,
    status: String,
}

impl PixelViewApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_settings(ViewerSettings::load())
    }

    pub fn with_settings(settings: ViewerSettings) -> Self {
        let view = PixelView::new(&settings);
        Self {
            settings,
            grid: starter_sprite(),
            view,
            pending: None,
            source: None,
            url_input: String::new(),
            brush_enabled: false,
            brush_color: Color32::from_rgb(230, 60, 90),
            focused: None,
            status: "Ready".to_string(),
        }
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    fn start_load(&mut self, source: ImageSource) {
        self.status = format!("Loading {}…", source.describe());
        self.pending = Some(pixels_from_source(source.clone(), self.settings.scale_request()));
        self.source = Some(source);
    }

    /// Load whatever is typed in the URL box.
    fn open_url_input(&mut self) {
        let input = self.url_input.trim();
        if input.is_empty() {
            return;
        }
        if !is_url(input) {
            self.status = format!("Not a URL: {}", input);
            return;
        }
        let source = ImageSource::from_input(input);
        self.start_load(source);
    }

    /// Install a finished load. Failures leave the current grid untouched.
    fn apply_load_result(&mut self, result: Result<PixelGrid, PixelError>) {
        let loaded = result.and_then(|grid| {
            if self.settings.square_on_load {
                fit_square(&grid)
            } else {
                Ok(grid)
            }
        });
        match loaded {
            Ok(grid) => {
                self.status = format!("Loaded {}×{} grid", grid.cols(), grid.rows());
                crate::log_info!("{}", self.status);
                self.grid = grid;
                self.focused = None;
                self.view.invalidate();
            }
            Err(e) => {
                crate::log_err!("Failed to open image: {}", e);
                self.status = format!("Failed to open image: {}", e);
            }
        }
    }

    fn handle_events(&mut self, events: Vec<PixelEvent>) {
        for event in events {
            match event {
                PixelEvent::Focus(cell) => self.focused = Some(cell),
                PixelEvent::Blur(cell) => {
                    if self.focused.as_ref().is_some_and(|f| f.x == cell.x && f.y == cell.y) {
                        self.focused = None;
                    }
                }
                PixelEvent::Edit(cell) => {
                    self.status = format!("Painted ({}, {})", cell.x, cell.y);
                }
                PixelEvent::Save(bytes) => self.save_png(&bytes),
            }
        }
    }

    fn save_png(&mut self, bytes: &[u8]) {
        let Some(path) = FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("pixels.png")
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, bytes) {
            Ok(()) => self.status = format!("Saved {}", path.display()),
            Err(e) => {
                crate::log_err!("Failed to save {}: {}", path.display(), e);
                self.status = format!("Failed to save: {}", e);
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let before = self.settings.clone();

        ui.horizontal(|ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = FileDialog::new()
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .add_filter("All Files", &["*"])
                    .pick_file()
                {
                    self.start_load(ImageSource::Path(path));
                }
            }
            let url_box = ui.add(
                egui::TextEdit::singleline(&mut self.url_input)
                    .hint_text("https://…")
                    .desired_width(180.0),
            );
            let submitted = url_box.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Open URL").clicked() || submitted {
                self.open_url_input();
            }
            let can_reload = self.source.is_some() && self.pending.is_none();
            if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked()
                && let Some(source) = self.source.clone()
            {
                self.start_load(source);
            }

            ui.separator();
            ui.label("Width");
            ui.add(egui::DragValue::new(&mut self.settings.target_width).clamp_range(0..=MAX_TARGET_WIDTH))
                .on_hover_text("Columns to resample to on load (0 = original size)");
            ui.checkbox(&mut self.settings.square_on_load, "Square on load");
            if ui.button("Square now").clicked() {
                match fit_square(&self.grid) {
                    Ok(grid) => {
                        self.grid = grid;
                        self.view.invalidate();
                    }
                    Err(e) => self.status = e.to_string(),
                }
            }

            ui.separator();
            ui.checkbox(&mut self.settings.as_image, "As image");
            ui.checkbox(&mut self.settings.grid_shown, "Grid");

            ui.separator();
            ui.checkbox(&mut self.brush_enabled, "Brush");
            ui.color_edit_button_srgba(&mut self.brush_color);

            if self.pending.is_some() {
                ui.spinner();
            }
        });

        if self.settings != before {
            self.settings.save();
            self.view.apply_settings(&self.settings);
        }
        self.view.brush = self
            .brush_enabled
            .then(|| format_rgba(self.brush_color.to_srgba_unmultiplied()));
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("{}×{}", self.grid.cols(), self.grid.rows()));
            ui.separator();
            match &self.focused {
                Some(cell) => ui.label(format!("({}, {}) {}", cell.x, cell.y, cell.color)),
                None => ui.label("—"),
            };
            ui.separator();
            ui.label(&self.status);
        });
    }
}

impl eframe::App for PixelViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Poll async image load ---
        if let Some(pending) = self.pending.as_mut() {
            match pending.try_take() {
                Some(result) => {
                    self.pending = None;
                    self.apply_load_result(result);
                }
                None => ctx.request_repaint_after(LOAD_POLL_INTERVAL),
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                let events = self.view.show(ui, &mut self.grid);
                self.handle_events(events);
            });
        });
    }
}

/// The sprite shown before any image is opened.
pub fn starter_sprite() -> PixelGrid {
    const PATTERN: [&str; 8] = [
        "..##.##.", ".#RR#RR#", ".#RRRRR#", ".#RRRRR#", "..#RRR#.", "...#R#..", "....#...",
        "........",
    ];
    let rows = PATTERN
        .iter()
        .map(|line| {
            line.chars()
                .map(|c| match c {
                    '#' => format_rgba([40, 20, 30, 255]),
                    'R' => format_rgba([230, 60, 90, 255]),
                    _ => format_rgba([0, 0, 0, 0]),
                })
                .collect()
        })
        .collect();
    PixelGrid::from_rows(rows)
}
