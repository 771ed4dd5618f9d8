// ============================================================================
// VIEWER SETTINGS — persisted as key=value lines in the platform config dir
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::surface::{DEFAULT_DENSITY, DEFAULT_RESIZE_WINDOW};

/// Viewer settings that persist across sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSettings {
    /// Draw the grid as a plain image (no overlay, no interaction).
    pub as_image: bool,
    /// Draw cell borders over the grid.
    pub grid_shown: bool,
    /// Backing pixels per displayed pixel.
    pub density: u32,
    /// Debounce window for surface resizes.
    pub resize_debounce_ms: u64,
    /// Column count to resample loaded images to (0 = keep source width).
    pub target_width: u32,
    /// Square-fit grids right after loading.
    pub square_on_load: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            as_image: false,
            grid_shown: true,
            density: DEFAULT_DENSITY,
            resize_debounce_ms: DEFAULT_RESIZE_WINDOW.as_millis() as u64,
            target_width: 0,
            square_on_load: false,
        }
    }
}

impl ViewerSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/pixelview/pixelview_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\pixelview\pixelview_settings.cfg
    /// On macOS:   ~/Library/Application Support/pixelview/pixelview_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        let config_dir = PathBuf::from(std::env::var("APPDATA").ok()?).join("pixelview");
        #[cfg(target_os = "macos")]
        let config_dir = PathBuf::from(std::env::var("HOME").ok()?)
            .join("Library")
            .join("Application Support")
            .join("pixelview");
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok()?
            .join("pixelview");

        Some(config_dir.join("pixelview_settings.cfg"))
    }

    /// Target width as a loader scale request.
    pub fn scale_request(&self) -> Option<u32> {
        (self.target_width > 0).then_some(self.target_width)
    }

    pub fn resize_window(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Render settings as `key=value` lines.
    pub fn to_config_string(&self) -> String {
        format!(
            "as_image={}\n\
             grid_shown={}\n\
             density={}\n\
             resize_debounce_ms={}\n\
             target_width={}\n\
             square_on_load={}\n",
            self.as_image,
            self.grid_shown,
            self.density,
            self.resize_debounce_ms,
            self.target_width,
            self.square_on_load,
        )
    }

    /// Parse `key=value` lines. Unknown keys are ignored; bad values keep
    /// their default and are logged.
    pub fn from_config_str(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "as_image" => parse_into(key, val, &mut s.as_image),
                "grid_shown" => parse_into(key, val, &mut s.grid_shown),
                "density" => parse_into(key, val, &mut s.density),
                "resize_debounce_ms" => parse_into(key, val, &mut s.resize_debounce_ms),
                "target_width" => parse_into(key, val, &mut s.target_width),
                "square_on_load" => parse_into(key, val, &mut s.square_on_load),
                _ => {}
            }
        }
        if s.density == 0 {
            crate::log_warn!("Settings: density 0 is not usable, using 1");
            s.density = 1;
        }
        s
    }

    /// Load settings from disk (defaults if the file is missing).
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_config_str(&content),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&path, self.to_config_string()) {
            crate::log_warn!("Could not save settings to {}: {}", path.display(), e);
        }
    }
}

fn parse_into<T: std::str::FromStr>(key: &str, val: &str, slot: &mut T) {
    match val.parse::<T>() {
        Ok(v) => *slot = v,
        Err(_) => crate::log_warn!("Settings: ignoring invalid value {:?} for {}", val, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer_conventions() {
        let s = ViewerSettings::default();
        assert_eq!(s.density, 2);
        assert_eq!(s.resize_window(), Duration::from_millis(300));
        assert_eq!(s.scale_request(), None);
        assert!(s.grid_shown);
        assert!(!s.as_image);
    }

    #[test]
    fn config_string_round_trips() {
        let s = ViewerSettings {
            as_image: true,
            grid_shown: false,
            density: 3,
            resize_debounce_ms: 150,
            target_width: 32,
            square_on_load: true,
        };
        assert_eq!(ViewerSettings::from_config_str(&s.to_config_string()), s);
        assert_eq!(s.scale_request(), Some(32));
    }

    #[test]
    fn bad_and_unknown_lines_fall_back_to_defaults() {
        let s = ViewerSettings::from_config_str(
            "# comment\ndensity=lots\nmystery=1\nno equals sign\ngrid_shown = false\n",
        );
        assert_eq!(s.density, 2);
        assert!(!s.grid_shown);
    }

    #[test]
    fn zero_density_is_coerced() {
        assert_eq!(ViewerSettings::from_config_str("density=0").density, 1);
    }
}
