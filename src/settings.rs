//! Player preferences and board sizing
//!
//! Persisted in LocalStorage, separately from personal bests.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CELL_SIZE, MIN_CELL_SIZE};
use crate::sim::GridLayout;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Desired cell edge in pixels
    pub cell_size: u32,
    /// Cells never shrink below this edge
    pub min_cell_size: u32,
    /// Share of the viewport width given to the board
    pub viewport_width_fraction: f32,
    /// Share of the viewport height given to the board
    pub viewport_height_fraction: f32,
    /// Upper bound for either surface dimension
    pub max_surface_px: u32,

    // === Visuals ===
    pub show_grid_lines: bool,

    // === Accessibility ===
    /// High contrast palette
    pub high_contrast: bool,

    // === Backend ===
    /// Base URL handed to HTTP transports
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            min_cell_size: MIN_CELL_SIZE,
            viewport_width_fraction: 0.8,
            viewport_height_fraction: 0.75,
            max_surface_px: 800,

            show_grid_lines: true,

            high_contrast: false,

            api_url: "http://localhost:8000".to_string(),
        }
    }
}

impl Settings {
    /// Surface available to the board inside a viewport of `w`x`h` pixels
    pub fn surface_for_viewport(&self, w: u32, h: u32) -> (u32, u32) {
        let fit = |px: u32, fraction: f32| {
            let share = (px as f32 * fraction.clamp(0.0, 1.0)).floor() as u32;
            share.min(self.max_surface_px)
        };
        (
            fit(w, self.viewport_width_fraction),
            fit(h, self.viewport_height_fraction),
        )
    }

    /// Grid layout for a viewport
    pub fn layout_for_viewport(&self, w: u32, h: u32) -> GridLayout {
        let (sw, sh) = self.surface_for_viewport(w, h);
        GridLayout::fit(sw, sh, self.cell_size, self.min_cell_size)
    }

    /// Flip the visual preference bound to `key` ("h" contrast, "g" grid
    /// lines). Returns false for any other key.
    pub fn toggle_for_key(&mut self, key: &str) -> bool {
        match key {
            "h" | "H" => self.high_contrast = !self.high_contrast,
            "g" | "G" => self.show_grid_lines = !self.show_grid_lines,
            _ => return false,
        }
        true
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "snake_grid_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {}", err),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Grid;

    #[test]
    fn test_surface_fractions_and_cap() {
        let settings = Settings::default();
        assert_eq!(settings.surface_for_viewport(800, 640), (640, 480));
        assert_eq!(settings.surface_for_viewport(1920, 1080), (800, 800));
    }

    #[test]
    fn test_layout_for_viewport() {
        let layout = Settings::default().layout_for_viewport(800, 640);
        assert_eq!(layout.grid, Grid::new(32, 24));
        assert_eq!(layout.cell_size, 20);
    }

    #[test]
    fn test_toggle_keys() {
        let mut settings = Settings::default();
        assert!(settings.toggle_for_key("h"));
        assert!(settings.high_contrast);
        assert!(settings.toggle_for_key("G"));
        assert!(!settings.show_grid_lines);
        assert!(settings.toggle_for_key("H"));
        assert!(!settings.high_contrast);

        assert!(!settings.toggle_for_key("x"));
        assert_eq!(
            settings,
            Settings {
                show_grid_lines: false,
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"cell_size":25,"high_contrast":true}"#).unwrap();
        assert_eq!(settings.cell_size, 25);
        assert!(settings.high_contrast);
        assert_eq!(settings.min_cell_size, MIN_CELL_SIZE);
        assert_eq!(settings.api_url, "http://localhost:8000");
    }
}
