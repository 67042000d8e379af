use std::fs::File;
use std::path::{Path, PathBuf};

use egui::Pos2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::charts::{GAP_CHART, LAP_CHART};
use crate::errors::LapChartError;
use crate::format::LapTimeFormat;
use crate::palette::{ColorPool, PaletteColor, default_palette};

const CONFIG_DIR_NAME: &str = "lapgraph";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_PLOT_HEIGHT: f32 = 260.;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WindowPosition {
    pub x: f32,
    pub y: f32,
}

impl From<WindowPosition> for Pos2 {
    fn from(value: WindowPosition) -> Self {
        Pos2::new(value.x, value.y)
    }
}

impl From<Pos2> for WindowPosition {
    fn from(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub show_lap_micros: bool,
    pub always_show_minutes: bool,
    pub palette: Vec<PaletteColor>,
    /// Charts to show, in display order
    pub charts: Vec<String>,
    pub plot_height: f32,
    pub window_position: WindowPosition,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_lap_micros: true,
            always_show_minutes: false,
            palette: default_palette(),
            charts: vec![LAP_CHART.to_string(), GAP_CHART.to_string()],
            plot_height: DEFAULT_PLOT_HEIGHT,
            window_position: WindowPosition::default(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf, LapChartError> {
        Ok(dirs::config_dir()
            .ok_or(LapChartError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    pub fn from_local_file() -> Result<Option<Self>, LapChartError> {
        Self::from_path(&Self::default_path()?)
    }

    pub fn from_path(config_path: &Path) -> Result<Option<Self>, LapChartError> {
        if !config_path.exists() {
            debug!("No config file at {:?}", config_path);
            return Ok(None);
        }

        let file =
            File::open(config_path).map_err(|e| LapChartError::ConfigIOError { source: e })?;
        let config = serde_json::from_reader(file)
            .map_err(|e| LapChartError::ConfigSerializeError { source: e })?;
        Ok(Some(config))
    }

    pub fn save(&self) -> Result<(), LapChartError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), LapChartError> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| LapChartError::ConfigIOError { source: e })?;
        }

        let file =
            File::create(config_path).map_err(|e| LapChartError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| LapChartError::ConfigSerializeError { source: e })
    }

    pub fn lap_time_format(&self) -> LapTimeFormat {
        LapTimeFormat {
            include_micros: self.show_lap_micros,
            always_show_minutes: self.always_show_minutes,
        }
    }

    pub fn color_pool(&self) -> ColorPool {
        ColorPool::new(self.palette.clone())
    }

    /// Remembers where the window sits so the next launch opens it there.
    /// Returns whether the stored position changed.
    pub fn track_window_position(&mut self, outer_min: Option<Pos2>) -> bool {
        let Some(outer_min) = outer_min else {
            return false;
        };
        let position = WindowPosition::from(outer_min);
        if position == self.window_position {
            return false;
        }
        self.window_position = position;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = AppConfig {
            show_lap_micros: false,
            charts: vec![GAP_CHART.to_string()],
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::from_path(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.color_pool().size(), 10);
    }

    #[test]
    fn test_window_position_is_tracked_and_saved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();

        assert!(!config.track_window_position(None));
        assert!(config.track_window_position(Some(Pos2::new(120., 48.))));
        assert!(!config.track_window_position(Some(Pos2::new(120., 48.))));
        config.save_to(&path).unwrap();

        let loaded = AppConfig::from_path(&path).unwrap().unwrap();
        assert_eq!(
            loaded.window_position,
            WindowPosition { x: 120., y: 48. }
        );
        assert_eq!(Pos2::from(loaded.window_position), Pos2::new(120., 48.));
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(
            AppConfig::from_path(&temp_dir.path().join(CONFIG_FILE_NAME))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"always_show_minutes": true}"#).unwrap();

        let loaded = AppConfig::from_path(&path).unwrap().unwrap();
        assert!(loaded.always_show_minutes);
        assert!(loaded.show_lap_micros);
        assert_eq!(loaded.charts, vec![LAP_CHART, GAP_CHART]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            AppConfig::from_path(&path),
            Err(LapChartError::ConfigSerializeError { .. })
        ));
    }
}
