use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;
use crate::palette::Palette;
use crate::placement::{GRID_ROWS, MAX_COLUMNS};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub page: PageSetup,
    pub fonts: FontConfig,
    pub palette: Palette,
    /// PNG or JPEG drawn above the title box. Skipped with a warning when unreadable.
    pub logo: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        self.page.validate()
    }
}

/// Page geometry in points.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub column_gap: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        // A3 landscape
        Self {
            width: 1190.5,
            height: 841.895,
            margin_x: 20.0,
            margin_y: 30.0,
            column_gap: 30.0,
        }
    }
}

impl PageSetup {
    pub fn cell_height(&self) -> f32 {
        (self.height - self.margin_y * 2.0) / GRID_ROWS as f32
    }

    /// The gap budget always covers the maximum column count, so fewer columns get wider.
    pub fn column_width(&self, total_columns: u32) -> f32 {
        (self.width - self.margin_x * 2.0 - self.column_gap * MAX_COLUMNS as f32)
            / total_columns.max(1) as f32
    }

    fn validate(&self) -> Result<(), Error> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::Config(format!(
                "page size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.margin_x < 0.0 || self.margin_y < 0.0 || self.column_gap < 0.0 {
            return Err(Error::Config("margins and column gap must not be negative".into()));
        }
        if self.column_width(MAX_COLUMNS) <= 0.0 || self.cell_height() <= 0.0 {
            return Err(Error::Config("margins leave no room for the grid".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Family for the title box.
    pub heading: String,
    /// Family for category names, questions, summary and legend.
    pub body: String,
    /// Searched before `SURVEY_PDF_FONTS` and the system font directories.
    pub dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            heading: "Futura Medium".into(),
            body: "Myriad Pro Bold".into(),
            dirs: vec![PathBuf::from("fonts")],
        }
    }
}

/// Load a JSON config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let config = match path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| Error::io_at(e, path))?;
            serde_json::from_slice::<Config>(&bytes)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?
        }
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}
