use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::error::{AromaError, Result};
use crate::sheet::SheetRef;

/// Deployment settings. Every field has a default, so an empty or missing
/// `config.toml` still yields a usable configuration once a sheet is given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sheet: SheetConfig,
    pub server: ServerConfig,
    pub view: ViewConfig,
    pub columns: ColumnsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Full browser URL of the sheet, e.g. `.../d/<id>/edit?gid=0#gid=0`.
    pub url: Option<String>,
    /// Spreadsheet id, used when `url` is not set.
    pub id: Option<String>,
    pub gid: String,
    pub timeout_seconds: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            url: None,
            id: None,
            gid: constants::DEFAULT_GID.to_string(),
            timeout_seconds: constants::DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl SheetConfig {
    pub fn sheet_ref(&self) -> Result<SheetRef> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return SheetRef::from_url(url);
        }
        match self.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Ok(SheetRef::new(id, &self.gid)),
            None => Err(AromaError::Config(
                "no sheet configured: set [sheet].url or [sheet].id".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: constants::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub order_tag: String,
    pub reorder_tag: String,
    pub perfume_section_anchor: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            order_tag: constants::ORDER_TAG.to_string(),
            reorder_tag: constants::REORDER_TAG.to_string(),
            perfume_section_anchor: constants::PERFUME_SECTION_ANCHOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub name_markers: Vec<String>,
    pub collected: String,
    pub remaining: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            name_markers: constants::NAME_MARKERS.iter().map(|m| m.to_string()).collect(),
            collected: constants::COLLECTED_HEADER.to_string(),
            remaining: constants::REMAINING_HEADER.to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AromaError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads the explicit path if given, otherwise `config.toml` when present,
    /// otherwise defaults. Environment overrides are applied last.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::read_file(p)?,
            None if Path::new(constants::DEFAULT_CONFIG_PATH).exists() => {
                Self::read_file(Path::new(constants::DEFAULT_CONFIG_PATH))?
            }
            None => {
                tracing::info!("No config file found, using defaults");
                Config::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `AROMA_SHEET_URL`, `AROMA_SHEET_ID`, `AROMA_SHEET_GID` and `PORT`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("AROMA_SHEET_URL") {
            self.sheet.url = Some(url);
        }
        if let Some(id) = lookup("AROMA_SHEET_ID") {
            self.sheet.id = Some(id);
            // An explicit id beats a url coming from the file
            if lookup("AROMA_SHEET_URL").is_none() {
                self.sheet.url = None;
            }
        }
        if let Some(gid) = lookup("AROMA_SHEET_GID") {
            self.sheet.gid = gid;
        }
        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    port = self.server.port,
                    "ignoring invalid PORT override"
                ),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns.name_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(AromaError::Config(
                "columns.name_markers must contain at least one marker".to_string(),
            ));
        }
        if self.sheet.timeout_seconds == 0 {
            return Err(AromaError::Config(
                "sheet.timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
