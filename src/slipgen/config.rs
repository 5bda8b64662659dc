use crate::error::{Result, SlipError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "slipgen.json";

/// Keys accepted by [`SlipConfig::get`] and [`SlipConfig::set`], in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "sheet-id",
    "sheet-name",
    "credentials",
    "template",
    "output-dir",
    "name-field",
    "fallback-name",
    "converter",
    "csv",
];

/// Run configuration, stored as JSON in `slipgen.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlipConfig {
    /// Spreadsheet key, as found in the sheet's URL
    #[serde(default)]
    pub sheet_id: String,

    /// Tab to read
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Service-account key file
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Header whose value names the output files
    #[serde(default = "default_name_field")]
    pub name_field: String,

    /// Used when a record has no usable display name
    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,

    /// Office binary used for PDF conversion; looked up on PATH when unset
    #[serde(default)]
    pub converter: Option<PathBuf>,

    /// Read rows from this CSV file instead of the spreadsheet
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_template_path() -> PathBuf {
    PathBuf::from("ssformat.docx")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Salary_Slips")
}

fn default_name_field() -> String {
    "Name".to_string()
}

fn default_fallback_name() -> String {
    "Employee".to_string()
}

impl Default for SlipConfig {
    fn default() -> Self {
        Self {
            sheet_id: String::new(),
            sheet_name: default_sheet_name(),
            credentials_path: default_credentials_path(),
            template_path: default_template_path(),
            output_dir: default_output_dir(),
            name_field: default_name_field(),
            fallback_name: default_fallback_name(),
            converter: None,
            csv_path: None,
        }
    }
}

impl SlipConfig {
    /// Load config from the given file, or return defaults if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(SlipError::Io)?;
        let config: SlipConfig = serde_json::from_str(&content).map_err(SlipError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given file, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(SlipError::Io)?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(SlipError::Serialization)?;
        fs::write(path, content).map_err(SlipError::Io)?;
        Ok(())
    }

    /// Returns a copy with relative paths joined onto `base`. Paths in a config
    /// file are relative to the directory holding that file.
    pub fn resolved_against(&self, base: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_relative() {
                base.join(p)
            } else {
                p.clone()
            }
        };
        Self {
            credentials_path: join(&self.credentials_path),
            template_path: join(&self.template_path),
            output_dir: join(&self.output_dir),
            converter: self.converter.as_ref().map(|p| {
                // Bare program names are looked up on PATH, not joined.
                if p.components().count() > 1 {
                    join(p)
                } else {
                    p.clone()
                }
            }),
            csv_path: self.csv_path.as_ref().map(join),
            ..self.clone()
        }
    }

    /// Whether rows come from a local CSV file rather than the spreadsheet API.
    pub fn uses_csv(&self) -> bool {
        self.csv_path.is_some()
    }

    /// Checks everything a run needs before any row is fetched.
    pub fn validate(&self) -> Result<()> {
        if self.sheet_name.trim().is_empty() {
            return Err(SlipError::Config("sheet-name must not be empty".into()));
        }
        if self.name_field.trim().is_empty() {
            return Err(SlipError::Config("name-field must not be empty".into()));
        }
        if !self.template_path.is_file() {
            return Err(SlipError::Config(format!(
                "template not found: {}",
                self.template_path.display()
            )));
        }

        match &self.csv_path {
            Some(csv) => {
                if !csv.is_file() {
                    return Err(SlipError::Config(format!(
                        "CSV file not found: {}",
                        csv.display()
                    )));
                }
            }
            None => {
                if self.sheet_id.trim().is_empty() {
                    return Err(SlipError::Config(
                        "sheet-id is not set (use --sheet-id, `slipgen config sheet-id <id>`, or --csv)"
                            .into(),
                    ));
                }
                if !self.credentials_path.is_file() {
                    return Err(SlipError::Config(format!(
                        "credentials file not found: {}",
                        self.credentials_path.display()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Path| p.display().to_string();
        let optional = |p: &Option<PathBuf>| p.as_deref().map(path).unwrap_or_default();
        match key {
            "sheet-id" => Some(self.sheet_id.clone()),
            "sheet-name" => Some(self.sheet_name.clone()),
            "credentials" => Some(path(&self.credentials_path)),
            "template" => Some(path(&self.template_path)),
            "output-dir" => Some(path(&self.output_dir)),
            "name-field" => Some(self.name_field.clone()),
            "fallback-name" => Some(self.fallback_name.clone()),
            "converter" => Some(optional(&self.converter)),
            "csv" => Some(optional(&self.csv_path)),
            _ => None,
        }
    }

    /// Sets one key. An empty value clears the optional keys (`converter`, `csv`).
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let optional = |v: &str| {
            if v.is_empty() {
                None
            } else {
                Some(PathBuf::from(v))
            }
        };
        match key {
            "sheet-id" => self.sheet_id = value.to_string(),
            "sheet-name" => self.sheet_name = value.to_string(),
            "credentials" => self.credentials_path = PathBuf::from(value),
            "template" => self.template_path = PathBuf::from(value),
            "output-dir" => self.output_dir = PathBuf::from(value),
            "name-field" => self.name_field = value.to_string(),
            "fallback-name" => self.fallback_name = value.to_string(),
            "converter" => self.converter = optional(value),
            "csv" => self.csv_path = optional(value),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}
