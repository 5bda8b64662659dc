use super::Converter;
use crate::error::{Result, SlipError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Environment variable naming the office binary, checked after the config value.
pub const CONVERTER_ENV: &str = "SLIPGEN_CONVERTER";

#[cfg(target_os = "macos")]
const FALLBACKS: &[&str] = &[
    "soffice",
    "libreoffice",
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
];

#[cfg(target_os = "windows")]
const FALLBACKS: &[&str] = &[
    "soffice.exe",
    r"C:\Program Files\LibreOffice\program\soffice.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const FALLBACKS: &[&str] = &["soffice", "libreoffice"];

/// Converts documents with a headless office suite (LibreOffice or compatible):
/// `soffice --headless --convert-to pdf --outdir <dir> <source>`.
#[derive(Debug, Clone, Default)]
pub struct OfficeConverter {
    program: Option<PathBuf>,
}

impl OfficeConverter {
    /// `program` overrides discovery; `None` means look it up at conversion time.
    pub fn new(program: Option<PathBuf>) -> Self {
        Self { program }
    }

    /// Finds the office binary: explicit setting, then `$SLIPGEN_CONVERTER`, then
    /// the usual install names.
    pub fn locate(&self) -> Result<PathBuf> {
        if let Some(program) = &self.program {
            return Ok(program.clone());
        }

        if let Ok(program) = env::var(CONVERTER_ENV) {
            if !program.is_empty() {
                return Ok(PathBuf::from(program));
            }
        }

        for fallback in FALLBACKS {
            let candidate = Path::new(fallback);
            if candidate.is_absolute() {
                if candidate.is_file() {
                    return Ok(candidate.to_path_buf());
                }
            } else if on_path(fallback) {
                return Ok(candidate.to_path_buf());
            }
        }

        Err(SlipError::Convert(format!(
            "No office suite found for PDF conversion. Install LibreOffice or set ${}.",
            CONVERTER_ENV
        )))
    }
}

fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed previous output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SlipError::Convert(format!(
            "cannot replace {}: {}",
            path.display(),
            e
        ))),
    }
}

fn on_path(program: &str) -> bool {
    let finder = if cfg!(windows) { "where" } else { "which" };
    Command::new(finder)
        .arg(program)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

impl Converter for OfficeConverter {
    fn convert(&self, source: &Path, target: &Path) -> Result<()> {
        let program = self.locate()?;
        let out_dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let format = target
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("pdf");

        // The office suite names its output after the source file.
        let stem = source
            .file_stem()
            .ok_or_else(|| SlipError::Convert(format!("bad source path {}", source.display())))?;
        let produced = out_dir.join(stem).with_extension(format);

        if target == source || produced == source {
            return Err(SlipError::Convert(format!(
                "conversion would overwrite its source {}",
                source.display()
            )));
        }

        // A file left by an earlier run must not pass for this run's output.
        remove_stale(target)?;
        if produced != target {
            remove_stale(&produced)?;
        }

        debug!(program = %program.display(), source = %source.display(), "running converter");
        let output = Command::new(&program)
            .arg("--headless")
            .arg("--convert-to")
            .arg(format)
            .arg("--outdir")
            .arg(&out_dir)
            .arg(source)
            .output()
            .map_err(|e| {
                SlipError::Convert(format!(
                    "Failed to launch converter '{}': {}",
                    program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(SlipError::Convert(format!(
                "Converter '{}' exited with {}: {}",
                program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        if produced != target && produced.exists() {
            fs::rename(&produced, target)?;
        }

        if !target.exists() {
            return Err(SlipError::Convert(format!(
                "Converter finished but {} was not created",
                target.display()
            )));
        }
        Ok(())
    }
}
