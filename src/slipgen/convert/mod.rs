//! # Format Converters
//!
//! A converter turns a saved editable document into its fixed-layout rendition.
//! The driver only sees the [`Converter`] trait; which tool does the work is chosen
//! when the CLI builds its context.
//!
//! - [`office::OfficeConverter`]: a headless office suite run as a child process
//! - [`SkipConverter`]: produces nothing, for runs that only want the `.docx` files
//!
//! The driver guarantees `source` exists and has been flushed to disk before
//! `convert` is called. A failed conversion never removes the source.

use crate::error::Result;
use std::path::Path;

pub mod office;

pub trait Converter {
    /// Extension of the files this converter produces, without the dot.
    fn target_ext(&self) -> &str {
        "pdf"
    }

    /// Whether this converter produces anything at all.
    fn enabled(&self) -> bool {
        true
    }

    /// Writes the fixed-layout rendition of `source` to `target`.
    fn convert(&self, source: &Path, target: &Path) -> Result<()>;
}

impl<T: Converter + ?Sized> Converter for Box<T> {
    fn target_ext(&self) -> &str {
        (**self).target_ext()
    }

    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn convert(&self, source: &Path, target: &Path) -> Result<()> {
        (**self).convert(source, target)
    }
}

/// Leaves the editable document as the only artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipConverter;

impl Converter for SkipConverter {
    fn enabled(&self) -> bool {
        false
    }

    fn convert(&self, _source: &Path, _target: &Path) -> Result<()> {
        Ok(())
    }
}
