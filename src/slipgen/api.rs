//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! slipgen operation, whatever UI drives it.
//!
//! The facade dispatches to `commands/*.rs` and returns `Result<CmdResult>`. It
//! does no printing and holds no business logic.
//!
//! ## Generic Over Sources and Converters
//!
//! `SlipApi<R: RowSource, C: Converter>` is generic over where rows come from and
//! how documents are converted:
//! - Production: `SlipApi<Box<dyn RowSource>, Box<dyn Converter>>`, picked from config
//! - Testing: `SlipApi<InMemorySource, SkipConverter>` or a recording converter
//!
//! `init` and `config` only touch the config file, so they are free functions.

use crate::commands;
use crate::config::SlipConfig;
use crate::convert::Converter;
use crate::error::Result;
use crate::source::RowSource;
use std::path::Path;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, SlipOutcome, SlipStatus};

/// Runs batches against one row source, converter and configuration.
pub struct SlipApi<R: RowSource, C: Converter> {
    source: R,
    converter: C,
    config: SlipConfig,
}

impl<R: RowSource, C: Converter> SlipApi<R, C> {
    pub fn new(source: R, converter: C, config: SlipConfig) -> Self {
        Self {
            source,
            converter,
            config,
        }
    }

    pub fn config(&self) -> &SlipConfig {
        &self.config
    }

    /// Generates one slip per data row.
    pub fn generate(&self) -> Result<CmdResult> {
        commands::generate::run(&self.source, &self.converter, &self.config)
    }
}

pub fn init(config_path: &Path, force: bool) -> Result<CmdResult> {
    commands::init::run(config_path, force)
}

pub fn config(config_path: &Path, action: ConfigAction) -> Result<CmdResult> {
    commands::config::run(config_path, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::SkipConverter;
    use crate::model::Table;
    use crate::source::memory::InMemorySource;
    use crate::template::write_package;

    #[test]
    fn test_generate_dispatches_with_config() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("t.docx");
        write_package(&commands::init::starter_template(), &template_path).unwrap();
        let config = SlipConfig {
            template_path,
            output_dir: dir.path().join("out"),
            ..SlipConfig::default()
        };
        let source = InMemorySource::new(Table::from_strs(&[&["Name"], &["Dana"]]));

        let api = SlipApi::new(source, SkipConverter, config);
        let result = api.generate().unwrap();

        assert_eq!(result.slips.len(), 1);
        assert_eq!(result.slips[0].status, SlipStatus::SavedOnly);
        assert!(api.config().output_dir.join("Dana_Salary_Slip.docx").exists());
    }

    #[test]
    fn test_boxed_parts_work_through_facade() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlipConfig {
            output_dir: dir.path().join("out"),
            ..SlipConfig::default()
        };
        let source: Box<dyn RowSource> = Box::new(InMemorySource::failing("offline"));
        let converter: Box<dyn Converter> = Box::new(SkipConverter);

        let result = SlipApi::new(source, converter, config).generate().unwrap();
        assert!(result.slips.is_empty());
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Error && m.content.contains("offline")));
    }

    #[test]
    fn test_config_and_init_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slipgen.json");

        init(&path, false).unwrap();
        let result = config(&path, ConfigAction::ShowKey("sheet-name".into())).unwrap();
        assert_eq!(result.messages[0].content, "Sheet1");
    }
}
