use crate::commands::{CmdMessage, CmdResult};
use crate::config::SlipConfig;
use crate::error::Result;
use crate::template::{write_package, Block, Document, Paragraph, Table};
use std::fs;
use std::path::Path;

/// Writes a default `slipgen.json` at `config_path`, and a starter template at
/// the configured template path when none exists yet. An existing config is left
/// alone unless `force` is set; an existing template is never touched.
pub fn run(config_path: &Path, force: bool) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut written = Vec::new();

    let config = if config_path.exists() && !force {
        result.add_message(CmdMessage::warning(format!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        )));
        SlipConfig::load(config_path)?
    } else {
        let config = SlipConfig::default();
        config.save(config_path)?;
        result.add_message(CmdMessage::success(format!(
            "Wrote config to {}",
            config_path.display()
        )));
        written.push(config_path.to_path_buf());
        config
    };

    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    let template_path = config.resolved_against(base).template_path;
    if template_path.exists() {
        result.add_message(CmdMessage::info(format!(
            "Using existing template {}",
            template_path.display()
        )));
    } else {
        if let Some(parent) = template_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_package(&starter_template(), &template_path)?;
        result.add_message(CmdMessage::success(format!(
            "Wrote starter template to {}",
            template_path.display()
        )));
        written.push(template_path);
    }

    Ok(result.with_config(config).with_written_paths(written))
}

/// A one-page slip with the usual placeholders, for editing in a word processor.
pub fn starter_template() -> Document {
    Document::new(vec![
        Block::Paragraph(Paragraph::text("Salary Slip")),
        Block::Paragraph(Paragraph::text("Employee: {Name}")),
        Block::Table(Table::from_texts(&[
            &["Basic", "{Basic}"],
            &["HRA", "{HRA}"],
            &["Deductions", "{Deductions}"],
            &["Net Pay", "{Net}"],
        ])),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::config::CONFIG_FILENAME;
    use crate::template::DocxPackage;

    #[test]
    fn test_init_writes_config_and_template() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);

        let result = run(&config_path, false).unwrap();

        assert!(config_path.exists());
        let template = dir.path().join("ssformat.docx");
        assert!(template.exists());
        assert_eq!(result.written_paths, vec![config_path.clone(), template.clone()]);
        assert_eq!(result.config, Some(SlipConfig::default()));

        let texts = DocxPackage::open(&template)
            .unwrap()
            .document()
            .unwrap()
            .paragraph_texts();
        assert_eq!(texts[0], "Salary Slip");
        assert!(texts.contains(&"{Net}".to_string()));
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, r#"{"sheet_id": "keep-me"}"#).unwrap();

        let result = run(&config_path, false).unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(result.config.unwrap().sheet_id, "keep-me");
        assert_eq!(SlipConfig::load(&config_path).unwrap().sheet_id, "keep-me");
    }

    #[test]
    fn test_kept_config_is_not_listed_as_written() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, r#"{"template_path": "forms/slip.docx"}"#).unwrap();

        let result = run(&config_path, false).unwrap();

        let template = dir.path().join("forms").join("slip.docx");
        assert!(template.is_file());
        assert_eq!(result.written_paths, vec![template]);
    }

    #[test]
    fn test_init_force_overwrites_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, r#"{"sheet_id": "old"}"#).unwrap();

        run(&config_path, true).unwrap();

        assert_eq!(SlipConfig::load(&config_path).unwrap(), SlipConfig::default());
    }

    #[test]
    fn test_init_never_replaces_template() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        let template = dir.path().join("ssformat.docx");
        fs::write(&template, b"user template").unwrap();

        let result = run(&config_path, true).unwrap();

        assert_eq!(fs::read(&template).unwrap(), b"user template");
        assert_eq!(result.written_paths, vec![config_path]);
    }
}
