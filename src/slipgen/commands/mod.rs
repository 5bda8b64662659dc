use crate::config::SlipConfig;
use std::path::PathBuf;

pub mod config;
pub mod generate;
pub mod init;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// How far one record got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlipStatus {
    /// Both artifacts written.
    Complete,
    /// Editable document written; conversion was switched off.
    SavedOnly,
    /// Editable document written; conversion failed.
    ConversionFailed(String),
    /// Rendering or saving failed; no artifact for this record.
    SaveFailed(String),
    /// The save reported success but the file is not on disk.
    Missing,
}

/// Per-record result of a generate run. The two paths are independent: either can
/// be present without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlipOutcome {
    pub display_name: String,
    pub base_name: String,
    pub editable: Option<PathBuf>,
    pub fixed: Option<PathBuf>,
    pub status: SlipStatus,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub slips: Vec<SlipOutcome>,
    pub written_paths: Vec<PathBuf>,
    pub config: Option<SlipConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_config(mut self, config: SlipConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_written_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.written_paths = paths;
        self
    }

    /// Records whose editable document is on disk.
    pub fn saved_count(&self) -> usize {
        self.slips.iter().filter(|s| s.editable.is_some()).count()
    }

    /// Records with both artifacts on disk.
    pub fn complete_count(&self) -> usize {
        self.slips
            .iter()
            .filter(|s| s.status == SlipStatus::Complete)
            .count()
    }
}
