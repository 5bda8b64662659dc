use super::RowSource;
use crate::error::{Result, SlipError};
use crate::model::Table;

/// Serves a fixed table, or a fixed failure.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    outcome: std::result::Result<Table, String>,
}

impl InMemorySource {
    pub fn new(table: Table) -> Self {
        Self { outcome: Ok(table) }
    }

    /// A source whose every fetch fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

impl RowSource for InMemorySource {
    fn describe(&self) -> String {
        "in-memory table".to_string()
    }

    fn fetch(&self) -> Result<Table> {
        self.outcome.clone().map_err(SlipError::Fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_table() {
        let table = Table::from_strs(&[&["Name"], &["Alice"]]);
        assert_eq!(InMemorySource::new(table.clone()).fetch().unwrap(), table);
    }

    #[test]
    fn test_failing_source() {
        let err = InMemorySource::failing("boom").fetch().unwrap_err();
        assert!(matches!(err, SlipError::Fetch(msg) if msg == "boom"));
    }
}
