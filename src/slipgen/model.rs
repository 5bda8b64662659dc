//! Tabular input and the per-row record built from it.
//!
//! A [`Table`] is what every row source hands back: row 0 is the header row, every
//! following row is one employee. A [`Record`] pairs the header with one data row
//! position by position and is what the renderer and the namer consume.

/// Ordered rows of string cells. Row 0, when present, is the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Builds a table from string slices, mostly useful in tests.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        )
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// True when there is nothing to generate: no rows at all, or a header only.
    pub fn has_no_data(&self) -> bool {
        self.data_rows().is_empty()
    }

    /// One record per data row, in file order.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        let header = self.header().unwrap_or(&[]);
        self.data_rows()
            .iter()
            .map(move |row| Record::from_row(header, row))
    }
}

/// Header name to cell value, in header order.
///
/// Pairing stops at the shorter of the two rows, so a short data row leaves its
/// trailing headers unmapped. A repeated header keeps its first position and takes
/// the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        let mut record = Self::default();
        for (name, value) in header.iter().zip(row) {
            record.insert(name.clone(), value.clone());
        }
        record
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut record = Self::default();
        for (name, value) in pairs {
            record.insert(name.into(), value.into());
        }
        record
    }

    pub fn insert(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_header_and_data_rows() {
        let table = Table::from_strs(&[&["Name", "Basic"], &["Alice", "1000"], &["Bob", "2000"]]);
        assert_eq!(table.header().unwrap(), strings(&["Name", "Basic"]).as_slice());
        assert_eq!(table.data_rows().len(), 2);
        assert!(!table.has_no_data());
    }

    #[test]
    fn test_empty_and_header_only_tables_have_no_data() {
        assert!(Table::default().has_no_data());
        assert!(Table::from_strs(&[&["Name"]]).has_no_data());
        assert_eq!(Table::from_strs(&[&["Name"]]).records().count(), 0);
    }

    #[test]
    fn test_records_pair_positionally() {
        let table = Table::from_strs(&[&["Name", "Basic"], &["Alice", "1000"]]);
        let record = table.records().next().unwrap();
        assert_eq!(record.get("Name"), Some("Alice"));
        assert_eq!(record.get("Basic"), Some("1000"));
    }

    #[test]
    fn test_short_row_leaves_trailing_headers_unmapped() {
        let record = Record::from_row(&strings(&["Name", "Basic", "HRA"]), &strings(&["Alice"]));
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("Basic"), None);
    }

    #[test]
    fn test_long_row_ignores_extra_cells() {
        let record = Record::from_row(&strings(&["Name"]), &strings(&["Alice", "stray"]));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_duplicate_headers_collide() {
        let record = Record::from_row(
            &strings(&["Name", "Basic", "Name"]),
            &strings(&["Alice", "1000", "Alicia"]),
        );
        let names: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Name", "Basic"]);
        assert_eq!(record.get("Name"), Some("Alicia"));
    }
}
