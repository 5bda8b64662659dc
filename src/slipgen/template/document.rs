//! In-memory document tree.
//!
//! Only the parts of a word-processing document that placeholders can live in are
//! modelled: body paragraphs, and paragraphs inside the cells of top-level tables.
//! Everything else in the file (styles, headers, nested tables, drawings) is carried
//! through untouched by the package writer and never shows up here.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

/// A contiguous stretch of text sharing one set of formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// A paragraph holding a single run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![Run::new(text)])
    }

    /// The paragraph's visible text, runs joined.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

impl Table {
    /// Builds a table where every cell holds exactly one single-run paragraph.
    pub fn from_texts(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| TableRow {
                    cells: row
                        .iter()
                        .map(|text| TableCell {
                            paragraphs: vec![Paragraph::text(*text)],
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .flat_map(|cell| cell.paragraphs.iter())
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Every visited paragraph in document order, table cells included.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().flat_map(block_paragraphs)
    }

    /// Every run in document order. The package writer relies on this order
    /// matching the order runs appear in the XML.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.paragraphs().flat_map(|paragraph| paragraph.runs.iter())
    }

    /// Visible text of every paragraph, one entry per paragraph.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs().map(Paragraph::plain_text).collect()
    }
}

fn block_paragraphs(block: &Block) -> Box<dyn Iterator<Item = &Paragraph> + '_> {
    match block {
        Block::Paragraph(paragraph) => Box::new(std::iter::once(paragraph)),
        Block::Table(table) => Box::new(table.paragraphs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_follow_document_order() {
        let doc = Document::new(vec![
            Block::Paragraph(Paragraph::text("before")),
            Block::Table(Table::from_texts(&[&["a", "b"], &["c", "d"]])),
            Block::Paragraph(Paragraph::text("after")),
        ]);
        assert_eq!(doc.paragraph_texts(), vec!["before", "a", "b", "c", "d", "after"]);
    }

    #[test]
    fn test_plain_text_joins_runs() {
        let p = Paragraph::new(vec![Run::new("Dear "), Run::new("{Name}"), Run::new(",")]);
        assert_eq!(p.plain_text(), "Dear {Name},");
    }

    #[test]
    fn test_runs_flatten_across_blocks() {
        let doc = Document::new(vec![
            Block::Paragraph(Paragraph::new(vec![Run::new("x"), Run::new("y")])),
            Block::Table(Table::from_texts(&[&["z"]])),
        ]);
        let texts: Vec<_> = doc.runs().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "y", "z"]);
    }
}
