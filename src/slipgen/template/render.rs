//! Placeholder substitution.
//!
//! A placeholder is the literal text `{Name}` where `Name` is a record key. It is
//! only recognised when the whole token sits inside one run: editors often split
//! text into several runs (spell-check marks, partial formatting), and a token
//! broken across runs is left as-is. Runs are never merged, since that would change
//! formatting boundaries in the output.

use super::document::{Block, Document, Paragraph, Run, Table, TableCell, TableRow};
use crate::model::Record;

/// Returns a filled copy of `template`. The template itself is not touched.
pub fn render(template: &Document, record: &Record) -> Document {
    Document {
        blocks: template
            .blocks
            .iter()
            .map(|block| render_block(block, record))
            .collect(),
    }
}

/// Substitutes every placeholder in one run's text.
///
/// Pairs are applied in record order and each replacement sees the text left by the
/// previous one.
pub fn fill_text(text: &str, record: &Record) -> String {
    let mut filled = text.to_string();
    for (name, value) in record.iter() {
        let token = format!("{{{}}}", name);
        if filled.contains(&token) {
            filled = filled.replace(&token, value);
        }
    }
    filled
}

fn render_block(block: &Block, record: &Record) -> Block {
    match block {
        Block::Paragraph(paragraph) => Block::Paragraph(render_paragraph(paragraph, record)),
        Block::Table(table) => Block::Table(render_table(table, record)),
    }
}

fn render_table(table: &Table, record: &Record) -> Table {
    Table {
        rows: table
            .rows
            .iter()
            .map(|row| TableRow {
                cells: row
                    .cells
                    .iter()
                    .map(|cell| TableCell {
                        paragraphs: cell
                            .paragraphs
                            .iter()
                            .map(|p| render_paragraph(p, record))
                            .collect(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn render_paragraph(paragraph: &Paragraph, record: &Record) -> Paragraph {
    Paragraph {
        runs: paragraph
            .runs
            .iter()
            .map(|run| Run {
                text: fill_text(&run.text, record),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        Record::from_pairs(pairs.iter().copied())
    }

    fn single_run(text: &str) -> Document {
        Document::new(vec![Block::Paragraph(Paragraph::text(text))])
    }

    #[test]
    fn test_exact_placeholder() {
        let out = render(&single_run("{Name}"), &record(&[("Name", "Alice")]));
        assert_eq!(out.paragraph_texts(), vec!["Alice"]);
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let out = render(&single_run("{Name} {Name}"), &record(&[("Name", "Bob")]));
        assert_eq!(out.paragraph_texts(), vec!["Bob Bob"]);
    }

    #[test]
    fn test_unknown_placeholder_survives() {
        let out = render(&single_run("{Unknown}"), &record(&[("Name", "Bob")]));
        assert_eq!(out.paragraph_texts(), vec!["{Unknown}"]);
    }

    #[test]
    fn test_split_placeholder_is_not_matched() {
        let template = Document::new(vec![Block::Paragraph(Paragraph::new(vec![
            Run::new("{Na"),
            Run::new("me}"),
        ]))]);
        let out = render(&template, &record(&[("Name", "Alice")]));
        let runs: Vec<_> = out.runs().map(|r| r.text.as_str()).collect();
        assert_eq!(runs, vec!["{Na", "me}"]);
    }

    #[test]
    fn test_table_cells_are_filled() {
        let template = Document::new(vec![Block::Table(Table::from_texts(&[
            &["Basic", "{Basic}"],
            &["HRA", "{HRA}"],
        ]))]);
        let out = render(&template, &record(&[("Basic", "1000"), ("HRA", "250")]));
        assert_eq!(out.paragraph_texts(), vec!["Basic", "1000", "HRA", "250"]);
    }

    #[test]
    fn test_multiple_placeholders_in_one_run() {
        let out = render(
            &single_run("Dear {Name}, your basic pay is {Basic}."),
            &record(&[("Name", "Alice"), ("Basic", "1000")]),
        );
        assert_eq!(out.paragraph_texts(), vec!["Dear Alice, your basic pay is 1000."]);
    }

    #[test]
    fn test_template_is_left_untouched() {
        let template = single_run("{Name}");
        let _ = render(&template, &record(&[("Name", "Alice")]));
        assert_eq!(template.paragraph_texts(), vec!["{Name}"]);
    }

    #[test]
    fn test_value_is_not_rescanned_for_earlier_keys() {
        // "Name" is applied first, so a later value containing "{Name}" stays literal.
        let text = fill_text("{Name}/{Alias}", &record(&[("Name", "A"), ("Alias", "{Name}")]));
        assert_eq!(text, "A/{Name}");
    }

    #[test]
    fn test_unterminated_brace_passes_through() {
        assert_eq!(fill_text("{Name", &record(&[("Name", "A")])), "{Name");
    }

    #[test]
    fn test_empty_record_changes_nothing() {
        assert_eq!(fill_text("{Name}", &Record::default()), "{Name}");
    }
}
