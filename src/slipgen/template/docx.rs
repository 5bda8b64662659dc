//! Word-processing (`.docx`) packages.
//!
//! A `.docx` file is a zip archive; the body text lives in `word/document.xml`.
//! [`DocxPackage`] keeps every part of the archive in memory so that a filled copy
//! can be written back with everything except the body XML byte-for-byte intact.
//!
//! ## Mapping XML to the tree
//!
//! ```text
//! w:body
//! ├── w:p                 body paragraph
//! │   └── w:r             run
//! │       ├── w:t         run text (several w:t are concatenated)
//! │       ├── w:tab       "\t"
//! │       └── w:br, w:cr  "\n" (page and column breaks are not text)
//! └── w:tbl               top-level table
//!     └── w:tr / w:tc
//!         └── w:p         cell paragraph
//! ```
//!
//! Only direct children are followed. Paragraphs inside nested tables, content
//! controls or text boxes are not part of the tree and are written back unchanged.
//!
//! When writing, runs are matched to the tree by position, so the tree handed to
//! [`DocxPackage::write_to`] must be the one parsed from this package (or a
//! rendering of it). A changed run has its text elements (`w:t`, `w:tab`, `w:br`,
//! `w:cr`) replaced, at the position of the first one, by elements rebuilt from
//! the new text, so text stays on the same side of every tab and break. Formatting
//! (`w:rPr`) and other run children are left alone.

use super::document::{Block, Document, Paragraph, Run, Table, TableCell, TableRow};
use crate::error::{Result, SlipError};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCUMENT_PART: &str = "word/document.xml";

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// All parts of one `.docx` archive, in archive order.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    parts: Vec<Part>,
}

impl DocxPackage {
    /// Reads a package from disk. Every call reads the file afresh.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SlipError::Template(format!("cannot open template {}: {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            parts.push(Part {
                name: entry.name().to_string(),
                data,
                compression: entry.compression(),
                is_dir: entry.is_dir(),
            });
        }

        let package = Self { parts };
        if package.part(DOCUMENT_PART).is_none() {
            return Err(SlipError::Template(format!(
                "not a word-processing document: missing {}",
                DOCUMENT_PART
            )));
        }
        Ok(package)
    }

    /// Builds a minimal package whose body is `document`.
    pub fn from_document(document: &Document) -> Self {
        let part = |name: &str, data: Vec<u8>| Part {
            name: name.to_string(),
            data,
            compression: CompressionMethod::Deflated,
            is_dir: false,
        };
        Self {
            parts: vec![
                part("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
                part("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec()),
                part(DOCUMENT_PART, document_xml(document).into_bytes()),
            ],
        }
    }

    /// Parses the body into a [`Document`] tree.
    pub fn document(&self) -> Result<Document> {
        parse_document(self.document_xml()?)
    }

    /// Writes a copy of the package with the body text taken from `filled`.
    pub fn write_to<W: Write + Seek>(&self, filled: &Document, writer: W) -> Result<W> {
        let body = rewrite_document(self.document_xml()?, filled)?;
        let mut zip = ZipWriter::new(writer);
        for part in &self.parts {
            let options = SimpleFileOptions::default().compression_method(writable(part.compression));
            if part.is_dir {
                zip.add_directory(part.name.as_str(), options)?;
                continue;
            }
            zip.start_file(part.name.as_str(), options)?;
            if part.name == DOCUMENT_PART {
                zip.write_all(body.as_bytes())?;
            } else {
                zip.write_all(&part.data)?;
            }
        }
        Ok(zip.finish()?)
    }

    /// Writes the filled package to `path` and makes sure it is on disk before
    /// returning: the file is flushed, synced and closed when this returns `Ok`.
    pub fn save<P: AsRef<Path>>(&self, filled: &Document, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut file = self.write_to(filled, file)?;
        file.flush()?;
        file.sync_all()?;
        debug!(path = %path.display(), "document written");
        Ok(())
    }

    fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.name == name)
    }

    fn document_xml(&self) -> Result<&str> {
        let part = self.part(DOCUMENT_PART).ok_or_else(|| {
            SlipError::Template(format!("missing {}", DOCUMENT_PART))
        })?;
        std::str::from_utf8(&part.data)
            .map_err(|e| SlipError::Template(format!("{} is not UTF-8: {}", DOCUMENT_PART, e)))
    }
}

/// Writes a new minimal `.docx` containing `document` to `path`.
pub fn write_package<P: AsRef<Path>>(document: &Document, path: P) -> Result<()> {
    DocxPackage::from_document(document).save(document, path)
}

fn writable(method: CompressionMethod) -> CompressionMethod {
    if method == CompressionMethod::Stored {
        CompressionMethod::Stored
    } else {
        CompressionMethod::Deflated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Body,
    Table,
    Row,
    Cell,
    Paragraph,
    Run,
    Text,
    Tab,
    Break,
    Other,
}

impl Tag {
    /// Run children that carry text.
    fn is_content(self) -> bool {
        matches!(self, Tag::Text | Tag::Tab | Tag::Break)
    }
}

/// Tracks where the reader is in the element tree. Parsing and rewriting both
/// walk the XML through this, so they agree on which runs exist and their order.
#[derive(Debug, Default)]
struct Nesting {
    stack: Vec<Tag>,
}

impl Nesting {
    fn classify(&self, element: &BytesStart) -> Tag {
        let parent = self.stack.last().copied();
        match (element.name().as_ref(), parent) {
            (b"w:body", _) => Tag::Body,
            (b"w:tbl", Some(Tag::Body)) => Tag::Table,
            (b"w:tr", Some(Tag::Table)) => Tag::Row,
            (b"w:tc", Some(Tag::Row)) => Tag::Cell,
            (b"w:p", Some(Tag::Body | Tag::Cell)) => Tag::Paragraph,
            (b"w:r", Some(Tag::Paragraph)) => Tag::Run,
            (b"w:t", Some(Tag::Run)) => Tag::Text,
            (b"w:tab", Some(Tag::Run)) => Tag::Tab,
            (b"w:cr", Some(Tag::Run)) => Tag::Break,
            (b"w:br", Some(Tag::Run)) if is_line_break(element) => Tag::Break,
            _ => Tag::Other,
        }
    }

    fn enter(&mut self, element: &BytesStart) -> Tag {
        let tag = self.classify(element);
        self.stack.push(tag);
        tag
    }

    fn leave(&mut self) -> Option<Tag> {
        self.stack.pop()
    }

    fn in_text(&self) -> bool {
        self.stack.last() == Some(&Tag::Text)
    }
}

/// `w:br` without a type, or with `textWrapping`, is a line break.
fn is_line_break(element: &BytesStart) -> bool {
    match element.try_get_attribute("w:type") {
        Ok(Some(kind)) => kind.value.as_ref() == b"textWrapping",
        Ok(None) => true,
        Err(_) => false,
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    blocks: Vec<Block>,
    table: Option<Table>,
    paragraph: Option<Paragraph>,
    run: Option<Run>,
}

impl TreeBuilder {
    fn open(&mut self, tag: Tag) {
        match tag {
            Tag::Table => self.table = Some(Table::default()),
            Tag::Row => {
                if let Some(table) = self.table.as_mut() {
                    table.rows.push(TableRow::default());
                }
            }
            Tag::Cell => {
                if let Some(row) = self.table.as_mut().and_then(|t| t.rows.last_mut()) {
                    row.cells.push(TableCell::default());
                }
            }
            Tag::Paragraph => self.paragraph = Some(Paragraph::default()),
            Tag::Run => self.run = Some(Run::default()),
            Tag::Tab => self.push_text("\t"),
            Tag::Break => self.push_text("\n"),
            Tag::Body | Tag::Text | Tag::Other => {}
        }
    }

    fn close(&mut self, tag: Tag) {
        match tag {
            Tag::Run => {
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.runs.push(run);
                }
            }
            Tag::Paragraph => {
                if let Some(paragraph) = self.paragraph.take() {
                    let cell = self
                        .table
                        .as_mut()
                        .and_then(|t| t.rows.last_mut())
                        .and_then(|r| r.cells.last_mut());
                    match cell {
                        Some(cell) => cell.paragraphs.push(paragraph),
                        None => self.blocks.push(Block::Paragraph(paragraph)),
                    }
                }
            }
            Tag::Table => {
                if let Some(table) = self.table.take() {
                    self.blocks.push(Block::Table(table));
                }
            }
            Tag::Body | Tag::Row | Tag::Cell | Tag::Text | Tag::Tab | Tag::Break | Tag::Other => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }
}

/// Parses `word/document.xml` into the tree.
pub fn parse_document(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut nesting = Nesting::default();
    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = nesting.enter(&e);
                builder.open(tag);
            }
            Event::Empty(e) => {
                let tag = nesting.enter(&e);
                nesting.leave();
                builder.open(tag);
                builder.close(tag);
            }
            Event::End(_) => {
                if let Some(tag) = nesting.leave() {
                    builder.close(tag);
                }
            }
            Event::Text(text) if nesting.in_text() => {
                let text = text
                    .unescape()
                    .map_err(|e| SlipError::Template(format!("bad text in document: {}", e)))?;
                builder.push_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Document::new(builder.blocks))
}

/// Re-emits `xml` with run texts taken from `filled`.
pub fn rewrite_document(xml: &str, filled: &Document) -> Result<String> {
    let template = parse_document(xml)?;
    let before: Vec<&str> = template.runs().map(|r| r.text.as_str()).collect();
    let after: Vec<&str> = filled.runs().map(|r| r.text.as_str()).collect();
    if before.len() != after.len() {
        return Err(SlipError::Template(format!(
            "filled document has {} runs but its template has {}",
            after.len(),
            before.len()
        )));
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut nesting = Nesting::default();

    let mut next_run = 0usize;
    // Replacement text for the run being written, if it changed.
    let mut replacement: Option<&str> = None;
    let mut replacement_written = false;
    // Inside a text element of a changed run; its events are dropped.
    let mut skipping = false;

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(e) => match nesting.enter(&e) {
                Tag::Run => {
                    replacement = changed_text(&before, &after, next_run);
                    replacement_written = false;
                    next_run += 1;
                    writer.write_event(Event::Start(e))?;
                }
                tag if tag.is_content() && replacement.is_some() => {
                    if !replacement_written {
                        write_run_content(&mut writer, replacement.unwrap_or_default())?;
                        replacement_written = true;
                    }
                    skipping = true;
                }
                _ if skipping => {}
                _ => writer.write_event(Event::Start(e))?,
            },
            Event::Empty(e) => {
                let tag = nesting.enter(&e);
                nesting.leave();
                match tag {
                    Tag::Run => {
                        next_run += 1;
                        writer.write_event(Event::Empty(e))?;
                    }
                    tag if tag.is_content() && replacement.is_some() => {
                        if !replacement_written {
                            write_run_content(&mut writer, replacement.unwrap_or_default())?;
                            replacement_written = true;
                        }
                    }
                    _ if skipping => {}
                    _ => writer.write_event(Event::Empty(e))?,
                }
            }
            Event::End(e) => match nesting.leave() {
                Some(tag) if tag.is_content() && skipping => skipping = false,
                Some(Tag::Run) => {
                    replacement = None;
                    writer.write_event(Event::End(e))?;
                }
                _ if skipping => {}
                _ => writer.write_event(Event::End(e))?,
            },
            Event::Eof => break,
            other => {
                if !skipping {
                    writer.write_event(other)?;
                }
            }
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| SlipError::Template(format!("rewritten document is not UTF-8: {}", e)))
}

fn changed_text<'a>(before: &[&str], after: &[&'a str], index: usize) -> Option<&'a str> {
    match (before.get(index), after.get(index)) {
        (Some(old), Some(new)) if old != new => Some(*new),
        _ => None,
    }
}

fn preserved_text_start() -> BytesStart<'static> {
    BytesStart::new("w:t").with_attributes([("xml:space", "preserve")])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Tab,
    Break,
}

/// Splits run text at tabs and line breaks. Empty text pieces are dropped.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(|c: char| c == '\t' || c == '\n') {
        if pos > 0 {
            out.push(Segment::Text(&rest[..pos]));
        }
        out.push(if rest.as_bytes()[pos] == b'\t' {
            Segment::Tab
        } else {
            Segment::Break
        });
        rest = &rest[pos + 1..];
    }
    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}

fn write_run_content<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    for segment in segments(text) {
        match segment {
            Segment::Text(text) => {
                let start = preserved_text_start();
                let end = start.to_end().into_owned();
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(end))?;
            }
            Segment::Tab => writer.write_event(Event::Empty(BytesStart::new("w:tab")))?,
            Segment::Break => writer.write_event(Event::Empty(BytesStart::new("w:br")))?,
        }
    }
    Ok(())
}

/// Serialises a tree into a complete `word/document.xml`.
pub fn document_xml(document: &Document) -> String {
    let mut body = String::new();
    for block in &document.blocks {
        match block {
            Block::Paragraph(paragraph) => push_paragraph(&mut body, paragraph),
            Block::Table(table) => {
                body.push_str("<w:tbl>");
                for row in &table.rows {
                    body.push_str("<w:tr>");
                    for cell in &row.cells {
                        body.push_str("<w:tc>");
                        for paragraph in &cell.paragraphs {
                            push_paragraph(&mut body, paragraph);
                        }
                        body.push_str("</w:tc>");
                    }
                    body.push_str("</w:tr>");
                }
                body.push_str("</w:tbl>");
            }
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
        WORDML_NS, body
    )
}

fn push_paragraph(out: &mut String, paragraph: &Paragraph) {
    out.push_str("<w:p>");
    for run in &paragraph.runs {
        out.push_str("<w:r>");
        for segment in segments(&run.text) {
            match segment {
                Segment::Text(text) => {
                    out.push_str(r#"<w:t xml:space="preserve">"#);
                    out.push_str(&escape(text));
                    out.push_str("</w:t>");
                }
                Segment::Tab => out.push_str("<w:tab/>"),
                Segment::Break => out.push_str("<w:br/>"),
            }
        }
        out.push_str("</w:r>");
    }
    out.push_str("</w:p>");
}
