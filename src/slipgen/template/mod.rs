//! # Templates
//!
//! - [`document`]: the in-memory tree (paragraphs, tables, runs)
//! - [`render`]: placeholder substitution, a pure function over the tree
//! - [`docx`]: reading and writing `.docx` packages

pub mod document;
pub mod docx;
mod render;

pub use document::{Block, Document, Paragraph, Run, Table, TableCell, TableRow};
pub use docx::{write_package, DocxPackage};
pub use render::{fill_text, render};
