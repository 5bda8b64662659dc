//! # Slipgen Architecture
//!
//! Slipgen turns a table of employee pay data into one salary slip per row: a
//! `.docx` filled from a template, plus a PDF rendition. It is a library with a
//! CLI client, not the other way round.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, sets up logging, prints messages       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Generic over RowSource and Converter                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - The batch driver, init and config                        │
//! │  - Returns CmdResult with per-record outcomes and messages  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators                                              │
//! │  source/ (rows in), template/ (fill + persist .docx),       │
//! │  convert/ (.docx → .pdf), naming.rs (output file names)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Progress is reported through `CmdResult::messages` and `tracing`
//! events; the CLI decides what reaches the terminal.
//!
//! ## Per-Record Isolation
//!
//! A batch keeps going when one record fails. Fetch errors end the run with a
//! "no data" message, render and save errors skip the record, conversion errors
//! keep the `.docx`. Only setup problems (bad config, missing template, an output
//! directory that cannot be created) surface as `Err`.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests against `InMemorySource` and test converters.
//! 2. **Template**: tests of placeholder filling and the `.docx` reader/writer.
//! 3. **CLI**: end-to-end tests in `tests/`, driving the binary with a CSV source
//!    and `--no-pdf`.
//!
//! ## Module Overview
//!
//! - [`api`]: facade
//! - [`commands`]: generate, init, config
//! - [`config`]: `slipgen.json`
//! - [`convert`]: PDF conversion
//! - [`model`]: `Table` and `Record`
//! - [`naming`]: file-name sanitizing
//! - [`source`]: row sources
//! - [`template`]: document model, placeholder filling, `.docx` I/O

pub mod api;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod naming;
pub mod source;
pub mod template;
