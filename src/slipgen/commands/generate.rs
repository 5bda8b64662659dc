//! The batch run: fetch rows, then for each record fill the template, save the
//! `.docx`, check it landed, and convert it.
//!
//! ```text
//! FetchPending ──error──────────────▶ FetchFailed   ("no data", nothing written)
//!      │
//!      └──ok──▶ no data rows ───────▶ Done          ("no data", nothing written)
//!               data rows ──────────▶ ProcessingRows ──▶ Done
//! ```
//!
//! Records are handled one at a time, in file order. A record that fails to
//! render, save or convert is reported and the next record still runs; only
//! failing to create the output directory stops the run.

use super::{CmdMessage, CmdResult, SlipOutcome, SlipStatus};
use crate::config::SlipConfig;
use crate::convert::Converter;
use crate::error::Result;
use crate::model::Record;
use crate::naming::{artifact_file_name, name_for};
use crate::source::RowSource;
use crate::template::{render, DocxPackage};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Extension of the filled template.
pub const EDITABLE_EXT: &str = "docx";

pub const NO_DATA: &str = "No data fetched from the row source.";

pub fn run<R: RowSource, C: Converter>(
    source: &R,
    converter: &C,
    config: &SlipConfig,
) -> Result<CmdResult> {
    run_with(source, converter, config, fill_and_save)
}

/// `run` with the fill-and-save step passed in.
fn run_with<R, C, S>(source: &R, converter: &C, config: &SlipConfig, save: S) -> Result<CmdResult>
where
    R: RowSource,
    C: Converter,
    S: Fn(&Path, &Record, &Path) -> Result<()>,
{
    fs::create_dir_all(&config.output_dir)?;
    let mut result = CmdResult::default();

    let table = match source.fetch() {
        Ok(table) => table,
        Err(e) => {
            error!(source = %source.describe(), error = %e, "fetch failed");
            result.add_message(CmdMessage::error(format!(
                "An error occurred while fetching rows: {}",
                e
            )));
            result.add_message(CmdMessage::warning(NO_DATA));
            return Ok(result);
        }
    };

    if table.has_no_data() {
        info!(source = %source.describe(), "no data rows");
        result.add_message(CmdMessage::warning(NO_DATA));
        return Ok(result);
    }

    if !converter.enabled() {
        result.add_message(CmdMessage::info(
            "PDF conversion is off; writing .docx files only.",
        ));
    }

    for record in table.records() {
        let outcome = generate_slip(&record, converter, config, &save, &mut result);
        result
            .written_paths
            .extend(outcome.editable.iter().chain(outcome.fixed.iter()).cloned());
        result.slips.push(outcome);
    }

    let total = result.slips.len();
    let saved = result.saved_count();
    let summary = if converter.enabled() {
        format!(
            "Generated {} of {} salary slips ({} converted).",
            saved,
            total,
            result.complete_count()
        )
    } else {
        format!("Generated {} of {} salary slips.", saved, total)
    };
    result.add_message(if saved == total {
        CmdMessage::success(summary)
    } else {
        CmdMessage::warning(summary)
    });
    Ok(result)
}

fn generate_slip<C, S>(
    record: &Record,
    converter: &C,
    config: &SlipConfig,
    save: &S,
    result: &mut CmdResult,
) -> SlipOutcome
where
    C: Converter,
    S: Fn(&Path, &Record, &Path) -> Result<()>,
{
    let display_name = record
        .get(&config.name_field)
        .unwrap_or(&config.fallback_name)
        .to_string();
    let base_name = name_for(record, &config.name_field, &config.fallback_name);
    let editable = config
        .output_dir
        .join(artifact_file_name(&base_name, EDITABLE_EXT));

    let mut outcome = SlipOutcome {
        display_name,
        base_name,
        editable: None,
        fixed: None,
        status: SlipStatus::Missing,
    };

    if let Err(e) = save(&config.template_path, record, &editable) {
        warn!(name = %outcome.display_name, error = %e, "could not save slip");
        result.add_message(CmdMessage::error(format!(
            "Could not save salary slip for {}: {}",
            outcome.display_name, e
        )));
        outcome.status = SlipStatus::SaveFailed(e.to_string());
        return outcome;
    }

    if !editable.exists() {
        warn!(path = %editable.display(), "saved slip is missing");
        result.add_message(CmdMessage::error(format!(
            "Error: .{} file not found after saving at {}",
            EDITABLE_EXT,
            editable.display()
        )));
        return outcome;
    }

    result.add_message(CmdMessage::success(format!(
        "Salary slip saved for {} at {}",
        outcome.display_name,
        editable.display()
    )));
    outcome.editable = Some(editable.clone());

    if !converter.enabled() {
        outcome.status = SlipStatus::SavedOnly;
        return outcome;
    }

    let fixed = config
        .output_dir
        .join(artifact_file_name(&outcome.base_name, converter.target_ext()));
    debug!(source = %editable.display(), target = %fixed.display(), "converting");
    match converter.convert(&editable, &fixed) {
        Ok(()) => {
            result.add_message(CmdMessage::success(format!(
                "PDF successfully created at {}",
                fixed.display()
            )));
            outcome.fixed = Some(fixed);
            outcome.status = SlipStatus::Complete;
        }
        Err(e) => {
            warn!(source = %editable.display(), error = %e, "conversion failed");
            result.add_message(CmdMessage::error(format!(
                "Error converting to PDF for {}: {}",
                editable.display(),
                e
            )));
            outcome.status = SlipStatus::ConversionFailed(e.to_string());
        }
    }
    outcome
}

/// Opens the template fresh, fills it, and saves it to `target`. The file is
/// flushed and closed before this returns.
fn fill_and_save(template_path: &Path, record: &Record, target: &Path) -> Result<()> {
    let package = DocxPackage::open(template_path)?;
    let template = package.document()?;
    let filled = render(&template, record);
    package.save(&filled, target)
}
