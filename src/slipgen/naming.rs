use crate::model::Record;

/// Suffix shared by both artifacts of one record.
pub const SLIP_SUFFIX: &str = "_Salary_Slip";

/// Derives the base file name for a record's artifacts.
///
/// Reads `name_field`, falling back to `fallback` when the record has no such field
/// or when nothing survives sanitizing. Two records with the same display name map
/// to the same base name.
pub fn name_for(record: &Record, name_field: &str, fallback: &str) -> String {
    let display = record.get(name_field).unwrap_or(fallback);
    let safe = sanitize(display);
    if safe.is_empty() {
        sanitize(fallback)
    } else {
        safe
    }
}

/// Keeps letters, digits, `_` and whitespace; then joins the whitespace-separated
/// words with a single `_`.
pub fn sanitize(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `<base>_Salary_Slip.<ext>`
pub fn artifact_file_name(base: &str, ext: &str) -> String {
    format!("{}{}.{}", base, SLIP_SUFFIX, ext.trim_start_matches('.'))
}
