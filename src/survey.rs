use std::path::Path;

use crate::error::Error;
use crate::model::Report;

pub fn parse(path: &Path) -> Result<Report, Error> {
    let bytes = std::fs::read(path).map_err(|e| Error::io_at(e, path))?;
    parse_bytes(&bytes)
}

pub fn parse_bytes(input: &[u8]) -> Result<Report, Error> {
    // Tolerate a UTF-8 BOM, some spreadsheet exports write one.
    let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
    let report: Report = serde_json::from_slice(input)?;
    validate(&report)?;

    log::debug!(
        "Parsed survey \"{}\": {} categories, {} questions",
        report.title,
        report.categories.len(),
        report.node_count() - report.categories.len(),
    );
    Ok(report)
}

/// Percentages and benchmarks must lie in 0..=100. Out-of-range values are
/// rejected, never clamped.
pub fn validate(report: &Report) -> Result<(), Error> {
    for question in report.categories.iter().flat_map(|c| c.questions.iter()) {
        let values = std::iter::once(question.yes_percentage).chain(question.yes_benchmark);
        for value in values {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::InvalidPercentage {
                    question: question.text.clone(),
                    value,
                });
            }
        }
    }
    Ok(())
}
