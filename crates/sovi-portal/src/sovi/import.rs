use std::io::Read;

use super::domain::{IndicatorSubmission, IndicatorValues};

/// Error raised while parsing a survey export.
#[derive(Debug, thiserror::Error)]
pub enum CsvImportError {
    #[error("failed to read survey csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: column {column} is not numeric: '{value}'")]
    InvalidNumber {
        row: u64,
        column: String,
        value: String,
    },
    #[error("row {row}: missing required column {column}")]
    MissingField { row: u64, column: &'static str },
}

/// Parse a survey export CSV into submissions for `bulk_submit`.
///
/// Expects `districtId` and `year` columns plus any subset of the survey
/// indicator codes as headers. Blank cells are absent indicators; columns
/// with unrecognized headers (district names, notes) are ignored.
pub fn parse_submissions<R: Read>(reader: R) -> Result<Vec<IndicatorSubmission>, CsvImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut submissions = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let row_number = index as u64 + 2; // header occupies row 1
        let record = result?;

        let mut district_id: Option<i64> = None;
        let mut year: Option<i32> = None;
        let mut indicators = IndicatorValues::default();

        for (column, field) in headers.iter().zip(record.iter()) {
            if field.is_empty() {
                continue;
            }
            match column {
                "districtId" => {
                    district_id =
                        Some(parse_number(field, column, row_number)?.round() as i64);
                }
                "year" => {
                    year = Some(parse_number(field, column, row_number)?.round() as i32);
                }
                code => {
                    let value = parse_number(field, code, row_number)?;
                    indicators.set(code, value);
                }
            }
        }

        submissions.push(IndicatorSubmission {
            district_id: district_id.ok_or(CsvImportError::MissingField {
                row: row_number,
                column: "districtId",
            })?,
            year: year.ok_or(CsvImportError::MissingField {
                row: row_number,
                column: "year",
            })?,
            indicators,
        });
    }

    Ok(submissions)
}

fn parse_number(field: &str, column: &str, row: u64) -> Result<f64, CsvImportError> {
    field.parse::<f64>().map_err(|_| CsvImportError::InvalidNumber {
        row,
        column: column.to_string(),
        value: field.to_string(),
    })
}
