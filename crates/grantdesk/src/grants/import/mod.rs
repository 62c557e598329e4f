mod parser;

pub use parser::CSV_HEADERS;

use chrono::NaiveDate;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use super::domain::{
    CallStatus, Currency, GrantDraft, GrantType, Order, RequirementStatus, UsmStatus,
};
use parser::CsvRow;

const COL_NAME: usize = 0;
const COL_ENTITY: usize = 1;
const COL_ORDER: usize = 2;
const COL_TYPE: usize = 3;
const COL_SECTOR: usize = 4;
const COL_COMPONENTS: usize = 5;
const COL_AMOUNT: usize = 6;
const COL_CURRENCY: usize = 7;
const COL_MEETS_REQUIREMENTS: usize = 8;
const COL_MISSING_REQUIREMENTS: usize = 9;
const COL_DEADLINE: usize = 10;
const COL_LINK: usize = 11;
const COL_CALL_STATUS: usize = 12;
const COL_USM_STATUS: usize = 13;

/// Failures that abort the whole import before row validation begins.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read CSV file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "CSV header does not match the expected columns: {}",
        CSV_HEADERS.join(",")
    )]
    SchemaMismatch,
}

/// Validation failures for a single data row. The row as a whole is
/// excluded; no field of it is imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based file line (the header occupies line 1).
    pub line: usize,
    pub problems: Vec<String>,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.line, self.problems.join(" "))
    }
}

/// Result of validating a whole file: the drafts that passed and the
/// per-row errors for those that did not.
#[derive(Debug)]
pub struct CsvImport {
    pub drafts: Vec<GrantDraft>,
    pub errors: Vec<RowError>,
}

/// Terminal states of an import run, reported to the user.
#[derive(Debug, PartialEq)]
pub enum ImportOutcome {
    /// Every row validated; `count` records were appended.
    Imported { count: usize },
    /// At least one row failed; nothing was committed, valid rows included.
    Rejected {
        errors: Vec<RowError>,
        valid_rows: usize,
    },
    /// Valid header but no data rows.
    Empty,
}

/// Parses and validates CSV text without touching any store. Pure except
/// for the reader.
pub fn read_import<R: Read>(reader: R) -> Result<CsvImport, ImportError> {
    let rows = parser::read_rows(reader)?;
    let mut drafts = Vec::new();
    let mut errors = Vec::new();

    for row in &rows {
        match validate_row(row) {
            Ok(draft) => drafts.push(draft),
            Err(problems) => errors.push(RowError {
                line: row.line,
                problems,
            }),
        }
    }

    Ok(CsvImport { drafts, errors })
}

pub fn read_import_from_path<P: AsRef<Path>>(path: P) -> Result<CsvImport, ImportError> {
    let file = File::open(path)?;
    read_import(file)
}

fn validate_row(row: &CsvRow) -> Result<GrantDraft, Vec<String>> {
    let mut problems = Vec::new();

    let name = row.cell(COL_NAME).to_string();
    if name.is_empty() {
        problems.push(empty_column("name"));
    }
    let entity = row.cell(COL_ENTITY).to_string();
    if entity.is_empty() {
        problems.push(empty_column("entity"));
    }

    let deadline_cell = row.cell(COL_DEADLINE);
    let mut deadline = None;
    if deadline_cell.is_empty() {
        problems.push(empty_column("deadline"));
    } else {
        match NaiveDate::parse_from_str(deadline_cell, "%Y-%m-%d") {
            Ok(date) => deadline = Some(date),
            Err(_) => problems.push(
                "column \"deadline\" has an invalid date format (use YYYY-MM-DD).".to_string(),
            ),
        }
    }

    // Empty amount defaults to 0 by contract; it is not an error.
    let amount_cell = row.cell(COL_AMOUNT);
    let mut amount = 0.0;
    if !amount_cell.is_empty() {
        match amount_cell.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => amount = value,
            Ok(_) => {
                problems.push("column \"amount\" must be a non-negative number.".to_string())
            }
            Err(_) => problems.push("column \"amount\" must be a valid number.".to_string()),
        }
    }

    let order = enum_cell::<Order>(row.cell(COL_ORDER), &mut problems);
    let grant_type = enum_cell::<GrantType>(row.cell(COL_TYPE), &mut problems);
    let currency = enum_cell::<Currency>(row.cell(COL_CURRENCY), &mut problems);
    let meets_requirements =
        enum_cell::<RequirementStatus>(row.cell(COL_MEETS_REQUIREMENTS), &mut problems);
    let call_status = enum_cell::<CallStatus>(row.cell(COL_CALL_STATUS), &mut problems);
    let usm_status = enum_cell::<UsmStatus>(row.cell(COL_USM_STATUS), &mut problems);

    match deadline {
        Some(deadline) if problems.is_empty() => Ok(GrantDraft {
            name,
            entity,
            order,
            grant_type,
            sector: row.cell(COL_SECTOR).to_string(),
            components: row.cell(COL_COMPONENTS).to_string(),
            amount,
            currency,
            meets_requirements,
            missing_requirements: row.cell(COL_MISSING_REQUIREMENTS).to_string(),
            deadline,
            link: row.cell(COL_LINK).to_string(),
            call_status,
            usm_status,
        }),
        _ => Err(problems),
    }
}

fn empty_column(column: &str) -> String {
    format!("column \"{column}\" must not be empty.")
}

/// Empty cells take the field's documented default; non-empty cells must
/// match one of the enum's labels.
fn enum_cell<T>(cell: &str, problems: &mut Vec<String>) -> T
where
    T: Default + FromStr,
    T::Err: fmt::Display,
{
    if cell.is_empty() {
        return T::default();
    }
    match cell.parse::<T>() {
        Ok(value) => value,
        Err(err) => {
            problems.push(err.to_string());
            T::default()
        }
    }
}
