use std::io::Read;

use super::ImportError;

/// Ordered header schema the first line must match exactly.
pub const CSV_HEADERS: [&str; 14] = [
    "name",
    "entity",
    "order",
    "type",
    "sector",
    "components",
    "amount",
    "currency",
    "meetsRequirements",
    "missingRequirements",
    "deadline",
    "link",
    "callStatus",
    "usmStatus",
];

/// One data row, positionally addressed. Missing trailing cells read as
/// empty; surplus cells are ignored, matching the template's column count.
#[derive(Debug)]
pub(crate) struct CsvRow {
    /// 1-based line number in the file, header included.
    pub(crate) line: usize,
    cells: Vec<String>,
}

impl CsvRow {
    pub(crate) fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

pub(crate) fn read_rows<R: Read>(reader: R) -> Result<Vec<CsvRow>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    if headers.iter().collect::<Vec<_>>() != CSV_HEADERS {
        return Err(ImportError::SchemaMismatch);
    }

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(index + 2);
        rows.push(CsvRow {
            line,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn exact_header_is_accepted_and_rows_carry_line_numbers() {
        let csv = format!("{}\nAlpha,Org,,,,,,,,,2025-01-01,,,\n", CSV_HEADERS.join(","));
        let rows = read_rows(Cursor::new(csv)).expect("parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].cell(0), "Alpha");
        assert_eq!(rows[0].cell(10), "2025-01-01");
        assert_eq!(rows[0].cell(13), "");
    }

    #[test]
    fn reordered_header_is_a_schema_mismatch() {
        let csv = "entity,name,order,type,sector,components,amount,currency,\
meetsRequirements,missingRequirements,deadline,link,callStatus,usmStatus\n";
        match read_rows(Cursor::new(csv)) {
            Err(ImportError::SchemaMismatch) => {}
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn truncated_header_is_a_schema_mismatch() {
        match read_rows(Cursor::new("name,entity,order\n")) {
            Err(ImportError::SchemaMismatch) => {}
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn quoted_cells_may_contain_commas() {
        let csv = format!(
            "{}\n\"Fund, The Big One\",Org,,,,,,,,,2025-01-01,,,\n",
            CSV_HEADERS.join(",")
        );
        let rows = read_rows(Cursor::new(csv)).expect("parse");
        assert_eq!(rows[0].cell(0), "Fund, The Big One");
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let csv = format!("{}\nAlpha,Org\n", CSV_HEADERS.join(","));
        let rows = read_rows(Cursor::new(csv)).expect("parse");
        assert_eq!(rows[0].cell(1), "Org");
        assert_eq!(rows[0].cell(6), "");
    }
}
