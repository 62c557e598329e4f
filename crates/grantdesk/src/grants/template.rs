use std::fs;
use std::io;
use std::path::Path;

use super::import::CSV_HEADERS;

/// Header row plus one illustrative record, offered so users can fill in
/// the expected schema instead of guessing it.
pub fn template_csv() -> String {
    let example = concat!(
        "\"Example Scholarship\",\"Future Foundation\",National,Scholarship,",
        "Education,\"Component A\",50000000,COP,Partially,\"Missing document X\",",
        "2025-12-31,https://example.org,Open,Pending to apply"
    );
    format!("{}\n{example}\n", CSV_HEADERS.join(","))
}

pub fn write_template<P: AsRef<Path>>(path: P) -> io::Result<()> {
    fs::write(path, template_csv())
}
