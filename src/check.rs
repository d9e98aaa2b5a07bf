use std::collections::BTreeMap;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::pipeline;
use crate::settings::Settings;
use crate::workbook::{CensusBook, SheetLang};

/// Columns compared across files: A holds row labels, H holds the second
/// block's row labels.
const CHECK_COLUMNS: [usize; 2] = [0, 7];

const LANGS: [SheetLang; 3] = [
    SheetLang::Traditional,
    SheetLang::Simplified,
    SheetLang::English,
];

/// Diagnostic pass: compares the label columns of every file against the
/// first file and logs mismatches. Slow (opens every workbook) and not part
/// of the extraction data path; it only shows whether the shared table
/// layout actually holds across areas.
pub fn run(settings: &Settings) -> Result<()> {
    let files = pipeline::discover_files(&settings.input_dir)?;
    let Some(baseline_name) = files.first() else {
        bail!(
            "no .xlsx files found in {}",
            settings.input_dir.display()
        );
    };

    let baseline = CensusBook::open(&settings.input_dir.join(baseline_name))?;
    let mut base_columns = Vec::new();
    for lang in LANGS {
        for col in CHECK_COLUMNS {
            base_columns.push(((lang, col), baseline.column_text(lang, col)));
        }
    }

    let mut frequency: BTreeMap<usize, usize> = BTreeMap::new();
    let mut mismatched_files = 0;
    for file_name in &files {
        info!("checking {}", file_name);
        let book = CensusBook::open(&settings.input_dir.join(file_name))?;
        let mut file_matches = true;
        for ((lang, col), base_column) in &base_columns {
            let column = book.column_text(*lang, *col);
            let rows = compare_column(file_name, *lang, *col, &column, base_column);
            if !rows.is_empty() {
                file_matches = false;
                for row in rows {
                    *frequency.entry(row).or_default() += 1;
                }
            }
        }
        if file_matches {
            info!("no differences in {}", file_name);
        } else {
            mismatched_files += 1;
        }
    }

    info!(
        "{} files checked against {}, {} with differences",
        files.len(),
        baseline_name,
        mismatched_files
    );
    if !frequency.is_empty() {
        info!("mismatching rows and their frequency: {:?}", frequency);
    }
    Ok(())
}

/// Logs every differing row and returns the rows where both sides exist but
/// disagree.
fn compare_column(
    file_name: &str,
    lang: SheetLang,
    col: usize,
    column: &[String],
    base: &[String],
) -> Vec<usize> {
    if column == base {
        return Vec::new();
    }
    let col_letter = (b'A' + col as u8) as char;
    warn!(
        "{} sheet {} column {} differs from baseline",
        file_name,
        lang.as_str(),
        col_letter
    );

    let mut rows = Vec::new();
    let max_row = column.len().max(base.len());
    for row in 0..max_row {
        match (column.get(row), base.get(row)) {
            (Some(value), Some(base_value)) if value != base_value => {
                rows.push(row);
                warn!(
                    "row {}: baseline is {:?}, file is {:?}",
                    row + 1,
                    base_value,
                    value
                );
            }
            (None, Some(base_value)) => {
                warn!(
                    "row {}: baseline is {:?}, but doesn't exist in file",
                    row + 1,
                    base_value
                );
            }
            (Some(value), None) => {
                warn!(
                    "row {}: doesn't exist in baseline, but in file is {:?}",
                    row + 1,
                    value
                );
            }
            _ => {}
        }
    }
    rows
}
