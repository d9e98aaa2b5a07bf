use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::info;

use crate::identifier::identifier;
use crate::meta::TableMeta;
use crate::translate::Labels;
use crate::workbook::{CensusBook, SheetLang};

/// One extracted table for one area, written verbatim to JSON.
#[derive(Debug, Serialize)]
pub struct TableRecord {
    pub meta: RecordMeta,
    pub row_names: Vec<String>,
    pub column_names: Vec<String>,
    pub data: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
pub struct RecordMeta {
    pub table_id: usize,
    pub table_name: String,
    pub table_names: Labels,
    pub area: String,
}

/// Area code of an input file: its first 3 characters.
pub fn area_code(file_name: &str) -> Result<&str> {
    let end = file_name
        .char_indices()
        .nth(3)
        .map(|(index, _)| index)
        .unwrap_or(file_name.len());
    let code = &file_name[..end];
    if code.chars().count() < 3 {
        bail!("file name '{}' is too short to carry an area code", file_name);
    }
    Ok(code)
}

/// Extracts one table from the English sheet.
///
/// Column identifiers come from the header row, row identifiers from the
/// body's leftmost column. That leftmost column holds the row labels, so the
/// data block starts one column to its right.
pub fn extract_table(
    book: &CensusBook,
    table: &TableMeta,
    index: usize,
    area: &str,
) -> Result<TableRecord> {
    book.ensure_extent(&table.name, &table.header)?;
    book.ensure_extent(&table.name, &table.body)?;

    let header = &table.header;
    let mut column_names = Vec::with_capacity(header.end.1 - header.start.1 + 1);
    for col in header.start.1..=header.end.1 {
        let text = book.text(SheetLang::English, header.start.0, col);
        column_names.push(identifier(&text, table, index, header.start.0, col)?);
    }

    let body = &table.body;
    let mut row_names = Vec::with_capacity(body.end.0 - body.start.0 + 1);
    let mut data = Vec::with_capacity(body.end.0 - body.start.0 + 1);
    for row in body.start.0..=body.end.0 {
        let text = book.text(SheetLang::English, row, body.start.1);
        row_names.push(identifier(&text, table, index, row, body.start.1)?);

        let mut cells = Vec::new();
        for col in body.start.1 + 1..=body.end.1 {
            cells.push(book.value_json(SheetLang::English, row, col));
        }
        data.push(cells);
    }

    Ok(TableRecord {
        meta: RecordMeta {
            table_id: index,
            table_name: table.name.clone(),
            table_names: table.names.clone(),
            area: area.to_string(),
        },
        row_names,
        column_names,
        data,
    })
}

/// Extracts every declared table from one file and writes
/// `areas/<area>/table<N>.json` under the output directory.
pub fn process_one_file(
    input_dir: &Path,
    file_name: &str,
    tables: &[TableMeta],
    output_dir: &Path,
) -> Result<()> {
    let area = area_code(file_name)?;
    let book = CensusBook::open(&input_dir.join(file_name))?;

    let area_dir = output_dir.join("areas").join(area);
    fs::create_dir_all(&area_dir)
        .with_context(|| format!("failed to create area directory: {}", area_dir.display()))?;

    for (index, table) in tables.iter().enumerate() {
        let record = extract_table(&book, table, index, area)
            .with_context(|| format!("failed to extract table {} from {}", index, file_name))?;
        let path = area_dir.join(format!("table{}.json", index));
        let content = serde_json::to_string(&record)?;
        fs::write(&path, content)
            .with_context(|| format!("failed to write table: {}", path.display()))?;
    }

    info!("extracted {}", file_name);
    Ok(())
}
