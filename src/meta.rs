use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::cell;
use crate::translate::Labels;

const DEFAULT_TABLES_TOML: &str = include_str!("../tables.toml");

/// Inclusive rectangular cell range, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = cell::name(self.start.0, self.start.1)
            .unwrap_or_else(|_| format!("r{}c{}", self.start.0, self.start.1));
        let end = cell::name(self.end.0, self.end.1)
            .unwrap_or_else(|_| format!("r{}c{}", self.end.0, self.end.1));
        write!(f, "{}:{}", start, end)
    }
}

/// Declared layout of one table, shared by every area file.
#[derive(Debug, Clone)]
pub struct TableMeta {
    pub name: String,
    pub names: Labels,
    pub header: CellRange,
    pub body: CellRange,
    /// Identifiers use the table index instead of the cell name. Set for the
    /// one table whose column order differs between areas.
    pub uses_table_prefix: bool,
}

#[derive(Debug, Deserialize)]
struct TablesFile {
    #[serde(rename = "table")]
    tables: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    name: String,
    names: Labels,
    header: [String; 2],
    body: [String; 2],
    #[serde(default)]
    uses_table_prefix: bool,
}

/// Loads the table metadata from `path`, or the built-in layout when no path
/// is given.
pub fn load_tables(path: Option<&Path>) -> Result<Vec<TableMeta>> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read table metadata: {}", path.display()))?,
        None => DEFAULT_TABLES_TOML.to_string(),
    };
    let file: TablesFile = toml::from_str(&content).with_context(|| match path {
        Some(path) => format!("failed to parse table metadata: {}", path.display()),
        None => "failed to parse built-in table metadata".to_string(),
    })?;
    if file.tables.is_empty() {
        bail!("table metadata declares no tables");
    }

    let mut tables = Vec::with_capacity(file.tables.len());
    for entry in file.tables {
        let header = parse_range(&entry.name, "header", &entry.header)?;
        let body = parse_range(&entry.name, "body", &entry.body)?;
        if header.start.0 != header.end.0 {
            bail!(
                "table '{}' header {} must be a single row",
                entry.name,
                header
            );
        }
        tables.push(TableMeta {
            name: entry.name,
            names: entry.names,
            header,
            body,
            uses_table_prefix: entry.uses_table_prefix,
        });
    }
    Ok(tables)
}

fn parse_range(table: &str, what: &str, cells: &[String; 2]) -> Result<CellRange> {
    let start = cell::parse(&cells[0])
        .with_context(|| format!("table '{}' has a bad {} start cell", table, what))?;
    let end = cell::parse(&cells[1])
        .with_context(|| format!("table '{}' has a bad {} end cell", table, what))?;
    if end.0 < start.0 || end.1 < start.1 {
        bail!(
            "table '{}' {} range {}:{} is inverted",
            table,
            what,
            cells[0],
            cells[1]
        );
    }
    Ok(CellRange { start, end })
}

/// The table-level dictionary, built from declared metadata alone.
pub fn table_translations(tables: &[TableMeta]) -> BTreeMap<usize, Labels> {
    tables
        .iter()
        .enumerate()
        .map(|(index, table)| (index, table.names.clone()))
        .collect()
}
