use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::identifier::identifier;
use crate::meta::TableMeta;
use crate::workbook::{CensusBook, SheetLang};

/// Labels for one identifier across the three language editions.
/// Fields are optional so errata entries can correct a single language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(rename = "T", skip_serializing_if = "Option::is_none")]
    pub traditional: Option<String>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub simplified: Option<String>,
    #[serde(rename = "E", skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
}

/// Identifier to labels. A BTreeMap keeps merge order and JSON output
/// deterministic regardless of worker completion order.
pub type TranslationMap = BTreeMap<String, Labels>;

/// Which cells contribute identifiers to a translation dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    All,
    Row,
    Column,
}

impl NameSource {
    pub fn as_str(self) -> &'static str {
        match self {
            NameSource::All => "all",
            NameSource::Row => "row",
            NameSource::Column => "column",
        }
    }

    /// Output file name for the global dictionary built from this source.
    pub fn output_file(self) -> &'static str {
        match self {
            NameSource::All => "translation.json",
            NameSource::Row => "translation-row.json",
            NameSource::Column => "translation-column.json",
        }
    }
}

/// Builds the translation dictionary for one workbook.
///
/// Identifiers are always generated from the English sheet so the same key
/// lands on the same cell in every language edition; the labels themselves
/// are read from all three sheets at the identifier's coordinates.
pub fn translate_book(
    book: &CensusBook,
    tables: &[TableMeta],
    source: NameSource,
) -> Result<TranslationMap> {
    let mut map = TranslationMap::new();
    for (index, table) in tables.iter().enumerate() {
        book.ensure_extent(&table.name, &table.header)?;
        book.ensure_extent(&table.name, &table.body)?;
        for (row, col) in name_positions(table, source) {
            let english = book.text(SheetLang::English, row, col);
            let id = identifier(&english, table, index, row, col)?;
            map.insert(
                id,
                Labels {
                    traditional: Some(book.text(SheetLang::Traditional, row, col)),
                    simplified: Some(book.text(SheetLang::Simplified, row, col)),
                    english: Some(english),
                },
            );
        }
    }
    Ok(map)
}

/// Coordinates whose cells name rows and/or columns of a table.
pub fn name_positions(table: &TableMeta, source: NameSource) -> Vec<(usize, usize)> {
    let header = &table.header;
    let body = &table.body;
    let columns = (header.start.1..=header.end.1).map(|col| (header.start.0, col));
    let rows = (body.start.0..=body.end.0).map(|row| (row, body.start.1));
    match source {
        NameSource::All => columns.chain(rows).collect(),
        NameSource::Column => columns.collect(),
        NameSource::Row => rows.collect(),
    }
}

/// Merges `src` into `dest`, language by language; `src` wins on conflict.
///
/// With `new_keys` set, identifiers missing from `dest` are added. Pass false
/// to apply a correction table, which must only fix identifiers the pipeline
/// actually generated.
pub fn merge(dest: &mut TranslationMap, src: &TranslationMap, new_keys: bool) {
    for (identifier, labels) in src {
        if !new_keys && !dest.contains_key(identifier) {
            continue;
        }
        let entry = dest.entry(identifier.clone()).or_default();
        if let Some(value) = &labels.traditional {
            entry.traditional = Some(value.clone());
        }
        if let Some(value) = &labels.simplified {
            entry.simplified = Some(value.clone());
        }
        if let Some(value) = &labels.english {
            entry.english = Some(value.clone());
        }
    }
}
