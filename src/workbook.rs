use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Range, Reader, Xlsx, open_workbook};

use crate::meta::CellRange;

/// Sheet order inside every census workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLang {
    Traditional,
    Simplified,
    English,
}

impl SheetLang {
    pub fn index(self) -> usize {
        match self {
            SheetLang::Traditional => 0,
            SheetLang::Simplified => 1,
            SheetLang::English => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SheetLang::Traditional => "traditional",
            SheetLang::Simplified => "simplified",
            SheetLang::English => "english",
        }
    }
}

/// One trilingual workbook. Each worker opens its own handle; calamine
/// readers are not shared across threads.
pub struct CensusBook {
    sheets: [Range<Data>; 3],
}

impl CensusBook {
    pub fn open(path: &Path) -> Result<CensusBook> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("failed to open workbook: {}", path.display()))?;
        let sheet_count = workbook.sheet_names().len();
        if sheet_count != 3 {
            bail!(
                "workbook {} must contain exactly 3 sheets (traditional, simplified, english), found {}",
                path.display(),
                sheet_count
            );
        }

        let mut sheets = Vec::with_capacity(3);
        for index in 0..3 {
            let range = workbook
                .worksheet_range_at(index)
                .ok_or_else(|| anyhow!("workbook {} has no sheet {}", path.display(), index))?
                .with_context(|| {
                    format!("failed to read sheet {} of {}", index, path.display())
                })?;
            sheets.push(range);
        }
        let sheets: [Range<Data>; 3] = sheets
            .try_into()
            .map_err(|_| anyhow!("workbook {} sheet count changed mid-read", path.display()))?;
        Ok(CensusBook { sheets })
    }

    pub fn value(&self, lang: SheetLang, row: usize, col: usize) -> Option<&Data> {
        self.sheets[lang.index()].get_value((row as u32, col as u32))
    }

    /// Trimmed text of a cell; blank cells and cells before the sheet's
    /// populated start yield an empty string.
    pub fn text(&self, lang: SheetLang, row: usize, col: usize) -> String {
        match self.value(lang, row, col) {
            Some(value) => data_text(value).trim().to_string(),
            None => String::new(),
        }
    }

    /// JSON rendering of a cell for the data block.
    pub fn value_json(&self, lang: SheetLang, row: usize, col: usize) -> serde_json::Value {
        match self.value(lang, row, col) {
            Some(value) => data_json(value),
            None => serde_json::Value::String(String::new()),
        }
    }

    /// Every cell of one column, down to the sheet's populated extent.
    pub fn column_text(&self, lang: SheetLang, col: usize) -> Vec<String> {
        let Some((end_row, _)) = self.sheets[lang.index()].end() else {
            return Vec::new();
        };
        (0..=end_row as usize)
            .map(|row| self.text(lang, row, col))
            .collect()
    }

    /// Fails when a declared range reaches past the English sheet's populated
    /// extent. Declared metadata pointing outside the sheet is a layout
    /// mismatch, not a blank table.
    pub fn ensure_extent(&self, table_name: &str, range: &CellRange) -> Result<()> {
        let extent = self.sheets[SheetLang::English.index()].end();
        let Some((end_row, end_col)) = extent else {
            bail!("table '{}' range {}: english sheet is empty", table_name, range);
        };
        if range.end.0 > end_row as usize || range.end.1 > end_col as usize {
            bail!(
                "table '{}' range {} reaches past the sheet extent {}",
                table_name,
                range,
                crate::cell::name(end_row as usize, end_col as usize)
                    .unwrap_or_else(|_| format!("r{}c{}", end_row, end_col))
            );
        }
        Ok(())
    }
}

fn data_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(number) => float_text(*number),
        Data::Int(number) => number.to_string(),
        Data::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

fn data_json(value: &Data) -> serde_json::Value {
    match value {
        Data::Empty => serde_json::Value::String(String::new()),
        Data::String(text) => serde_json::Value::String(text.clone()),
        Data::Float(number) => serde_json::json!(*number),
        Data::Int(number) => serde_json::json!(*number),
        Data::Bool(flag) => serde_json::json!(*flag),
        other => serde_json::Value::String(other.to_string()),
    }
}

fn float_text(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}
