use thiserror::Error;

/// Malformed spreadsheet cell name. Only single-letter columns (A-Z) are
/// supported; the input files never go wider than column N.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellNameError {
    #[error("cell name is empty")]
    Empty,
    #[error("cell name '{0}' must start with a single uppercase column letter A-Z")]
    Column(String),
    #[error("cell name '{0}' must end with a 1-based row number")]
    Row(String),
    #[error("column index {0} does not fit a single letter")]
    ColumnOutOfRange(usize),
}

/// Parses a cell name like "A6" into a zero-based (row, column) pair.
pub fn parse(name: &str) -> Result<(usize, usize), CellNameError> {
    let mut chars = name.chars();
    let letter = chars.next().ok_or(CellNameError::Empty)?;
    if !letter.is_ascii_uppercase() {
        return Err(CellNameError::Column(name.to_string()));
    }
    let digits = chars.as_str();
    if digits.chars().any(|ch| ch.is_ascii_alphabetic()) {
        return Err(CellNameError::Column(name.to_string()));
    }
    let row: usize = digits
        .parse()
        .map_err(|_| CellNameError::Row(name.to_string()))?;
    if row == 0 {
        return Err(CellNameError::Row(name.to_string()));
    }
    Ok((row - 1, letter as usize - 'A' as usize))
}

/// Inverse of [`parse`]; fails for columns past Z.
pub fn name(row: usize, col: usize) -> Result<String, CellNameError> {
    if col >= 26 {
        return Err(CellNameError::ColumnOutOfRange(col));
    }
    Ok(format!("{}{}", (b'A' + col as u8) as char, row + 1))
}
