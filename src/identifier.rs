use crate::cell::{self, CellNameError};
use crate::meta::TableMeta;

/// Punctuation dropped from cell text before the leading term is taken.
const STRIPPED: &[char] = &['(', ')', '$', '#', '&', ',', '/'];

/// Placeholder term for blank or punctuation-only cells. Known blanks (merged
/// header cells) are corrected afterwards by the errata table.
const BLANK_TERM: &str = "none";

/// Builds a machine identifier from a cell's English text.
///
/// The identifier is `tab{index}_{term}` for order-unstable tables and
/// `{cell_name}_{term}` for everything else, where the term is the first
/// whitespace-delimited token after cleaning. Cell-name prefixes make the
/// identifier unique within a sheet even when leading terms collide.
pub fn identifier(
    text: &str,
    table: &TableMeta,
    table_index: usize,
    row: usize,
    col: usize,
) -> Result<String, CellNameError> {
    let cleaned: String = text.chars().filter(|ch| !STRIPPED.contains(ch)).collect();
    let cleaned = cleaned.replace('\u{2267}', ">=");
    let term = cleaned.split_whitespace().next().unwrap_or(BLANK_TERM);
    let id = if table.uses_table_prefix {
        format!("tab{}_{}", table_index, term)
    } else {
        format!("{}_{}", cell::name(row, col)?, term)
    };
    Ok(id.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{CellRange, TableMeta};
    use crate::translate::Labels;

    fn table(uses_table_prefix: bool) -> TableMeta {
        TableMeta {
            name: "age_group".to_string(),
            names: Labels::default(),
            header: CellRange {
                start: (5, 0),
                end: (5, 4),
            },
            body: CellRange {
                start: (6, 0),
                end: (12, 4),
            },
            uses_table_prefix,
        }
    }

    #[test]
    fn coordinate_prefix_tracks_the_cell() {
        let table = table(false);
        let at_a6 = identifier("Total Population", &table, 1, 5, 0).expect("identifier");
        let at_b6 = identifier("Total Population", &table, 1, 5, 1).expect("identifier");
        assert_eq!(at_a6, "a6_total");
        assert_eq!(at_b6, "b6_total");
    }

    #[test]
    fn table_prefix_ignores_the_cell() {
        let table = table(true);
        let at_a6 = identifier("Chinese", &table, 0, 5, 0).expect("identifier");
        let at_b6 = identifier("Chinese", &table, 0, 5, 1).expect("identifier");
        assert_eq!(at_a6, "tab0_chinese");
        assert_eq!(at_a6, at_b6);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let table = table(false);
        let first = identifier("Male", &table, 2, 5, 1).expect("identifier");
        let second = identifier("Male", &table, 2, 5, 1).expect("identifier");
        assert_eq!(first, second);
        assert_eq!(first, "b6_male");
    }

    #[test]
    fn strips_punctuation_and_normalizes_gte() {
        let table = table(false);
        let id = identifier("≧65(yrs)", &table, 1, 6, 0).expect("identifier");
        assert_eq!(id, "a7_>=65yrs");

        let id = identifier("Owner, occupier ($/month)", &table, 1, 7, 0).expect("identifier");
        assert_eq!(id, "a8_owner");
    }

    #[test]
    fn blank_cell_yields_none_term() {
        let table = table(false);
        assert_eq!(
            identifier("", &table, 1, 75, 2).expect("identifier"),
            "c76_none"
        );
        assert_eq!(
            identifier("  ()  ", &table, 1, 75, 3).expect("identifier"),
            "d76_none"
        );
    }

    #[test]
    fn result_is_lowercased() {
        let table = table(false);
        assert_eq!(
            identifier("NEVER Married", &table, 1, 17, 0).expect("identifier"),
            "a18_never"
        );
    }
}
