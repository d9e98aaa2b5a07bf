use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

const TABLES_TOML: &str = r#"
[[table]]
name = "ethnicity"
uses_table_prefix = true
header = ["A2", "B2"]
body = ["A3", "B4"]
[table.names]
E = "Ethnicity"
S = "种族"
T = "種族"

[[table]]
name = "population"
header = ["A6", "B6"]
body = ["A7", "B9"]
[table.names]
E = "Population"
S = "人口"
T = "人口"
"#;

const ERRATA_JSON: &str = r#"
{
  "a9_none": {"E": "Other households"},
  "zz9_ghost": {"E": "Ghost"}
}
"#;

fn localized(english: &str, lang_index: usize) -> String {
    const TRANSLATIONS: &[(&str, &str, &str)] = &[
        ("Ethnicity", "種族", "种族"),
        ("Count", "數目", "数目"),
        ("Chinese", "華人", "华人"),
        ("White", "白人", "白人"),
        ("Total Population", "總人口", "总人口"),
        ("Male", "男性", "男性"),
        ("≧65(yrs)", "≧65(歲)", "≧65(岁)"),
        ("0 - 14", "0 - 14", "0 - 14"),
    ];
    if lang_index == 2 {
        return english.to_string();
    }
    TRANSLATIONS
        .iter()
        .find(|(key, _, _)| *key == english)
        .map(|(_, traditional, simplified)| {
            if lang_index == 0 {
                *traditional
            } else {
                *simplified
            }
        })
        .unwrap_or(english)
        .to_string()
}

/// Writes one trilingual fixture workbook. `ethnic_rows` controls the row
/// order of the first table, which differs between areas in the real files.
fn write_book(path: &Path, area: &str, ethnic_rows: [&str; 2]) {
    let mut workbook = Workbook::new();

    // Sheet order is fixed: traditional, simplified, english.
    for (lang_index, sheet_suffix) in ["t", "s", "e"].iter().enumerate() {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(format!("{}{}", area, sheet_suffix))
            .expect("sheet name");

        let text = |value: &str| -> String { localized(value, lang_index) };

        // Table 0: header A2:B2, body A3:B4.
        sheet.write_string(1, 0, text("Ethnicity")).expect("write");
        sheet.write_string(1, 1, text("Count")).expect("write");
        sheet
            .write_string(2, 0, text(ethnic_rows[0]))
            .expect("write");
        sheet
            .write_string(3, 0, text(ethnic_rows[1]))
            .expect("write");
        sheet.write_number(2, 1, 120.0).expect("write");
        sheet.write_number(3, 1, 8.0).expect("write");

        // Table 1: header A6:B6, body A7:B9. A9 is intentionally blank, the
        // errata supplies its English label.
        sheet
            .write_string(5, 0, text("Total Population"))
            .expect("write");
        sheet.write_string(5, 1, text("Male")).expect("write");
        sheet.write_string(6, 0, text("≧65(yrs)")).expect("write");
        sheet.write_string(7, 0, text("0 - 14")).expect("write");
        sheet.write_number(6, 1, 70.0).expect("write");
        sheet.write_number(7, 1, 30.0).expect("write");
        sheet.write_number(8, 1, 1.0).expect("write");
    }

    workbook.save(path).expect("save workbook");
}

struct Fixture {
    _dir: TempDir,
    input: PathBuf,
    output: PathBuf,
    tables: PathBuf,
    errata: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("download");
    let output = dir.path().join("clean-json");
    fs::create_dir_all(&input).expect("create input dir");

    write_book(&input.join("A01.xlsx"), "A01", ["Chinese", "White"]);
    write_book(&input.join("B02.xlsx"), "B02", ["White", "Chinese"]);

    let tables = dir.path().join("tables.toml");
    fs::write(&tables, TABLES_TOML).expect("write tables");
    let errata = dir.path().join("errata.json");
    fs::write(&errata, ERRATA_JSON).expect("write errata");

    Fixture {
        _dir: dir,
        input,
        output,
        tables,
        errata,
    }
}

fn config(fixture: &Fixture) -> census_tables::Config {
    census_tables::Config {
        input: Some(fixture.input.display().to_string()),
        output: Some(fixture.output.display().to_string()),
        jobs: Some(2),
        tables: Some(fixture.tables.display().to_string()),
        errata: Some(fixture.errata.display().to_string()),
        settings_path: None,
        check: false,
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).expect("read json");
    serde_json::from_str(&content).expect("parse json")
}

#[test]
fn extracts_tables_per_area() {
    let fixture = fixture();
    census_tables::run(config(&fixture)).expect("run pipeline");

    let table = read_json(&fixture.output.join("areas/A01/table1.json"));
    assert_eq!(table["meta"]["table_id"], serde_json::json!(1));
    assert_eq!(table["meta"]["table_name"], serde_json::json!("population"));
    assert_eq!(table["meta"]["area"], serde_json::json!("A01"));
    assert_eq!(
        table["meta"]["table_names"]["E"],
        serde_json::json!("Population")
    );
    assert_eq!(
        table["column_names"],
        serde_json::json!(["a6_total", "b6_male"])
    );
    assert_eq!(
        table["row_names"],
        serde_json::json!(["a7_>=65yrs", "a8_0", "a9_none"])
    );
    // The leftmost body column holds the row labels and is not data.
    assert_eq!(
        table["data"],
        serde_json::json!([[70.0], [30.0], [1.0]])
    );
}

#[test]
fn order_unstable_table_uses_table_prefix() {
    let fixture = fixture();
    census_tables::run(config(&fixture)).expect("run pipeline");

    let a01 = read_json(&fixture.output.join("areas/A01/table0.json"));
    assert_eq!(
        a01["column_names"],
        serde_json::json!(["tab0_ethnicity", "tab0_count"])
    );
    assert_eq!(
        a01["row_names"],
        serde_json::json!(["tab0_chinese", "tab0_white"])
    );

    // Same identifiers in the other area despite the different row order.
    let b02 = read_json(&fixture.output.join("areas/B02/table0.json"));
    assert_eq!(
        b02["row_names"],
        serde_json::json!(["tab0_white", "tab0_chinese"])
    );
}

#[test]
fn translation_dictionaries_align_languages() {
    let fixture = fixture();
    census_tables::run(config(&fixture)).expect("run pipeline");

    let all = read_json(&fixture.output.join("translation.json"));
    assert_eq!(
        all["a6_total"],
        serde_json::json!({"T": "總人口", "S": "总人口", "E": "Total Population"})
    );
    assert_eq!(all["a7_>=65yrs"]["T"], serde_json::json!("≧65(歲)"));

    // Both areas contribute ethnicity identifiers to the union.
    assert!(all.get("tab0_chinese").is_some());
    assert!(all.get("tab0_white").is_some());

    let rows = read_json(&fixture.output.join("translation-row.json"));
    assert!(rows.get("a7_>=65yrs").is_some());
    assert!(rows.get("b6_male").is_none());

    let columns = read_json(&fixture.output.join("translation-column.json"));
    assert!(columns.get("b6_male").is_some());
    assert!(columns.get("a7_>=65yrs").is_none());
}

#[test]
fn errata_corrects_but_never_adds_identifiers() {
    let fixture = fixture();
    census_tables::run(config(&fixture)).expect("run pipeline");

    let all = read_json(&fixture.output.join("translation.json"));
    // English label fixed by errata, generated Chinese labels kept.
    assert_eq!(all["a9_none"]["E"], serde_json::json!("Other households"));
    assert_eq!(all["a9_none"]["T"], serde_json::json!(""));
    // Errata-only identifiers never reach the output.
    assert!(all.get("zz9_ghost").is_none());
}

#[test]
fn table_dictionary_comes_from_metadata_alone() {
    let fixture = fixture();
    census_tables::run(config(&fixture)).expect("run pipeline");

    let tables = read_json(&fixture.output.join("translation-table.json"));
    assert_eq!(
        tables["0"],
        serde_json::json!({"T": "種族", "S": "种族", "E": "Ethnicity"})
    );
    assert_eq!(tables["1"]["E"], serde_json::json!("Population"));
}

#[test]
fn rerun_wipes_previous_output() {
    let fixture = fixture();
    census_tables::run(config(&fixture)).expect("first run");

    let stale = fixture.output.join("areas/ZZZ");
    fs::create_dir_all(&stale).expect("create stale dir");
    fs::write(stale.join("table0.json"), b"stale").expect("write stale");

    census_tables::run(config(&fixture)).expect("second run");
    assert!(!stale.exists());
    assert!(fixture.output.join("areas/A01/table0.json").exists());
}

#[test]
fn declared_range_outside_sheet_fails_fast() {
    let fixture = fixture();
    let bad_tables = r#"
        [[table]]
        name = "phantom"
        header = ["A2", "B2"]
        body = ["A3", "E99"]
        [table.names]
        E = "Phantom"
    "#;
    fs::write(&fixture.tables, bad_tables).expect("write tables");

    let err = census_tables::run(config(&fixture)).expect_err("out-of-extent range");
    assert!(format!("{:#}", err).contains("phantom"));
}
