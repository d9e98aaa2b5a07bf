use std::path::{Path, PathBuf};

use anyhow::Result;

pub mod cell;
pub mod check;
pub mod errata;
pub mod extract;
pub mod identifier;
pub mod logging;
pub mod meta;
pub mod pipeline;
pub mod settings;
pub mod translate;
pub mod workbook;

pub use cell::CellNameError;
pub use extract::TableRecord;
pub use meta::{CellRange, TableMeta};
pub use translate::{Labels, NameSource, TranslationMap};
pub use workbook::{CensusBook, SheetLang};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub input: Option<String>,
    pub output: Option<String>,
    pub jobs: Option<usize>,
    pub tables: Option<String>,
    pub errata: Option<String>,
    pub settings_path: Option<String>,
    pub check: bool,
}

pub fn run(config: Config) -> Result<()> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let mut settings = settings::load_settings(settings_path)?;

    if let Some(input) = config.input {
        settings.input_dir = PathBuf::from(input);
    }
    if let Some(output) = config.output {
        settings.output_dir = PathBuf::from(output);
    }
    if let Some(jobs) = config.jobs {
        settings.jobs = jobs;
    }
    if let Some(tables) = config.tables {
        settings.tables_path = Some(PathBuf::from(tables));
    }
    if let Some(errata) = config.errata {
        settings.errata_path = Some(PathBuf::from(errata));
    }

    if config.check {
        return check::run(&settings);
    }

    let tables = meta::load_tables(settings.tables_path.as_deref())?;
    let errata = errata::load(settings.errata_path.as_deref())?;
    pipeline::run(&settings, &tables, &errata)
}
