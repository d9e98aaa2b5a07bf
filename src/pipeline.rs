use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rayon::ThreadPool;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::extract;
use crate::meta::{self, TableMeta};
use crate::settings::Settings;
use crate::translate::{self, NameSource, TranslationMap};
use crate::workbook::CensusBook;

/// Runs the full batch: per-area table JSON, then the three global
/// translation dictionaries, then the metadata-only table dictionary.
pub fn run(settings: &Settings, tables: &[TableMeta], errata: &TranslationMap) -> Result<()> {
    let files = discover_files(&settings.input_dir)?;
    if files.is_empty() {
        bail!(
            "no .xlsx files found in {}",
            settings.input_dir.display()
        );
    }
    info!("processing {} files", files.len());

    reset_output_dir(&settings.output_dir)?;
    let pool = build_pool(settings.jobs)?;

    pool.install(|| {
        files.par_iter().try_for_each(|file_name| {
            extract::process_one_file(&settings.input_dir, file_name, tables, &settings.output_dir)
        })
    })?;

    info!("generating translation dictionaries");
    for source in [NameSource::All, NameSource::Row, NameSource::Column] {
        let merged = translation_pass(&pool, settings, &files, tables, errata, source)?;
        write_json(&settings.output_dir.join(source.output_file()), &merged)?;
    }
    write_json(
        &settings.output_dir.join("translation-table.json"),
        &meta::table_translations(tables),
    )?;

    Ok(())
}

/// One translation pass: per-file dictionaries in parallel, then a
/// sequential fold in filename order so the result is reproducible. The
/// errata table corrects each file's contribution before it folds in and
/// never introduces identifiers of its own.
fn translation_pass(
    pool: &ThreadPool,
    settings: &Settings,
    files: &[String],
    tables: &[TableMeta],
    errata: &TranslationMap,
    source: NameSource,
) -> Result<TranslationMap> {
    let per_file: Vec<TranslationMap> = pool.install(|| {
        files
            .par_iter()
            .map(|file_name| {
                let book = CensusBook::open(&settings.input_dir.join(file_name))?;
                info!("translating {} ({})", file_name, source.as_str());
                let mut map = translate::translate_book(&book, tables, source)?;
                translate::merge(&mut map, errata, false);
                Ok(map)
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut merged = TranslationMap::new();
    for map in &per_file {
        translate::merge(&mut merged, map, true);
    }
    Ok(merged)
}

/// Spreadsheet files in the input directory, sorted by name.
pub fn discover_files(input_dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to list input directory: {}", input_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with("~$") {
            // Excel lock files.
            continue;
        }
        if Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
        {
            files.push(name.to_string());
        }
    }
    files.sort();
    Ok(files)
}

fn reset_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir).with_context(|| {
            format!("failed to clear output directory: {}", output_dir.display())
        })?;
    }
    fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;
    Ok(())
}

fn build_pool(jobs: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("failed to build worker pool")
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string(value)?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
