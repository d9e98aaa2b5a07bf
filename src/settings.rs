use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub jobs: usize,
    pub tables_path: Option<PathBuf>,
    pub errata_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/download"),
            output_dir: PathBuf::from("data/clean-json"),
            jobs: 0,
            tables_path: None,
            errata_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    paths: Option<PathSettings>,
    pool: Option<PoolSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct PathSettings {
    input: Option<String>,
    output: Option<String>,
    tables: Option<String>,
    errata: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PoolSettings {
    jobs: Option<usize>,
}

/// Loads settings, layered: built-in defaults, then `settings.toml` and
/// `settings.local.toml` from the working directory, then an explicit file.
pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();

    let parsed: SettingsFile =
        toml::from_str(DEFAULT_SETTINGS_TOML).context("built-in settings are invalid")?;
    settings.merge(parsed);

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));
    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(paths) = incoming.paths {
            if let Some(input) = paths.input {
                if !input.trim().is_empty() {
                    self.input_dir = PathBuf::from(input);
                }
            }
            if let Some(output) = paths.output {
                if !output.trim().is_empty() {
                    self.output_dir = PathBuf::from(output);
                }
            }
            if let Some(tables) = paths.tables {
                if !tables.trim().is_empty() {
                    self.tables_path = Some(PathBuf::from(tables));
                }
            }
            if let Some(errata) = paths.errata {
                if !errata.trim().is_empty() {
                    self.errata_path = Some(PathBuf::from(errata));
                }
            }
        }
        if let Some(pool) = incoming.pool {
            if let Some(jobs) = pool.jobs {
                self.jobs = jobs;
            }
        }
    }
}
