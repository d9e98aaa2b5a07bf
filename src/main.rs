use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "census-tables",
    version,
    about = "Convert trilingual census spreadsheets into normalized JSON tables"
)]
struct Cli {
    /// Directory holding the downloaded .xlsx files
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Output directory (wiped and recreated on every run)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Worker pool size (0 = one per core)
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Table metadata TOML (defaults to the built-in layout)
    #[arg(long = "tables")]
    tables: Option<String>,

    /// Errata JSON correcting generated translations
    #[arg(long = "errata")]
    errata: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Compare label columns across all files instead of extracting
    #[arg(long = "check")]
    check: bool,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    census_tables::logging::init(cli.verbose)?;

    census_tables::run(census_tables::Config {
        input: cli.input,
        output: cli.output,
        jobs: cli.jobs,
        tables: cli.tables,
        errata: cli.errata,
        settings_path: cli.read_settings,
        check: cli.check,
    })
}
