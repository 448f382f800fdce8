//! zip3-datagen CLI - Convert quarterly substance extracts to JSON lookups
//!
//! ```bash
//! zip3-datagen single              # 2019Q1.csv -> substances_list.json + 2019Q1.json
//! zip3-datagen quarters            # ????Q?.csv -> <period>.json + quarters_list.json
//! ```
//!
//! Both commands work on the current directory unless `--data-dir`,
//! `--out-dir` or the `ZIP3_*` environment variables (also read from `.env`)
//! say otherwise.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use zip3_datagen::logs::{log_error, PROGRESS_LOG};
use zip3_datagen::{
    run_quarters, run_single, DriverError, DuplicatePolicy, PipelineOptions, QuartersConfig,
    Settings, SingleFileConfig,
};

#[derive(Parser)]
#[command(name = "zip3-datagen", version)]
#[command(about = "Pivot substance CSV extracts into zone -> substance JSON lookups", long_about = None)]
struct Cli {
    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one extract into substances_list.json and a pretty lookup table
    Single {
        /// Input CSV file (default: <data-dir>/2019Q1.csv)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Lookup table output (default: <out-dir>/2019Q1.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Substance list output (default: <out-dir>/substances_list.json)
        #[arg(long)]
        categories_output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Convert every YYYYQn.csv extract and write the quarters manifest
    Quarters {
        /// File name pattern inside the data directory
        #[arg(short, long)]
        pattern: Option<String>,

        /// Manifest output (default: <out-dir>/quarters_list.json)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Directory holding the CSV extracts
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving the JSON artifacts
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Cell value when a zone lists a substance more than once: mean, last or reject
    #[arg(long)]
    duplicates: Option<DuplicatePolicy>,

    /// Header of the zone column
    #[arg(long)]
    zone_column: Option<String>,

    /// Header of the substance column
    #[arg(long)]
    category_column: Option<String>,

    /// Header of the value column
    #[arg(long)]
    value_column: Option<String>,

    /// Skip schema validation of the artifacts
    #[arg(long)]
    no_validate: bool,
}

impl CommonArgs {
    /// Environment settings with command-line overrides applied.
    fn settings(&self) -> Result<Settings, DriverError> {
        let mut settings = Settings::from_env()?;
        if let Some(ref dir) = self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(ref dir) = self.out_dir {
            settings.out_dir = dir.clone();
        }
        if let Some(policy) = self.duplicates {
            settings.duplicates = policy;
        }
        Ok(settings)
    }

    fn apply(&self, pipeline: &mut PipelineOptions) {
        if let Some(ref name) = self.zone_column {
            pipeline.columns.zone = name.clone();
        }
        if let Some(ref name) = self.category_column {
            pipeline.columns.category = name.clone();
        }
        if let Some(ref name) = self.value_column {
            pipeline.columns.value = name.clone();
        }
        pipeline.skip_validation = self.no_validate;
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    PROGRESS_LOG.set_quiet(cli.quiet);

    let result = match cli.command {
        Commands::Single {
            input,
            output,
            categories_output,
            common,
        } => cmd_single(input, output, categories_output, &common),

        Commands::Quarters {
            pattern,
            manifest,
            common,
        } => cmd_quarters(pattern, manifest, &common),
    };

    if let Err(e) = result {
        if e.is_non_fatal() {
            log_error(format!("Error: {}", e));
            return;
        }
        log_error(format!("An error occurred: {}", e));
        std::process::exit(1);
    }
}

fn cmd_single(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    categories_output: Option<PathBuf>,
    common: &CommonArgs,
) -> Result<(), DriverError> {
    let mut config = SingleFileConfig::from_settings(&common.settings()?);
    if let Some(input) = input {
        config.input = input;
    }
    if let Some(output) = output {
        config.output = output;
    }
    if let Some(path) = categories_output {
        config.categories_output = path;
    }
    common.apply(&mut config.pipeline);

    run_single(&config)?;
    Ok(())
}

fn cmd_quarters(
    pattern: Option<String>,
    manifest: Option<PathBuf>,
    common: &CommonArgs,
) -> Result<(), DriverError> {
    let mut config = QuartersConfig::from_settings(&common.settings()?);
    if let Some(pattern) = pattern {
        config.pattern = pattern;
    }
    if let Some(manifest) = manifest {
        config.manifest = manifest;
    }
    common.apply(&mut config.pipeline);

    run_quarters(&config)?;
    Ok(())
}
