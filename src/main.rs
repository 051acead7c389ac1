//! runprep CLI
//!
//! Entry point for the `runprep` command-line tool.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;

use runprep::descriptor::{DescriptorError, RunDescriptor};
use runprep::interval::{self, IntervalError};
use runprep::merge::{self, MergeError, RunMetadata};
use runprep::plan::{
    self, DOWNLOAD_LIST_FILENAME, ENV_FILENAME, INPUT_MANIFEST_FILENAME,
};
use runprep::{logging, ArtifactError, ArtifactSet};

#[derive(Parser)]
#[command(name = "runprep")]
#[command(about = "Materialize pipeline run descriptors into execution artifacts", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a run descriptor into the fetch script, engine input
    /// manifest, and environment-binding file
    Plan {
        /// Path to the run descriptor JSON
        descriptor: PathBuf,

        /// Directory the artifacts are published into
        #[arg(long, short = 'o', default_value = ".")]
        outdir: PathBuf,
    },

    /// Merge engine output and run metadata into a new descriptor
    Merge {
        /// Path to the pre-run descriptor JSON
        descriptor: PathBuf,

        /// Path to the engine-produced output record JSON
        engine_output: PathBuf,

        /// Path the merged descriptor is written to
        output: PathBuf,

        /// Run status (default: JOB_STATUS env var)
        #[arg(long)]
        status: Option<String>,

        /// Instance identifier (default: INSTANCE_ID env var)
        #[arg(long)]
        instance_id: Option<String>,

        /// Total input bytes (default: INPUTSIZE env var)
        #[arg(long)]
        input_size: Option<String>,

        /// Total temp bytes (default: TEMPSIZE env var)
        #[arg(long)]
        tmp_size: Option<String>,

        /// Total output bytes (default: OUTPUTSIZE env var)
        #[arg(long)]
        output_size: Option<String>,
    },

    /// Partition a sequence length into bounded-size regions
    Split {
        /// Total sequence length
        length: u64,

        /// Maximum region size
        max_size: u64,
    },

    /// Partition every sequence in a two-column name/length table
    SplitTable {
        /// Path to the table (e.g. a chrom.sizes file)
        table: PathBuf,

        /// Maximum region size
        max_size: u64,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Descriptor(#[from] DescriptorError),

    #[error("{0}")]
    Merge(#[from] MergeError),

    #[error("{0}")]
    Interval(#[from] IntervalError),

    #[error("{0}")]
    Artifact(#[from] ArtifactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid output path: {0}")]
    InvalidOutputPath(PathBuf),
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan { descriptor, outdir } => run_plan(&descriptor, &outdir),
        Commands::Merge {
            descriptor,
            engine_output,
            output,
            status,
            instance_id,
            input_size,
            tmp_size,
            output_size,
        } => {
            let mut metadata = RunMetadata::from_env().with_end_time_now();
            metadata.status = status.or(metadata.status);
            metadata.instance_id = instance_id.or(metadata.instance_id);
            metadata.total_input_size = input_size.or(metadata.total_input_size);
            metadata.total_tmp_size = tmp_size.or(metadata.total_tmp_size);
            metadata.total_output_size = output_size.or(metadata.total_output_size);
            run_merge(&descriptor, &engine_output, &output, &metadata)
        }
        Commands::Split { length, max_size } => run_split(length, max_size),
        Commands::SplitTable { table, max_size } => run_split_table(&table, max_size),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Translate one descriptor into its three planning artifacts.
///
/// Every artifact is rendered before any is published, so a failing
/// render leaves the output directory untouched.
fn run_plan(descriptor_path: &Path, outdir: &Path) -> Result<(), CliError> {
    let descriptor = RunDescriptor::from_file(descriptor_path)?;
    let job = &descriptor.job;

    let directives = plan::plan_downloads(job);
    tracing::info!(
        directives = directives.len(),
        job_id = job.job_id.as_deref().unwrap_or(""),
        "planned downloads"
    );

    let mut artifacts = ArtifactSet::new();
    artifacts.add(
        DOWNLOAD_LIST_FILENAME,
        plan::render_download_script(&directives),
    );
    artifacts.add(INPUT_MANIFEST_FILENAME, plan::render_manifest(job)?);
    artifacts.add(ENV_FILENAME, plan::render_env(&descriptor));

    artifacts.publish(outdir)?;
    Ok(())
}

/// Merge one engine-output record plus run metadata into a new
/// descriptor, written atomically next to its final path.
fn run_merge(
    descriptor_path: &Path,
    engine_output_path: &Path,
    output_path: &Path,
    metadata: &RunMetadata,
) -> Result<(), CliError> {
    if output_path.file_name().is_none() {
        return Err(CliError::InvalidOutputPath(output_path.to_path_buf()));
    }
    let descriptor = RunDescriptor::from_file(descriptor_path)?;
    let record: serde_json::Value = serde_json::from_slice(&fs::read(engine_output_path)?)?;

    let merged = merge::merge_result(&descriptor, record, metadata)?;
    let body = merged.to_json()?;

    let dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(body.as_bytes())?;
    staged
        .persist(output_path)
        .map_err(|e| CliError::Io(e.error))?;
    Ok(())
}

fn run_split(length: u64, max_size: u64) -> Result<(), CliError> {
    for region in interval::partition(length, max_size)? {
        println!("{}", region);
    }
    Ok(())
}

fn run_split_table(table_path: &Path, max_size: u64) -> Result<(), CliError> {
    let table = fs::read_to_string(table_path)?;
    let rows = interval::parse_table(&table)?;
    for token in interval::partition_table(&rows, max_size)? {
        println!("{}", token);
    }
    Ok(())
}
