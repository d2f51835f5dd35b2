mod commands;
mod helpers;

use clap::Parser;
use eflow_core::domain::EflowError;
use std::path::PathBuf;

pub fn run_from_env() -> i32 {
    let args = std::env::args().collect::<Vec<_>>();
    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_eflow_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            eprintln!("{}", diagnostic.fatal_exit_line());
            diagnostic.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => commands::run_prepare_command(cli),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// Prepare HTCondor jobs for ECAL harness laser monitoring.
#[derive(Parser, Debug)]
#[command(name = "eflow-monitor", version, about = "Prepare ECAL harness monitoring jobs for HTCondor")]
pub(crate) struct Cli {
    /// Submit jobs after generating them
    #[arg(long)]
    submit: bool,

    /// Condor job flavour: espresso, longlunch, workday...
    #[arg(short = 'q', long = "queue", default_value = "workday")]
    queue: String,

    /// Job label
    #[arg(short = 'l', long)]
    label: String,

    /// Verbosity level
    #[arg(short = 'v', long, default_value_t = 1)]
    verbosity: u8,

    /// Output directory
    #[arg(short = 'o', long, default_value = "./")]
    outdir: PathBuf,

    /// Executable directory
    #[arg(short = 'e', long, default_value = "./bin/")]
    exedir: PathBuf,

    /// Template config file
    #[arg(short = 'c', long = "cfg")]
    config_file: PathBuf,

    /// Tasks to run: buildTemplate, runDivide, scaleMonitor
    #[arg(short = 't', long = "task", default_value = "runDivide,scaleMonitor")]
    task_list: String,

    /// Run endcap calibration
    #[arg(long = "EE")]
    ee: bool,

    /// Submit to CAF queues (only from lxplus-t0)
    #[arg(long)]
    tier0: bool,

    /// Group files by tag, eg Run2018C, Run2018D...
    #[arg(long = "groupByTag", alias = "group-by-tag", conflicts_with = "group_by_n")]
    group_by_tag: bool,

    /// Group files in batches of a fixed number
    #[arg(long = "groupByN", alias = "group-by-n")]
    group_by_n: bool,

    /// JSON discovery settings (input directory, tags, ignored labels, batch size)
    #[arg(long)]
    discovery_config: Option<PathBuf>,

    /// Parent folder containing the ntuples
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Tag identifying the ntuples of interest (repeatable or comma separated)
    #[arg(long = "tag", value_delimiter = ',')]
    tags: Vec<String>,

    /// Path label marking ntuples to ignore (repeatable or comma separated)
    #[arg(long = "ignore", value_delimiter = ',')]
    ignored_labels: Vec<String>,

    /// Number of files per batch with --groupByN
    #[arg(long)]
    files_per_group: Option<usize>,

    /// CMSSW release area sourced by every job
    #[arg(long, env = "CMSSW_BASE")]
    runtime_dir: Option<PathBuf>,

    /// Command used to submit the generated submit file
    #[arg(long, env = "EFLOW_SUBMIT_COMMAND", default_value = "condor_submit")]
    submit_command: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Run(EflowError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_eflow_error(&self) -> EflowError {
        match self {
            Self::Usage(message) => EflowError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Run(error) => error.clone(),
            Self::Internal(error) => EflowError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

impl From<EflowError> for CliError {
    fn from(error: EflowError) -> Self {
        Self::Run(error)
    }
}
