use super::helpers::*;
use super::{Cli, CliError};
use eflow_core::common::HarnessLayout;
use eflow_core::domain::{EflowError, TaskList};
use eflow_core::modules::{
    JobGenerator, JobLayout, LauncherEnvironment, SubmitOptions, discover, group, read_template,
};
use tracing::{info, warn};

pub(super) fn run_prepare_command(cli: Cli) -> Result<i32, CliError> {
    init_logging(cli.verbosity);

    let tasks = TaskList::parse(&cli.task_list)?;
    let config = load_discovery_config(&cli)?;
    let mode = grouping_mode(&cli, &config);

    let pairs = discover(&config)?;
    if pairs.is_empty() {
        println!(
            "No input files found in '{}' --> EXIT",
            config.input_dir.display()
        );
        return Ok(0);
    }
    let runtime_dir = cli.runtime_dir.clone().ok_or_else(|| {
        CliError::Usage(
            "no CMSSW release area given; pass --runtime-dir or set CMSSW_BASE".to_string(),
        )
    })?;

    println!(
        "Run monitoring on {} files: {}",
        pairs.len(),
        config.input_dir.display()
    );
    log_selected_files(&pairs);

    let groups = group(&pairs, mode, &config.tags)?;
    log_groups(&groups);
    if groups.is_empty() {
        return Err(CliError::Run(EflowError::input_validation(
            "INPUT.GROUPING",
            "file grouping produced no groups",
        )));
    }

    let template = read_template(&cli.config_file)?;
    let outdir = resolve_cli_path(&cli.outdir)?;
    let layout = JobLayout::new(&outdir, &cli.label)?;
    let environment =
        LauncherEnvironment::new(resolve_cli_path(&runtime_dir)?, resolve_cli_path(&cli.exedir)?);
    let submit = SubmitOptions {
        queue: cli.queue.clone(),
        tier0: cli.tier0,
    };

    if cli.ee {
        warn!("endcap harness layout is not available; generating barrel ranges");
    }
    let ranges = HarnessLayout::for_tasks(&tasks).ranges();

    info!(tasks = %tasks, ranges = ranges.len(), groups = groups.len(), "generating jobs");
    let generator = JobGenerator {
        layout: &layout,
        groups: &groups,
        ranges: &ranges,
        template: &template,
        tasks: &tasks,
        environment: &environment,
        submit: &submit,
    };
    let summary = generator.write()?;
    println!(
        "Generated {} jobs under {}",
        summary.job_count,
        layout.job_root.display()
    );

    println!(
        "SUBMIT COMMAND: {} {}",
        cli.submit_command,
        summary.submit_file.display()
    );
    if cli.submit {
        run_submit_command(&cli.submit_command, &summary.submit_file)?;
    }
    Ok(0)
}
