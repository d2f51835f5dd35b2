use super::{Cli, CliError};
use anyhow::Context;
use eflow_core::common::DiscoveryConfig;
use eflow_core::domain::{EflowError, EflowResult, FileGroup, FilePair, GroupingMode};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(super) fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn resolve_cli_path(path: &Path) -> Result<PathBuf, CliError> {
    std::path::absolute(path)
        .with_context(|| format!("failed to resolve path '{}'", path.display()))
        .map_err(CliError::from)
}

/// Defaults, then the optional JSON file, then individual CLI overrides.
pub(super) fn load_discovery_config(cli: &Cli) -> EflowResult<DiscoveryConfig> {
    let mut config = match &cli.discovery_config {
        Some(path) => DiscoveryConfig::load(path)?,
        None => DiscoveryConfig::default(),
    };
    if let Some(input_dir) = &cli.input_dir {
        config.input_dir = input_dir.clone();
    }
    if !cli.tags.is_empty() {
        config.tags = cli.tags.clone();
    }
    if !cli.ignored_labels.is_empty() {
        config.ignored_labels = cli.ignored_labels.clone();
    }
    if let Some(files_per_group) = cli.files_per_group {
        config.files_per_group = files_per_group;
    }
    config.validate()?;
    Ok(config)
}

pub(super) fn grouping_mode(cli: &Cli, config: &DiscoveryConfig) -> GroupingMode {
    if cli.group_by_tag {
        GroupingMode::ByTag
    } else if cli.group_by_n {
        GroupingMode::ByCount(config.files_per_group)
    } else {
        GroupingMode::All
    }
}

pub(super) fn log_selected_files(pairs: &[FilePair]) {
    for pair in pairs {
        info!(file = %pair.primary.display(), "selected ntuple");
    }
    for pair in pairs {
        info!(file = %pair.companion.display(), "auto-generated extraCalibTree");
    }
}

pub(super) fn log_groups(groups: &[FileGroup]) {
    for (index, group) in groups.iter().enumerate() {
        info!(
            group = index,
            tag = group.tag.as_deref().unwrap_or("-"),
            files = group.len(),
            "grouped files"
        );
    }
}

pub(super) fn run_submit_command(program: &str, submit_file: &Path) -> EflowResult<()> {
    let status = Command::new(program)
        .arg(submit_file)
        .status()
        .map_err(|source| {
            EflowError::submission(
                "RUN.SUBMIT_EXEC",
                format!("failed to execute '{}': {}", program, source),
            )
        })?;

    if status.success() {
        return Ok(());
    }

    let status_text = status.code().map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {}", code),
    );
    Err(EflowError::submission(
        "RUN.SUBMIT",
        format!("'{} {}' failed with {}", program, submit_file.display(), status_text),
    ))
}
