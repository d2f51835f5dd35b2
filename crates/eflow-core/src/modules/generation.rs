//! Per-job configuration, launcher and submit-file generation.
//!
//! Jobs are enumerated group-major: every harness range for group 0, then
//! every range for group 1, and so on. Any filesystem failure aborts the run
//! immediately and leaves what was already written on disk.

use crate::domain::{EflowError, EflowResult, FileGroup, HarnessRange, TaskList};
use crate::modules::launcher::{LauncherEnvironment, render_launcher};
use crate::modules::serialization::{write_executable_artifact, write_text_artifact};
use crate::modules::submit::{SUBMIT_FILE_NAME, SubmitOptions, render_submit_file};
use crate::modules::template::{job_substitutions, render};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "config.cfg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLayout {
    pub job_root: PathBuf,
    pub output_root: PathBuf,
}

impl JobLayout {
    /// Jobs live under `<outdir>/jobs/<label>`, outputs under `<outdir>/<range>`.
    pub fn new(outdir: &Path, label: &str) -> EflowResult<Self> {
        if label.trim().is_empty() {
            return Err(EflowError::input_validation(
                "INPUT.LABEL",
                "job label must not be empty",
            ));
        }
        if label.contains('/') || label.contains('\\') || label == "." || label == ".." {
            return Err(EflowError::input_validation(
                "INPUT.LABEL",
                format!("job label '{}' must be a single path component", label),
            ));
        }
        Ok(Self {
            job_root: outdir.join("jobs").join(label),
            output_root: outdir.to_path_buf(),
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.job_root.join("log")
    }

    pub fn submit_file(&self) -> PathBuf {
        self.job_root.join(SUBMIT_FILE_NAME)
    }

    pub fn job_dir(&self, range: &HarnessRange, group_index: usize) -> PathBuf {
        self.job_root
            .join(range.label())
            .join(format!("job_file_{}", group_index))
    }

    pub fn output_folder(&self, range: &HarnessRange) -> PathBuf {
        self.output_root.join(range.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub group_index: usize,
    pub range: HarnessRange,
    pub job_dir: PathBuf,
    pub config_path: PathBuf,
    pub script_path: PathBuf,
    pub output_folder: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub job_count: usize,
    pub submit_file: PathBuf,
}

pub struct JobGenerator<'a> {
    pub layout: &'a JobLayout,
    pub groups: &'a [FileGroup],
    pub ranges: &'a [HarnessRange],
    pub template: &'a str,
    pub tasks: &'a TaskList,
    pub environment: &'a LauncherEnvironment,
    pub submit: &'a SubmitOptions,
}

impl JobGenerator<'_> {
    pub fn job_count(&self) -> usize {
        self.groups.len() * self.ranges.len()
    }

    pub fn jobs(&self) -> impl Iterator<Item = JobSpec> + '_ {
        (0..self.groups.len()).flat_map(move |group_index| {
            self.ranges.iter().map(move |range| {
                let job_dir = self.layout.job_dir(range, group_index);
                JobSpec {
                    group_index,
                    range: *range,
                    config_path: job_dir.join(CONFIG_FILE_NAME),
                    script_path: job_dir.join(format!("job_file_{}.sh", group_index)),
                    output_folder: self.layout.output_folder(range),
                    job_dir,
                }
            })
        })
    }

    pub fn render_config(&self, job: &JobSpec) -> EflowResult<String> {
        let group = self.groups.get(job.group_index).ok_or_else(|| {
            EflowError::internal(
                "SYS.JOB_GROUP",
                format!("job references missing file group {}", job.group_index),
            )
        })?;
        let substitutions =
            job_substitutions(group, job.group_index, &job.range, &job.output_folder);
        render(self.template, &substitutions)
    }

    pub fn render_launcher(&self, job: &JobSpec) -> String {
        render_launcher(self.environment, &job.config_path, self.tasks)
    }

    pub fn render_submit(&self) -> String {
        render_submit_file(&self.layout.job_root, self.tasks, self.submit)
    }

    pub fn write(&self) -> EflowResult<GenerationSummary> {
        create_dir(&self.layout.log_dir(), "IO.JOB_LOG_DIR")?;

        let mut job_count = 0;
        let mut current_group = None;
        for job in self.jobs() {
            if current_group != Some(job.group_index) {
                current_group = Some(job.group_index);
                info!(
                    group = job.group_index,
                    files = self.groups[job.group_index].len(),
                    "generating jobs for file group"
                );
            }
            debug!(range = %job.range, job_dir = %job.job_dir.display(), "generating job");

            create_dir(&job.job_dir, "IO.JOB_DIR")?;
            create_dir(&job.output_folder, "IO.OUTPUT_DIR")?;

            let config = self.render_config(&job)?;
            write_text_artifact(&job.config_path, &config)
                .map_err(|source| write_error("IO.JOB_CONFIG", &job.config_path, source))?;

            let script = self.render_launcher(&job);
            write_executable_artifact(&job.script_path, &script)
                .map_err(|source| write_error("IO.JOB_SCRIPT", &job.script_path, source))?;
            job_count += 1;
        }

        let submit_file = self.layout.submit_file();
        write_text_artifact(&submit_file, &self.render_submit())
            .map_err(|source| write_error("IO.SUBMIT_FILE", &submit_file, source))?;

        info!(
            jobs = job_count,
            submit_file = %submit_file.display(),
            "job generation finished"
        );
        Ok(GenerationSummary {
            job_count,
            submit_file,
        })
    }
}

pub fn read_template(path: &Path) -> EflowResult<String> {
    fs::read_to_string(path).map_err(|source| {
        EflowError::io_system(
            "IO.TEMPLATE_READ",
            format!("failed to read template config '{}': {}", path.display(), source),
        )
    })
}

fn create_dir(path: &Path, placeholder: &'static str) -> EflowResult<()> {
    fs::create_dir_all(path).map_err(|source| {
        EflowError::io_system(
            placeholder,
            format!("failed to create directory '{}': {}", path.display(), source),
        )
    })
}

fn write_error(placeholder: &'static str, path: &Path, source: std::io::Error) -> EflowError {
    EflowError::io_system(
        placeholder,
        format!("failed to write '{}': {}", path.display(), source),
    )
}
