use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TEMPLATE: &str = "\
SelectedInputFile = SELECTED_INPUTFILE
ExtraCalibTree = EXTRACALIBTREE_INPUTFILE
IEta = IETAMIN IETAMAX
IPhi = IPHIMIN IPHIMAX
OutputFolder = OUTPUT_FOLDER
";

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().expect("tempdir should be created");
        let workspace = Self { temp };
        write_file(&workspace.template_path(), TEMPLATE);
        workspace
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn data_dir(&self) -> PathBuf {
        self.root().join("data")
    }

    fn out_dir(&self) -> PathBuf {
        self.root().join("out")
    }

    fn template_path(&self) -> PathBuf {
        self.root().join("template.cfg")
    }

    fn job_root(&self, label: &str) -> PathBuf {
        self.out_dir().join("jobs").join(label)
    }

    fn add_ntuple(&self, relative: &str) {
        write_file(&self.data_dir().join(relative), "");
    }

    fn run(&self, extra_args: &[&str]) -> Output {
        let binary_path = env!("CARGO_BIN_EXE_eflow-monitor");
        let mut command = Command::new(binary_path);
        command
            .current_dir(self.root())
            .env_remove("CMSSW_BASE")
            .env_remove("EFLOW_SUBMIT_COMMAND")
            .env_remove("RUST_LOG")
            .arg("--label")
            .arg("test")
            .arg("--outdir")
            .arg(self.out_dir())
            .arg("--cfg")
            .arg(self.template_path())
            .arg("--input-dir")
            .arg(self.data_dir());
        command.args(extra_args);
        command.output().expect("eflow-monitor should run")
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn template_jobs_are_generated_per_module_and_file_batch() {
    let workspace = Workspace::new();
    workspace.add_ntuple("prod/unmerged/Run2022C/ntuple_1.root");
    workspace.add_ntuple("prod/unmerged/Run2022C/ntuple_2.root");
    workspace.add_ntuple("prod/unmerged/Run2022C/extraCalibTree_1.root");
    workspace.add_ntuple("prod/unmerged/Run2022C/extraCalibTree_2.root");

    let output = workspace.run(&[
        "--tag",
        "Run2022C",
        "--task",
        "buildTemplate",
        "--groupByN",
        "--files-per-group",
        "1",
        "--runtime-dir",
        "/cmssw/CMSSW_13_0_3",
        "--exedir",
        "/work/bin",
    ]);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        stderr(&output)
    );
    let job_root = workspace.job_root("test");
    let submit_file = job_root.join("submit_jobs.sub");
    assert!(stdout(&output).contains("Run monitoring on 2 files"));
    assert!(stdout(&output).contains("Generated 16 jobs"));
    assert!(stdout(&output).contains(&format!(
        "SUBMIT COMMAND: condor_submit {}",
        submit_file.display()
    )));

    let submit = fs::read_to_string(&submit_file).expect("submit file should exist");
    assert!(submit.contains(&format!(
        "queue scriptname matching {}/IEta_*_*/job_file_*/*.sh",
        job_root.display()
    )));
    assert!(job_root.join("log").is_dir());

    let job_dir = job_root.join("IEta_66_85_IPhi_1_360/job_file_1");
    let config = fs::read_to_string(job_dir.join("config.cfg")).expect("config should exist");
    assert!(config.contains("ntuple_2.root\n"));
    assert!(!config.contains("ntuple_1.root"));
    assert!(config.contains("extraCalibTree_2.root\n"));
    assert!(config.contains("IEta = 66 85\nIPhi = 1 360\n"));

    let script = fs::read_to_string(job_dir.join("job_file_1.sh")).expect("script should exist");
    assert!(script.contains("cd /cmssw/CMSSW_13_0_3/src\n"));
    assert!(script.contains("/work/bin/LaserMonitoring.exe --cfg "));
    assert!(script.contains(" --buildTemplate\n"));
}

#[test]
fn default_grouping_puts_all_files_in_one_harness_job_set() {
    let workspace = Workspace::new();
    workspace.add_ntuple("unmerged/Run2022C/ntuple_1.root");
    workspace.add_ntuple("unmerged/Run2022D/ntuple_2.root");

    let output = workspace.run(&["--tag", "Run2022C,Run2022D", "--runtime-dir", "/cmssw"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Generated 216 jobs"));
    let job_dir = workspace.job_root("test").join("IEta_1_5_IPhi_1_10/job_file_0");
    let config = fs::read_to_string(job_dir.join("config.cfg")).expect("config should exist");
    let selected = config
        .lines()
        .next()
        .expect("first line")
        .trim_start_matches("SelectedInputFile = ");
    assert_eq!(selected.split(',').count(), 2);
    assert!(!workspace.job_root("test").join("IEta_1_5_IPhi_1_10/job_file_1").exists());
    assert!(workspace.out_dir().join("IEta_1_5_IPhi_1_10").is_dir());
}

#[test]
fn tag_grouping_uses_discovery_config_tags() {
    let workspace = Workspace::new();
    workspace.add_ntuple("unmerged/Run2022C/ntuple_1.root");
    workspace.add_ntuple("unmerged/Run2022D/ntuple_2.root");
    workspace.add_ntuple("unmerged/Run2022D/failed/ntuple_3.root");
    let config_path = workspace.root().join("discovery.json");
    write_file(
        &config_path,
        r#"{ "tags": ["Run2022D", "Run2022E", "Run2022C"], "ignoredLabels": ["failed"] }"#,
    );

    let output = workspace.run(&[
        "--discovery-config",
        config_path.to_str().expect("utf-8 path"),
        "--groupByTag",
        "--task",
        "buildTemplate",
        "--runtime-dir",
        "/cmssw",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Run monitoring on 2 files"));
    assert!(stdout(&output).contains("Generated 16 jobs"));
    let job_root = workspace.job_root("test");
    let first = fs::read_to_string(job_root.join("IEta_1_25_IPhi_1_360/job_file_0/config.cfg"))
        .expect("config should exist");
    let second = fs::read_to_string(job_root.join("IEta_1_25_IPhi_1_360/job_file_1/config.cfg"))
        .expect("config should exist");
    assert!(first.contains("Run2022D/ntuple_2.root"));
    assert!(second.contains("Run2022C/ntuple_1.root"));
    assert!(!job_root.join("IEta_1_25_IPhi_1_360/job_file_2").exists());
}

#[test]
fn no_matching_files_exits_cleanly_without_side_effects() {
    let workspace = Workspace::new();
    workspace.add_ntuple("unmerged/Run2022C/ntuple_1.root");

    let output = workspace.run(&["--tag", "Run2099Z", "--runtime-dir", "/cmssw"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No input files found"));
    assert!(!workspace.out_dir().exists());
}

#[test]
fn no_matching_files_exits_cleanly_even_without_runtime_dir() {
    let workspace = Workspace::new();
    workspace.add_ntuple("unmerged/Run2022C/ntuple_1.root");

    let output = workspace.run(&["--tag", "Run2099Z"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No input files found"));
    assert!(!stderr(&output).contains("CMSSW_BASE"));
}

#[test]
fn unknown_task_is_rejected_before_discovery() {
    let workspace = Workspace::new();

    let output = workspace.run(&["--task", "runDivide,fitEverything", "--runtime-dir", "/cmssw"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ERROR: [INPUT.TASK]"));
    assert!(stderr(&output).contains("FATAL EXIT CODE: 2"));
}

#[test]
fn grouping_flags_are_mutually_exclusive() {
    let workspace = Workspace::new();

    let output = workspace.run(&["--groupByTag", "--groupByN", "--runtime-dir", "/cmssw"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ERROR: [INPUT.CLI_USAGE]"));
}

#[test]
fn missing_runtime_dir_is_a_usage_error() {
    let workspace = Workspace::new();
    workspace.add_ntuple("unmerged/Run2022C/ntuple_1.root");

    let output = workspace.run(&["--tag", "Run2022C"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("CMSSW_BASE"));
    assert!(!workspace.out_dir().exists());
}

#[test]
fn missing_template_aborts_before_creating_jobs() {
    let workspace = Workspace::new();
    workspace.add_ntuple("unmerged/Run2022C/ntuple_1.root");
    fs::remove_file(workspace.template_path()).expect("template should be removed");

    let output = workspace.run(&["--tag", "Run2022C", "--runtime-dir", "/cmssw"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("ERROR: [IO.TEMPLATE_READ]"));
    assert!(!workspace.job_root("test").exists());
}

#[cfg(unix)]
#[test]
fn submit_runs_the_configured_command_and_reports_failures() {
    let workspace = Workspace::new();
    workspace.add_ntuple("unmerged/Run2022C/ntuple_1.root");
    let common = [
        "--tag",
        "Run2022C",
        "--task",
        "buildTemplate",
        "--runtime-dir",
        "/cmssw",
        "--submit",
    ];

    let mut accepted = common.to_vec();
    accepted.extend(["--submit-command", "true"]);
    let output = workspace.run(&accepted);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("SUBMIT COMMAND: true "));

    let mut rejected = common.to_vec();
    rejected.extend(["--submit-command", "false"]);
    let output = workspace.run(&rejected);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("ERROR: [RUN.SUBMIT]"));
}
