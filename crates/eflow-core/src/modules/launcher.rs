use crate::domain::TaskList;
use std::path::{Path, PathBuf};

pub const MONITORING_EXECUTABLE: &str = "LaserMonitoring.exe";

/// Where the launcher finds the CMSSW release and the monitoring binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherEnvironment {
    pub runtime_dir: PathBuf,
    pub executable_dir: PathBuf,
}

impl LauncherEnvironment {
    pub fn new(runtime_dir: impl Into<PathBuf>, executable_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime_dir: runtime_dir.into(),
            executable_dir: executable_dir.into(),
        }
    }

    pub fn executable(&self) -> PathBuf {
        self.executable_dir.join(MONITORING_EXECUTABLE)
    }
}

pub fn render_launcher(
    environment: &LauncherEnvironment,
    config_path: &Path,
    tasks: &TaskList,
) -> String {
    let mut script = String::new();
    script.push_str("#!/bin/bash\n");
    script.push_str(&format!(
        "cd {}\n",
        environment.runtime_dir.join("src").display()
    ));
    script.push_str("eval `scram runtime -sh`\n");
    script.push_str("cd -\n");
    script.push_str("echo $PWD\n");
    script.push_str(&format!(
        "{} --cfg {}",
        environment.executable().display(),
        config_path.display()
    ));
    for task in tasks.iter() {
        script.push_str(&format!(" --{}", task));
    }
    script.push('\n');
    script.push_str("echo finish\n");
    script
}
