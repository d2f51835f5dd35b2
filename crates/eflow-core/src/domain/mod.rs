pub mod errors;

pub use errors::{EflowError, EflowErrorCategory, EflowResult};

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// One unmerged ntuple together with its extra calibration tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePair {
    pub primary: PathBuf,
    pub companion: PathBuf,
}

impl FilePair {
    pub fn new(primary: impl Into<PathBuf>, companion: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            companion: companion.into(),
        }
    }

    pub fn primary_contains(&self, needle: &str) -> bool {
        self.primary.to_string_lossy().contains(needle)
    }
}

/// Unit of work handed to one batch job. Primary and companion views are
/// both derived from `pairs`, so their lengths and boundaries always agree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileGroup {
    pub tag: Option<String>,
    pub pairs: Vec<FilePair>,
}

impl FileGroup {
    pub fn new(pairs: Vec<FilePair>) -> Self {
        Self { tag: None, pairs }
    }

    pub fn tagged(tag: impl Into<String>, pairs: Vec<FilePair>) -> Self {
        Self {
            tag: Some(tag.into()),
            pairs,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn primary_list(&self) -> String {
        join_paths(self.pairs.iter().map(|pair| pair.primary.as_path()))
    }

    pub fn companion_list(&self) -> String {
        join_paths(self.pairs.iter().map(|pair| pair.companion.as_path()))
    }
}

fn join_paths<'a>(paths: impl Iterator<Item = &'a Path>) -> String {
    paths
        .map(|path| path.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Inclusive rectangle of the (ieta, iphi) crystal index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HarnessRange {
    pub ieta_min: i32,
    pub ieta_max: i32,
    pub iphi_min: i32,
    pub iphi_max: i32,
}

impl HarnessRange {
    pub const fn new(ieta_min: i32, ieta_max: i32, iphi_min: i32, iphi_max: i32) -> Self {
        Self {
            ieta_min,
            ieta_max,
            iphi_min,
            iphi_max,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "IEta_{}_{}_IPhi_{}_{}",
            self.ieta_min, self.ieta_max, self.iphi_min, self.iphi_max
        )
    }

    /// Geometry helper: whether crystal `(ieta, iphi)` falls inside this range.
    pub fn contains(&self, ieta: i32, iphi: i32) -> bool {
        (self.ieta_min..=self.ieta_max).contains(&ieta)
            && (self.iphi_min..=self.iphi_max).contains(&iphi)
    }
}

impl Display for HarnessRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    BuildTemplate,
    RunDivide,
    ScaleMonitor,
}

impl Task {
    pub const ALL: [Task; 3] = [Self::BuildTemplate, Self::RunDivide, Self::ScaleMonitor];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BuildTemplate => "buildTemplate",
            Self::RunDivide => "runDivide",
            Self::ScaleMonitor => "scaleMonitor",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|task| task.as_str() == name)
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Ordered, duplicate-free list of tasks passed to the monitoring executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList(Vec<Task>);

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> EflowResult<Self> {
        let mut unique = Vec::with_capacity(tasks.len());
        for task in tasks {
            if !unique.contains(&task) {
                unique.push(task);
            }
        }
        if unique.is_empty() {
            return Err(EflowError::input_validation(
                "INPUT.TASK",
                "task list must name at least one task",
            ));
        }
        Ok(Self(unique))
    }

    pub fn parse(list: &str) -> EflowResult<Self> {
        let tasks = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                Task::from_name(name).ok_or_else(|| {
                    EflowError::input_validation(
                        "INPUT.TASK",
                        format!(
                            "unknown task '{}'; expected one of buildTemplate, runDivide, scaleMonitor",
                            name
                        ),
                    )
                })
            })
            .collect::<EflowResult<Vec<_>>>()?;
        Self::new(tasks)
    }

    pub fn contains(&self, task: Task) -> bool {
        self.0.contains(&task)
    }

    pub fn iter(&self) -> impl Iterator<Item = Task> + '_ {
        self.0.iter().copied()
    }
}

impl Display for TaskList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names = self.iter().map(Task::as_str).collect::<Vec<_>>();
        f.write_str(&names.join(","))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingMode {
    #[default]
    All,
    ByCount(usize),
    ByTag,
}
