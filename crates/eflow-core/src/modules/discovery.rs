use crate::common::DiscoveryConfig;
use crate::domain::{EflowError, EflowResult, FilePair};
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub const PRIMARY_PREFIX: &str = "ntuple";
pub const COMPANION_PREFIX: &str = "extraCalibTree";

/// Path selection rules applied to every file below the input directory.
pub struct TagFilter {
    unmerged_marker: String,
    tags: Vec<String>,
    ignored_labels: Vec<String>,
    primary: GlobMatcher,
    auxiliary: GlobSet,
}

impl TagFilter {
    pub fn from_config(config: &DiscoveryConfig) -> EflowResult<Self> {
        let primary = compile_glob(&config.primary_pattern)?.compile_matcher();
        let mut auxiliary = GlobSetBuilder::new();
        for pattern in &config.auxiliary_patterns {
            auxiliary.add(compile_glob(pattern)?);
        }
        let auxiliary = auxiliary.build().map_err(|source| {
            EflowError::input_validation(
                "INPUT.DISCOVERY_PATTERN",
                format!("failed to build auxiliary file patterns: {}", source),
            )
        })?;

        Ok(Self {
            unmerged_marker: config.unmerged_marker.clone(),
            tags: config.tags.clone(),
            ignored_labels: config.ignored_labels.clone(),
            primary,
            auxiliary,
        })
    }

    /// File-name check: a data file that is not itself an auxiliary tree.
    pub fn is_primary_name(&self, file_name: &str) -> bool {
        self.primary.is_match(file_name) && !self.auxiliary.is_match(file_name)
    }

    /// Path check: unmerged, tagged, and not carrying any ignored label.
    pub fn accepts_path(&self, path: &str) -> bool {
        path.contains(&self.unmerged_marker)
            && self.tags.iter().any(|tag| path.contains(tag.as_str()))
            && !self
                .ignored_labels
                .iter()
                .any(|label| path.contains(label.as_str()))
    }

    pub fn accepts(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        self.is_primary_name(file_name) && self.accepts_path(&path.to_string_lossy())
    }
}

fn compile_glob(pattern: &str) -> EflowResult<Glob> {
    Glob::new(pattern).map_err(|source| {
        EflowError::input_validation(
            "INPUT.DISCOVERY_PATTERN",
            format!("invalid file pattern '{}': {}", pattern, source),
        )
    })
}

/// Extra calibration tree living next to `primary`.
///
/// `ntuple_12.root` maps to `extraCalibTree_12.root`; a name without the
/// `ntuple` prefix gets `extraCalibTree_` prepended.
pub fn companion_path(primary: &Path) -> PathBuf {
    let file_name = primary
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let companion_name = match file_name.strip_prefix(PRIMARY_PREFIX) {
        Some(rest) => format!("{}{}", COMPANION_PREFIX, rest),
        None => format!("{}_{}", COMPANION_PREFIX, file_name),
    };
    primary.with_file_name(companion_name)
}

/// Walks `config.input_dir` and returns every selected ntuple paired with its
/// companion, in file-name order at each directory level. An empty result is
/// not an error here; callers decide how to react.
///
/// Paths are matched as reached from the input directory, without resolving
/// symlinks. Symlinked files are followed; symlinked directories are not.
pub fn discover(config: &DiscoveryConfig) -> EflowResult<Vec<FilePair>> {
    let filter = TagFilter::from_config(config)?;
    let root = std::path::absolute(&config.input_dir).map_err(|source| {
        EflowError::io_system(
            "IO.DISCOVERY_ROOT",
            format!(
                "failed to resolve input directory '{}': {}",
                config.input_dir.display(),
                source
            ),
        )
    })?;
    if !root.is_dir() {
        return Err(EflowError::io_system(
            "IO.DISCOVERY_ROOT",
            format!("input directory '{}' does not exist", root.display()),
        ));
    }

    let mut pairs = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|source| {
            EflowError::io_system(
                "IO.DISCOVERY_WALK",
                format!("failed to walk '{}': {}", root.display(), source),
            )
        })?;
        if !entry.path().is_file() {
            continue;
        }
        if filter.accepts(entry.path()) {
            debug!(path = %entry.path().display(), "selected input file");
            let primary = entry.into_path();
            let companion = companion_path(&primary);
            pairs.push(FilePair { primary, companion });
        }
    }

    info!(
        root = %root.display(),
        files = pairs.len(),
        "input discovery finished"
    );
    Ok(pairs)
}
