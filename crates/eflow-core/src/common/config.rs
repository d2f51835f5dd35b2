//! Discovery settings for one job-preparation run.
//!
//! Every field has a default matching the Run 3 prompt ntuple production, so a
//! partial JSON file (or none at all) is enough; CLI flags override fields
//! after loading.

use crate::domain::{EflowError, EflowResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "/eos/cms/store/group/dpg_ecal/alca_ecalcalib/ecalelf/ntuples/13.6TeV/";
pub const DEFAULT_UNMERGED_MARKER: &str = "unmerged";
pub const DEFAULT_FILES_PER_GROUP: usize = 100_000;
pub const DEFAULT_PRIMARY_PATTERN: &str = "*.root";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub input_dir: PathBuf,
    pub unmerged_marker: String,
    pub tags: Vec<String>,
    pub ignored_labels: Vec<String>,
    pub files_per_group: usize,
    pub primary_pattern: String,
    pub auxiliary_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            unmerged_marker: DEFAULT_UNMERGED_MARKER.to_string(),
            tags: vec!["Run2022C".to_string(), "Run2022D".to_string()],
            ignored_labels: vec!["obsolete".to_string(), "failed".to_string()],
            files_per_group: DEFAULT_FILES_PER_GROUP,
            primary_pattern: DEFAULT_PRIMARY_PATTERN.to_string(),
            auxiliary_patterns: vec!["extraCalibTree*".to_string(), "extraStudyTree*".to_string()],
        }
    }
}

impl DiscoveryConfig {
    pub fn load(path: &Path) -> EflowResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| {
            EflowError::io_system(
                "IO.CONFIG_READ",
                format!(
                    "failed to read discovery config '{}': {}",
                    path.display(),
                    source
                ),
            )
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> EflowResult<Self> {
        let config = serde_json::from_str::<Self>(content).map_err(|source| {
            EflowError::input_validation(
                "INPUT.CONFIG_PARSE",
                format!("failed to parse discovery config: {}", source),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EflowResult<()> {
        if self.unmerged_marker.is_empty() {
            return Err(EflowError::input_validation(
                "INPUT.CONFIG_MARKER",
                "unmerged marker must not be empty",
            ));
        }
        if self.tags.iter().any(|tag| tag.is_empty()) {
            return Err(EflowError::input_validation(
                "INPUT.CONFIG_TAGS",
                "tags must not contain empty strings",
            ));
        }
        if self.ignored_labels.iter().any(|label| label.is_empty()) {
            return Err(EflowError::input_validation(
                "INPUT.CONFIG_IGNORED",
                "ignored labels must not contain empty strings",
            ));
        }
        if self.files_per_group == 0 {
            return Err(EflowError::input_validation(
                "INPUT.CONFIG_GROUP_SIZE",
                "filesPerGroup must be a positive integer",
            ));
        }
        Ok(())
    }
}
