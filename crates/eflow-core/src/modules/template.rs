use crate::domain::{EflowError, EflowResult, FileGroup, HarnessRange};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::Path;

pub const SELECTED_INPUTFILE: &str = "SELECTED_INPUTFILE";
pub const EXTRACALIBTREE_INPUTFILE: &str = "EXTRACALIBTREE_INPUTFILE";
pub const IETAMIN: &str = "IETAMIN";
pub const IETAMAX: &str = "IETAMAX";
pub const IPHIMIN: &str = "IPHIMIN";
pub const IPHIMAX: &str = "IPHIMAX";
pub const OUTPUT_RUNDIVIDE: &str = "OUTPUT_RUNDIVIDE";
pub const OUTPUT_SCALEMONITORING: &str = "OUTPUT_SCALEMONITORING";
pub const OUTPUT_FOLDER: &str = "OUTPUT_FOLDER";

/// Placeholder token to replacement value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitutions {
    values: BTreeMap<&'static str, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, token: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.insert(token, value.into());
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn pattern(&self) -> EflowResult<Option<Regex>> {
        let mut tokens = self
            .values
            .keys()
            .filter(|token| !token.is_empty())
            .copied()
            .collect::<Vec<_>>();
        if tokens.is_empty() {
            return Ok(None);
        }
        // Longest first so the alternation prefers e.g. IETAMAX_X over IETAMAX.
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = tokens
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternation).map(Some).map_err(|source| {
            EflowError::internal(
                "SYS.TEMPLATE_PATTERN",
                format!("failed to compile placeholder pattern: {}", source),
            )
        })
    }
}

/// Replaces every placeholder occurrence in one left-to-right pass.
/// Inserted values are never rescanned.
pub fn render(text: &str, substitutions: &Substitutions) -> EflowResult<String> {
    let Some(pattern) = substitutions.pattern()? else {
        return Ok(text.to_string());
    };
    Ok(pattern
        .replace_all(text, |captures: &Captures<'_>| {
            let token = &captures[0];
            substitutions.get(token).unwrap_or(token).to_string()
        })
        .into_owned())
}

pub fn job_substitutions(
    group: &FileGroup,
    group_index: usize,
    range: &HarnessRange,
    output_folder: &Path,
) -> Substitutions {
    let folder = output_folder.to_string_lossy();
    let folder = folder.trim_end_matches('/');
    let mut substitutions = Substitutions::new();
    substitutions
        .set(SELECTED_INPUTFILE, group.primary_list())
        .set(EXTRACALIBTREE_INPUTFILE, group.companion_list())
        .set(IETAMIN, range.ieta_min.to_string())
        .set(IETAMAX, range.ieta_max.to_string())
        .set(IPHIMIN, range.iphi_min.to_string())
        .set(IPHIMAX, range.iphi_max.to_string())
        .set(
            OUTPUT_RUNDIVIDE,
            format!("{}/out_file_{}_runranges.root", folder, group_index),
        )
        .set(
            OUTPUT_SCALEMONITORING,
            format!("{}/out_file_{}_scalemonitoring.root", folder, group_index),
        )
        .set(OUTPUT_FOLDER, format!("{}/", folder));
    substitutions
}
