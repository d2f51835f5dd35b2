use crate::domain::{EflowError, EflowResult, FileGroup, FilePair, GroupingMode};
use tracing::warn;

pub fn group(
    pairs: &[FilePair],
    mode: GroupingMode,
    tags: &[String],
) -> EflowResult<Vec<FileGroup>> {
    match mode {
        GroupingMode::All => Ok(group_all(pairs)),
        GroupingMode::ByCount(count) => group_by_count(pairs, count),
        GroupingMode::ByTag => Ok(group_by_tag(pairs, tags)),
    }
}

/// Consecutive chunks of at most `count` pairs; only the last may be short.
pub fn group_by_count(pairs: &[FilePair], count: usize) -> EflowResult<Vec<FileGroup>> {
    if count == 0 {
        return Err(EflowError::input_validation(
            "INPUT.GROUP_SIZE",
            "files per group must be a positive integer",
        ));
    }
    Ok(pairs
        .chunks(count)
        .map(|chunk| FileGroup::new(chunk.to_vec()))
        .collect())
}

pub fn group_all(pairs: &[FilePair]) -> Vec<FileGroup> {
    if pairs.is_empty() {
        return Vec::new();
    }
    vec![FileGroup::new(pairs.to_vec())]
}

/// One group per tag, in tag order. A pair whose primary path carries several
/// tags lands in each of their groups. Tags without files yield no group.
pub fn group_by_tag(pairs: &[FilePair], tags: &[String]) -> Vec<FileGroup> {
    let mut groups = Vec::with_capacity(tags.len());
    for tag in tags {
        let members = pairs
            .iter()
            .filter(|pair| pair.primary_contains(tag))
            .cloned()
            .collect::<Vec<_>>();
        if members.is_empty() {
            warn!(tag = %tag, "no input files carry tag; skipping group");
            continue;
        }
        groups.push(FileGroup::tagged(tag.clone(), members));
    }
    groups
}
