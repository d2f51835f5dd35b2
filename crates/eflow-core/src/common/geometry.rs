//! ECAL barrel partitions used to split calibration work.
//!
//! The barrel spans `ieta` in `[-85, -1] ∪ [1, 85]` and `iphi` in `[1, 360]`.
//! Laser harnesses are 20 crystals wide in phi, except next to `ieta = 0`
//! where they are 10 wide; modules span the full phi ring.

use crate::domain::{HarnessRange, Task, TaskList};

pub const IETA_MAX: i32 = 85;
pub const IPHI_MIN: i32 = 1;
pub const IPHI_MAX: i32 = 360;

const HARNESS_ETA_BANDS: [(i32, i32); 10] = [
    (-85, -66),
    (-65, -46),
    (-45, -26),
    (-25, -6),
    (-5, -1),
    (1, 5),
    (6, 25),
    (26, 45),
    (46, 65),
    (66, 85),
];

const MODULE_ETA_BANDS: [(i32, i32); 8] = [
    (-85, -66),
    (-65, -46),
    (-45, -26),
    (-25, -1),
    (1, 25),
    (26, 45),
    (46, 65),
    (66, 85),
];

const INNER_HARNESS_PHI_WIDTH: i32 = 10;
const OUTER_HARNESS_PHI_WIDTH: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessLayout {
    Harness,
    Module,
}

impl HarnessLayout {
    /// Template building needs one job per module, everything else runs per harness.
    pub fn for_tasks(tasks: &TaskList) -> Self {
        if tasks.contains(Task::BuildTemplate) {
            Self::Module
        } else {
            Self::Harness
        }
    }

    pub fn ranges(self) -> Vec<HarnessRange> {
        match self {
            Self::Harness => harness_ranges(),
            Self::Module => module_ranges(),
        }
    }
}

pub fn harness_ranges() -> Vec<HarnessRange> {
    let mut ranges = Vec::new();
    for (eta_min, eta_max) in HARNESS_ETA_BANDS {
        let width = if eta_min.abs().max(eta_max.abs()) <= 5 {
            INNER_HARNESS_PHI_WIDTH
        } else {
            OUTER_HARNESS_PHI_WIDTH
        };
        let mut phi_min = IPHI_MIN;
        while phi_min <= IPHI_MAX {
            let phi_max = (phi_min + width - 1).min(IPHI_MAX);
            ranges.push(HarnessRange::new(eta_min, eta_max, phi_min, phi_max));
            phi_min = phi_max + 1;
        }
    }
    ranges
}

pub fn module_ranges() -> Vec<HarnessRange> {
    MODULE_ETA_BANDS
        .iter()
        .map(|&(eta_min, eta_max)| HarnessRange::new(eta_min, eta_max, IPHI_MIN, IPHI_MAX))
        .collect()
}
