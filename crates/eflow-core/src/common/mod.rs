pub mod config;
pub mod geometry;

pub use config::DiscoveryConfig;
pub use geometry::{HarnessLayout, harness_ranges, module_ranges};
