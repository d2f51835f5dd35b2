pub mod discovery;
pub mod generation;
pub mod grouping;
pub mod launcher;
pub mod serialization;
pub mod submit;
pub mod template;

pub use discovery::{TagFilter, companion_path, discover};
pub use generation::{GenerationSummary, JobGenerator, JobLayout, JobSpec, read_template};
pub use grouping::{group, group_all, group_by_count, group_by_tag};
pub use launcher::LauncherEnvironment;
pub use submit::{SubmitOptions, script_glob};
pub use template::{Substitutions, render};
