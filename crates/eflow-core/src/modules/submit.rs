use crate::domain::{Task, TaskList};
use std::path::Path;

pub const SUBMIT_FILE_NAME: &str = "submit_jobs.sub";
pub const CAF_ACCOUNTING_GROUP: &str = "group_u_CMS.CAF.ALCA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOptions {
    pub queue: String,
    pub tier0: bool,
}

/// Pattern matching every launcher of a run. Module jobs (template building)
/// carry no separate phi suffix in the matched directory level.
pub fn script_glob(job_root: &Path, tasks: &TaskList) -> String {
    let root = job_root.to_string_lossy();
    let root = root.trim_end_matches('/');
    if tasks.contains(Task::BuildTemplate) {
        format!("{}/IEta_*_*/job_file_*/*.sh", root)
    } else {
        format!("{}/IEta_*_*_IPhi_*_*/job_file_*/*.sh", root)
    }
}

pub fn render_submit_file(job_root: &Path, tasks: &TaskList, options: &SubmitOptions) -> String {
    let mut submit = String::new();
    submit.push_str("executable            = $(scriptname)\n");
    submit.push_str("output                = $(scriptname).$(ClusterId).out\n");
    submit.push_str("error                 = $(scriptname).$(ClusterId).err\n");
    submit.push_str(&format!(
        "log                   = {}\n",
        job_root.join("log").join("log.$(ClusterId).log").display()
    ));
    submit.push_str(&format!("+JobFlavour           = \"{}\"\n", options.queue));
    if options.tier0 {
        submit.push_str(&format!(
            "+AccountingGroup      = \"{}\"\n",
            CAF_ACCOUNTING_GROUP
        ));
    }
    submit.push_str(&format!(
        "queue scriptname matching {}\n",
        script_glob(job_root, tasks)
    ));
    submit
}

#[cfg(test)]
mod tests {
    use super::{SubmitOptions, render_submit_file, script_glob};
    use crate::domain::TaskList;
    use std::path::Path;

    #[test]
    fn monitoring_submit_file_matches_harness_directories() {
        let tasks = TaskList::parse("runDivide,scaleMonitor").expect("valid tasks");
        let options = SubmitOptions {
            queue: "workday".to_string(),
            tier0: false,
        };

        let submit = render_submit_file(Path::new("/jobs/Run2022"), &tasks, &options);
        assert_eq!(
            submit,
            "executable            = $(scriptname)\n\
             output                = $(scriptname).$(ClusterId).out\n\
             error                 = $(scriptname).$(ClusterId).err\n\
             log                   = /jobs/Run2022/log/log.$(ClusterId).log\n\
             +JobFlavour           = \"workday\"\n\
             queue scriptname matching /jobs/Run2022/IEta_*_*_IPhi_*_*/job_file_*/*.sh\n"
        );
    }

    #[test]
    fn tier0_adds_accounting_group_and_template_glob_is_shallower() {
        let tasks = TaskList::parse("buildTemplate").expect("valid tasks");
        let options = SubmitOptions {
            queue: "longlunch".to_string(),
            tier0: true,
        };

        let submit = render_submit_file(Path::new("/jobs/templates/"), &tasks, &options);
        assert!(submit.contains("+JobFlavour           = \"longlunch\"\n"));
        assert!(submit.contains("+AccountingGroup      = \"group_u_CMS.CAF.ALCA\"\n"));
        assert!(submit.ends_with("queue scriptname matching /jobs/templates/IEta_*_*/job_file_*/*.sh\n"));
        assert_eq!(
            script_glob(Path::new("/jobs/templates/"), &tasks),
            "/jobs/templates/IEta_*_*/job_file_*/*.sh"
        );
    }
}
