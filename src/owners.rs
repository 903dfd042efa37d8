use std::collections::BTreeMap;

use crate::model::{
    CronJobData, DaemonSetData, DeploymentData, JobData, NodeData, PodData, ServiceData,
    StatefulSetData, VolcanoJobData,
};

pub const VOLCANO_JOB_LABEL: &str = "volcano.sh/job-name";

/// Matches controllers to their pods. The snapshot carries no owner-reference
/// graph, so the heuristic resolver goes by label or name prefix, and a
/// prefix such as `train` also claims the pods of `train-v2`.
pub trait OwnerResolver {
    /// Label match first; name prefix only when no pod carries the label.
    fn pods_for_volcano_job<'a>(&self, job: &VolcanoJobData, pods: &'a [PodData])
    -> Vec<&'a PodData>;

    fn pods_for_job<'a>(&self, job: &JobData, pods: &'a [PodData]) -> Vec<&'a PodData>;

    fn jobs_for_cronjob<'a>(&self, cronjob: &CronJobData, jobs: &'a [JobData])
    -> Vec<&'a JobData>;

    fn pods_for_selector<'a>(
        &self,
        namespace: &str,
        selector: &BTreeMap<String, String>,
        pods: &'a [PodData],
    ) -> Vec<&'a PodData>;

    fn pods_on_node<'a>(&self, node: &NodeData, pods: &'a [PodData]) -> Vec<&'a PodData>;

    fn pods_for_daemonset<'a>(&self, ds: &DaemonSetData, pods: &'a [PodData]) -> Vec<&'a PodData> {
        self.pods_for_selector(&ds.namespace, &ds.selector, pods)
    }

    fn pods_for_deployment<'a>(
        &self,
        deployment: &DeploymentData,
        pods: &'a [PodData],
    ) -> Vec<&'a PodData> {
        self.pods_for_selector(&deployment.namespace, &deployment.selector, pods)
    }

    fn pods_for_statefulset<'a>(
        &self,
        sts: &StatefulSetData,
        pods: &'a [PodData],
    ) -> Vec<&'a PodData> {
        self.pods_for_selector(&sts.namespace, &sts.selector, pods)
    }

    fn pods_for_service<'a>(&self, service: &ServiceData, pods: &'a [PodData]) -> Vec<&'a PodData> {
        self.pods_for_selector(&service.namespace, &service.selector, pods)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicResolver;

impl OwnerResolver for HeuristicResolver {
    fn pods_for_volcano_job<'a>(
        &self,
        job: &VolcanoJobData,
        pods: &'a [PodData],
    ) -> Vec<&'a PodData> {
        let labelled = pods
            .iter()
            .filter(|pod| pod.namespace == job.namespace)
            .filter(|pod| pod.labels.get(VOLCANO_JOB_LABEL) == Some(&job.name))
            .collect::<Vec<_>>();
        if !labelled.is_empty() {
            return labelled;
        }

        pods.iter()
            .filter(|pod| pod.namespace == job.namespace && has_owner_prefix(&pod.name, &job.name))
            .collect()
    }

    fn pods_for_job<'a>(&self, job: &JobData, pods: &'a [PodData]) -> Vec<&'a PodData> {
        pods.iter()
            .filter(|pod| pod.namespace == job.namespace && has_owner_prefix(&pod.name, &job.name))
            .collect()
    }

    fn jobs_for_cronjob<'a>(
        &self,
        cronjob: &CronJobData,
        jobs: &'a [JobData],
    ) -> Vec<&'a JobData> {
        jobs.iter()
            .filter(|job| {
                job.namespace == cronjob.namespace && has_owner_prefix(&job.name, &cronjob.name)
            })
            .collect()
    }

    fn pods_for_selector<'a>(
        &self,
        namespace: &str,
        selector: &BTreeMap<String, String>,
        pods: &'a [PodData],
    ) -> Vec<&'a PodData> {
        pods.iter()
            .filter(|pod| pod.namespace == namespace && selector_matches(selector, &pod.labels))
            .collect()
    }

    fn pods_on_node<'a>(&self, node: &NodeData, pods: &'a [PodData]) -> Vec<&'a PodData> {
        pods.iter()
            .filter(|pod| pod.node.as_deref() == Some(node.name.as_str()))
            .collect()
    }
}

pub fn has_owner_prefix(name: &str, owner: &str) -> bool {
    !owner.is_empty()
        && name
            .strip_prefix(owner)
            .is_some_and(|rest| rest.starts_with('-'))
}

pub fn selector_matches(
    selector: &BTreeMap<String, String>,
    labels: &BTreeMap<String, String>,
) -> bool {
    if selector.is_empty() || labels.is_empty() {
        return false;
    }
    selector
        .iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}
