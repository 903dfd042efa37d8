use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::theme::Tone;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ViewKind {
    Overview,
    Nodes,
    Workloads,
    Volcano,
    Npu,
    Storage,
    Network,
}

impl ViewKind {
    pub const ALL: [Self; 7] = [
        Self::Overview,
        Self::Nodes,
        Self::Workloads,
        Self::Volcano,
        Self::Npu,
        Self::Storage,
        Self::Network,
    ];

    pub fn title_key(self) -> &'static str {
        match self {
            Self::Overview => "view.overview",
            Self::Nodes => "view.nodes",
            Self::Workloads => "view.workloads",
            Self::Volcano => "view.volcano",
            Self::Npu => "view.npu",
            Self::Storage => "view.storage",
            Self::Network => "view.network",
        }
    }

    pub fn short_token(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Nodes => "nodes",
            Self::Workloads => "workloads",
            Self::Volcano => "volcano",
            Self::Npu => "npu",
            Self::Storage => "storage",
            Self::Network => "network",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "overview" | "ov" | "summary" => Some(Self::Overview),
            "no" | "node" | "nodes" => Some(Self::Nodes),
            "wl" | "workload" | "workloads" => Some(Self::Workloads),
            "vc" | "vcjob" | "vcjobs" | "volcano" => Some(Self::Volcano),
            "npu" | "npus" | "topology" | "superpod" | "superpods" => Some(Self::Npu),
            "st" | "storage" | "pv" | "pvc" => Some(Self::Storage),
            "net" | "network" | "svc" | "services" => Some(Self::Network),
            _ => None,
        }
    }

    pub fn selectable(self) -> bool {
        matches!(self, Self::Nodes | Self::Workloads | Self::Volcano)
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|view| *view == self)
            .unwrap_or_default()
    }
}

impl Display for ViewKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_token())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub namespace: String,
    pub name: String,
}

impl EntityKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DetailTarget {
    Node(String),
    Job(EntityKey),
    CronJob(EntityKey),
    DaemonSet(EntityKey),
    Deployment(EntityKey),
    StatefulSet(EntityKey),
    Service(EntityKey),
    VolcanoJob(EntityKey),
}

impl DetailTarget {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Node(_) => "Node",
            Self::Job(_) => "Job",
            Self::CronJob(_) => "CronJob",
            Self::DaemonSet(_) => "DaemonSet",
            Self::Deployment(_) => "Deployment",
            Self::StatefulSet(_) => "StatefulSet",
            Self::Service(_) => "Service",
            Self::VolcanoJob(_) => "VolcanoJob",
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Node(name) => name.clone(),
            Self::Job(key)
            | Self::CronJob(key)
            | Self::DaemonSet(key)
            | Self::Deployment(key)
            | Self::StatefulSet(key)
            | Self::Service(key)
            | Self::VolcanoJob(key) => key.to_string(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Screen {
    List(ViewKind),
    Detail(DetailTarget),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub warn_percent: u64,
    pub critical_percent: u64,
    pub restart_warning: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warn_percent: 70,
            critical_percent: 90,
            restart_warning: 5,
        }
    }
}

macro_rules! string_mapped_enum {
    ($name:ident) => {
        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::from_raw(&raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PodPhase {
    Running,
    Pending,
    Failed,
    Succeeded,
    #[default]
    Unknown,
}

impl PodPhase {
    pub const ORDER: [Self; 5] = [
        Self::Running,
        Self::Pending,
        Self::Failed,
        Self::Succeeded,
        Self::Unknown,
    ];

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "pending" => Self::Pending,
            "failed" => Self::Failed,
            "succeeded" | "completed" => Self::Succeeded,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
            Self::Succeeded => "Succeeded",
            Self::Unknown => "Unknown",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Running => Tone::Good,
            Self::Pending => Tone::Warn,
            Self::Failed => Tone::Bad,
            Self::Succeeded => Tone::Muted,
            Self::Unknown => Tone::Warn,
        }
    }

    pub fn group_rank(self) -> usize {
        Self::ORDER
            .iter()
            .position(|phase| *phase == self)
            .unwrap_or(Self::ORDER.len())
    }

    pub fn severity_rank(self) -> usize {
        match self {
            Self::Failed => 0,
            Self::Unknown => 1,
            Self::Pending => 2,
            Self::Running => 3,
            Self::Succeeded => 4,
        }
    }
}

string_mapped_enum!(PodPhase);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeCondition {
    Ready,
    NotReady,
    #[default]
    Unknown,
}

impl NodeCondition {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ready" | "true" => Self::Ready,
            "notready" | "not ready" | "false" => Self::NotReady,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::NotReady => "NotReady",
            Self::Unknown => "Unknown",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Ready => Tone::Good,
            Self::NotReady => Tone::Bad,
            Self::Unknown => Tone::Warn,
        }
    }
}

string_mapped_enum!(NodeCondition);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobOutcome {
    Running,
    #[default]
    Pending,
    Failed,
    Succeeded,
}

impl JobOutcome {
    pub const ORDER: [Self; 4] = [Self::Running, Self::Pending, Self::Failed, Self::Succeeded];

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" | "active" => Self::Running,
            "failed" | "error" => Self::Failed,
            "succeeded" | "complete" | "completed" => Self::Succeeded,
            _ => Self::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
            Self::Succeeded => "Succeeded",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Running => Tone::Info,
            Self::Pending => Tone::Warn,
            Self::Failed => Tone::Bad,
            Self::Succeeded => Tone::Good,
        }
    }

    pub fn group_rank(self) -> usize {
        Self::ORDER
            .iter()
            .position(|outcome| *outcome == self)
            .unwrap_or(Self::ORDER.len())
    }
}

string_mapped_enum!(JobOutcome);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VolcanoPhase {
    Running,
    Pending,
    Restarting,
    Completing,
    Aborting,
    Terminating,
    Failed,
    Aborted,
    Terminated,
    Completed,
    #[default]
    Unknown,
}

impl VolcanoPhase {
    pub const ORDER: [Self; 11] = [
        Self::Running,
        Self::Pending,
        Self::Restarting,
        Self::Completing,
        Self::Aborting,
        Self::Terminating,
        Self::Failed,
        Self::Aborted,
        Self::Terminated,
        Self::Completed,
        Self::Unknown,
    ];

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "pending" => Self::Pending,
            "restarting" => Self::Restarting,
            "completing" => Self::Completing,
            "aborting" => Self::Aborting,
            "terminating" => Self::Terminating,
            "failed" => Self::Failed,
            "aborted" => Self::Aborted,
            "terminated" => Self::Terminated,
            "completed" => Self::Completed,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Pending => "Pending",
            Self::Restarting => "Restarting",
            Self::Completing => "Completing",
            Self::Aborting => "Aborting",
            Self::Terminating => "Terminating",
            Self::Failed => "Failed",
            Self::Aborted => "Aborted",
            Self::Terminated => "Terminated",
            Self::Completed => "Completed",
            Self::Unknown => "Unknown",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Running => Tone::Info,
            Self::Completed => Tone::Good,
            Self::Pending | Self::Restarting | Self::Completing => Tone::Warn,
            Self::Failed | Self::Aborted | Self::Aborting => Tone::Bad,
            Self::Terminating | Self::Terminated | Self::Unknown => Tone::Muted,
        }
    }

    pub fn group_rank(self) -> usize {
        Self::ORDER
            .iter()
            .position(|phase| *phase == self)
            .unwrap_or(Self::ORDER.len())
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Pending | Self::Restarting)
    }
}

string_mapped_enum!(VolcanoPhase);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VolumePhase {
    Bound,
    Available,
    Released,
    Pending,
    Failed,
    Lost,
    #[default]
    Unknown,
}

impl VolumePhase {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bound" => Self::Bound,
            "available" => Self::Available,
            "released" => Self::Released,
            "pending" => Self::Pending,
            "failed" => Self::Failed,
            "lost" => Self::Lost,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bound => "Bound",
            Self::Available => "Available",
            Self::Released => "Released",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
            Self::Lost => "Lost",
            Self::Unknown => "Unknown",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Bound => Tone::Good,
            Self::Available => Tone::Info,
            Self::Released | Self::Pending | Self::Unknown => Tone::Warn,
            Self::Failed | Self::Lost => Tone::Bad,
        }
    }
}

string_mapped_enum!(VolumePhase);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkRate {
    pub rx_bytes_per_sec: u64,
    pub tx_bytes_per_sec: u64,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeData {
    pub name: String,
    pub status: NodeCondition,
    pub unschedulable: bool,
    pub roles: Vec<String>,
    pub kubelet_version: String,
    pub internal_ip: Option<String>,
    pub cpu_capacity_millicores: u64,
    pub cpu_usage_millicores: u64,
    pub memory_capacity_bytes: u64,
    pub memory_usage_bytes: u64,
    pub pod_capacity: u32,
    pub npu_capacity: u32,
    pub npu_allocated: u32,
    pub super_pod_id: Option<String>,
    pub network: NetworkRate,
    pub labels: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PodData {
    pub name: String,
    pub namespace: String,
    pub node: Option<String>,
    pub phase: PodPhase,
    pub reason: Option<String>,
    pub ready_containers: u32,
    pub total_containers: u32,
    pub restarts: u32,
    pub pod_ip: Option<String>,
    pub cpu_usage_millicores: u64,
    pub memory_usage_bytes: u64,
    pub npu_requested: u32,
    pub labels: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobData {
    pub name: String,
    pub namespace: String,
    pub outcome: JobOutcome,
    pub completions: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub active: u32,
    pub created: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CronJobData {
    pub name: String,
    pub namespace: String,
    pub schedule: String,
    pub suspended: bool,
    pub active: u32,
    pub last_schedule: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSetData {
    pub name: String,
    pub namespace: String,
    pub desired: u32,
    pub current: u32,
    pub ready: u32,
    pub selector: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentData {
    pub name: String,
    pub namespace: String,
    pub replicas: u32,
    pub ready: u32,
    pub updated: u32,
    pub available: u32,
    pub selector: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatefulSetData {
    pub name: String,
    pub namespace: String,
    pub replicas: u32,
    pub ready: u32,
    pub selector: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolcanoTaskData {
    pub name: String,
    pub replicas: u32,
    pub running: u32,
    pub pending: u32,
    pub succeeded: u32,
    pub failed: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolcanoJobData {
    pub name: String,
    pub namespace: String,
    pub queue: String,
    pub phase: VolcanoPhase,
    pub min_available: u32,
    pub running: u32,
    pub pending: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub tasks: Vec<VolcanoTaskData>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePortData {
    pub name: Option<String>,
    pub port: u16,
    pub target_port: String,
    pub node_port: Option<u16>,
    pub protocol: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceData {
    pub name: String,
    pub namespace: String,
    pub service_type: String,
    pub cluster_ip: Option<String>,
    pub external_ips: Vec<String>,
    pub ports: Vec<ServicePortData>,
    pub selector: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PvData {
    pub name: String,
    pub capacity_bytes: u64,
    pub access_modes: Vec<String>,
    pub reclaim_policy: String,
    pub phase: VolumePhase,
    pub claim: Option<EntityKeyData>,
    pub storage_class: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityKeyData {
    pub namespace: String,
    pub name: String,
}

impl Display for EntityKeyData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PvcData {
    pub name: String,
    pub namespace: String,
    pub phase: VolumePhase,
    pub volume: Option<String>,
    pub capacity_bytes: u64,
    pub access_modes: Vec<String>,
    pub storage_class: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperPodData {
    pub id: String,
    pub nodes: Vec<String>,
    pub npu_total: u32,
    pub npu_allocated: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSummary {
    pub nodes_total: usize,
    pub nodes_ready: usize,
    pub pods_total: usize,
    pub pods_running: usize,
    pub pods_pending: usize,
    pub pods_failed: usize,
    pub pods_succeeded: usize,
    pub cpu_capacity_millicores: u64,
    pub cpu_usage_millicores: u64,
    pub memory_capacity_bytes: u64,
    pub memory_usage_bytes: u64,
    pub npu_total: u32,
    pub npu_allocated: u32,
    pub warnings: usize,
    pub criticals: usize,
    pub metrics_error: Option<String>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub rx_bytes: u64,
    #[serde(default)]
    pub tx_bytes: u64,
}

/// Rolling samples kept by the collector; rates need at least two.
#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricHistory {
    pub samples: Vec<MetricSample>,
}

impl MetricHistory {
    pub const MIN_SAMPLES_FOR_RATE: usize = 2;

    pub fn has_rate(&self) -> bool {
        self.samples.len() >= Self::MIN_SAMPLES_FOR_RATE
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSnapshot {
    pub captured_at: Option<DateTime<Utc>>,
    pub summary: ClusterSummary,
    pub nodes: Vec<NodeData>,
    pub pods: Vec<PodData>,
    pub jobs: Vec<JobData>,
    pub cronjobs: Vec<CronJobData>,
    pub daemonsets: Vec<DaemonSetData>,
    pub deployments: Vec<DeploymentData>,
    pub statefulsets: Vec<StatefulSetData>,
    pub volcano_jobs: Vec<VolcanoJobData>,
    pub services: Vec<ServiceData>,
    pub pvs: Vec<PvData>,
    pub pvcs: Vec<PvcData>,
    pub super_pods: Vec<SuperPodData>,
    pub metric_history: MetricHistory,
}

impl ClusterSnapshot {
    pub fn node(&self, name: &str) -> Option<&NodeData> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn job(&self, key: &EntityKey) -> Option<&JobData> {
        self.jobs
            .iter()
            .find(|job| job.namespace == key.namespace && job.name == key.name)
    }

    pub fn cronjob(&self, key: &EntityKey) -> Option<&CronJobData> {
        self.cronjobs
            .iter()
            .find(|cronjob| cronjob.namespace == key.namespace && cronjob.name == key.name)
    }

    pub fn daemonset(&self, key: &EntityKey) -> Option<&DaemonSetData> {
        self.daemonsets
            .iter()
            .find(|ds| ds.namespace == key.namespace && ds.name == key.name)
    }

    pub fn deployment(&self, key: &EntityKey) -> Option<&DeploymentData> {
        self.deployments
            .iter()
            .find(|deploy| deploy.namespace == key.namespace && deploy.name == key.name)
    }

    pub fn statefulset(&self, key: &EntityKey) -> Option<&StatefulSetData> {
        self.statefulsets
            .iter()
            .find(|sts| sts.namespace == key.namespace && sts.name == key.name)
    }

    pub fn service(&self, key: &EntityKey) -> Option<&ServiceData> {
        self.services
            .iter()
            .find(|svc| svc.namespace == key.namespace && svc.name == key.name)
    }

    pub fn volcano_job(&self, key: &EntityKey) -> Option<&VolcanoJobData> {
        self.volcano_jobs
            .iter()
            .find(|job| job.namespace == key.namespace && job.name == key.name)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.pods.is_empty()
            && self.jobs.is_empty()
            && self.cronjobs.is_empty()
            && self.daemonsets.is_empty()
            && self.deployments.is_empty()
            && self.statefulsets.is_empty()
            && self.volcano_jobs.is_empty()
            && self.services.is_empty()
            && self.pvs.is_empty()
            && self.pvcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ClusterSnapshot, JobOutcome, NodeCondition, PodPhase, ViewKind};

    #[test]
    fn view_aliases_map_to_expected_views() {
        assert_eq!(ViewKind::from_token("wl"), Some(ViewKind::Workloads));
        assert_eq!(ViewKind::from_token("VCJOB"), Some(ViewKind::Volcano));
        assert_eq!(ViewKind::from_token("pvc"), Some(ViewKind::Storage));
        assert_eq!(ViewKind::from_token("superpods"), Some(ViewKind::Npu));
        assert_eq!(ViewKind::from_token("bogus"), None);
    }

    #[test]
    fn raw_status_strings_map_once_to_closed_kinds() {
        assert_eq!(PodPhase::from_raw("Running"), PodPhase::Running);
        assert_eq!(PodPhase::from_raw("CrashLoopBackOff"), PodPhase::Unknown);
        assert_eq!(NodeCondition::from_raw("True"), NodeCondition::Ready);
        assert_eq!(JobOutcome::from_raw("Complete"), JobOutcome::Succeeded);
    }

    #[test]
    fn snapshot_deserializes_status_strings_into_kinds() {
        let raw = r#"
nodes:
  - name: n1
    status: NotReady
pods:
  - name: p1
    namespace: ml
    phase: Failed
jobs:
  - name: j1
    namespace: ml
    outcome: Complete
"#;
        let snapshot: ClusterSnapshot = serde_yaml::from_str(raw).expect("snapshot parses");
        assert_eq!(snapshot.nodes[0].status, NodeCondition::NotReady);
        assert_eq!(snapshot.pods[0].phase, PodPhase::Failed);
        assert_eq!(snapshot.jobs[0].outcome, JobOutcome::Succeeded);
        assert!(!snapshot.is_empty());
    }
}
