use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{
    Node, PersistentVolume, PersistentVolumeClaim, Pod, PodStatus, Service,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta, Time};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::model::{
    ClusterSnapshot, ClusterSummary, CronJobData, DaemonSetData, DeploymentData, EntityKeyData,
    JobData, JobOutcome, NodeCondition, NodeData, PodData, PodPhase, PvData, PvcData,
    ServiceData, ServicePortData, StatefulSetData, SuperPodData, VolcanoJobData, VolcanoPhase,
    VolcanoTaskData, VolumePhase,
};

pub const NPU_RESOURCE_PREFIX: &str = "huawei.com/Ascend";
pub const SUPER_POD_LABEL: &str = "huawei.com/super-pod-id";
const VOLCANO_API_GROUP: &str = "batch.volcano.sh/";

pub fn is_list_document(document: &Value) -> bool {
    let kind = document.get("kind").and_then(Value::as_str).unwrap_or("");
    (kind == "List" || kind.ends_with("List")) && document.get("items").is_some()
}

pub fn snapshot_from_list(document: &Value) -> Result<ClusterSnapshot> {
    let items = document
        .get("items")
        .and_then(Value::as_array)
        .context("list document has no `items` array")?;

    let mut snapshot = ClusterSnapshot::default();
    let mut skipped = 0usize;
    for item in items {
        let api_version = item.get("apiVersion").and_then(Value::as_str).unwrap_or("");
        let kind = item.get("kind").and_then(Value::as_str).unwrap_or("");
        let mapped = match (api_version, kind) {
            ("v1", "Node") => decode::<Node>(item).map(|node| snapshot.nodes.push(map_node(node))),
            ("v1", "Pod") => decode::<Pod>(item).map(|pod| snapshot.pods.push(map_pod(pod))),
            ("v1", "Service") => {
                decode::<Service>(item).map(|svc| snapshot.services.push(map_service(svc)))
            }
            ("v1", "PersistentVolume") => {
                decode::<PersistentVolume>(item).map(|pv| snapshot.pvs.push(map_pv(pv)))
            }
            ("v1", "PersistentVolumeClaim") => {
                decode::<PersistentVolumeClaim>(item).map(|pvc| snapshot.pvcs.push(map_pvc(pvc)))
            }
            ("batch/v1", "Job") => decode::<Job>(item).map(|job| snapshot.jobs.push(map_job(job))),
            ("batch/v1", "CronJob") => {
                decode::<CronJob>(item).map(|cj| snapshot.cronjobs.push(map_cronjob(cj)))
            }
            ("apps/v1", "DaemonSet") => {
                decode::<DaemonSet>(item).map(|ds| snapshot.daemonsets.push(map_daemonset(ds)))
            }
            ("apps/v1", "Deployment") => decode::<Deployment>(item)
                .map(|deploy| snapshot.deployments.push(map_deployment(deploy))),
            ("apps/v1", "StatefulSet") => decode::<StatefulSet>(item)
                .map(|sts| snapshot.statefulsets.push(map_statefulset(sts))),
            (group, "Job") if group.starts_with(VOLCANO_API_GROUP) => {
                snapshot.volcano_jobs.push(map_volcano_job(item));
                Ok(())
            }
            _ => {
                debug!(api_version, kind, "ignoring unsupported list item");
                Ok(())
            }
        };
        if let Err(error) = mapped {
            skipped += 1;
            warn!(api_version, kind, error = %error, "skipping undecodable list item");
        }
    }

    allocate_npus(&mut snapshot);
    snapshot.super_pods = build_super_pods(&snapshot.nodes);
    snapshot.summary = summarize(&snapshot);
    debug!(
        items = items.len(),
        skipped,
        nodes = snapshot.nodes.len(),
        pods = snapshot.pods.len(),
        "ingested list dump"
    );
    Ok(snapshot)
}

fn decode<T: DeserializeOwned>(item: &Value) -> Result<T> {
    serde_json::from_value(item.clone()).context("item does not match its declared kind")
}

fn name_of(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

fn namespace_of(meta: &ObjectMeta) -> String {
    meta.namespace.clone().unwrap_or_else(|| "default".to_string())
}

fn timestamp(time: Option<&Time>) -> Option<DateTime<Utc>> {
    let ts = time?.0;
    DateTime::from_timestamp(
        ts.as_second(),
        u32::try_from(ts.subsec_nanosecond()).unwrap_or_default(),
    )
}

fn count(value: Option<i32>) -> u32 {
    value.and_then(|value| u32::try_from(value).ok()).unwrap_or_default()
}

fn selector_labels(selector: Option<&LabelSelector>) -> BTreeMap<String, String> {
    selector
        .and_then(|selector| selector.match_labels.clone())
        .unwrap_or_default()
}

fn quantity<'a>(resources: Option<&'a BTreeMap<String, Quantity>>, key: &str) -> Option<&'a str> {
    resources
        .and_then(|resources| resources.get(key))
        .map(|quantity| quantity.0.as_str())
}

fn npu_count(resources: Option<&BTreeMap<String, Quantity>>) -> u32 {
    resources
        .into_iter()
        .flatten()
        .filter(|(name, _)| name.starts_with(NPU_RESOURCE_PREFIX))
        .filter_map(|(_, value)| value.0.trim().parse::<u32>().ok())
        .sum()
}

fn map_node(node: Node) -> NodeData {
    let status = node.status.as_ref();
    let condition = status
        .and_then(|status| status.conditions.as_ref())
        .and_then(|conditions| {
            conditions
                .iter()
                .find(|condition| condition.type_ == "Ready")
        })
        .map(|condition| NodeCondition::from_raw(&condition.status))
        .unwrap_or_default();
    let internal_ip = status
        .and_then(|status| status.addresses.as_ref())
        .and_then(|addresses| {
            addresses
                .iter()
                .find(|address| address.type_ == "InternalIP")
        })
        .map(|address| address.address.clone());
    let allocatable = status
        .and_then(|status| status.allocatable.as_ref())
        .or_else(|| status.and_then(|status| status.capacity.as_ref()));
    let labels = node.metadata.labels.clone().unwrap_or_default();

    NodeData {
        name: name_of(&node.metadata),
        status: condition,
        unschedulable: node
            .spec
            .as_ref()
            .and_then(|spec| spec.unschedulable)
            .unwrap_or(false),
        roles: node_roles(&labels),
        kubelet_version: status
            .and_then(|status| status.node_info.as_ref())
            .map(|info| info.kubelet_version.clone())
            .unwrap_or_default(),
        internal_ip,
        cpu_capacity_millicores: quantity(allocatable, "cpu")
            .and_then(parse_cpu_millicores)
            .unwrap_or_default(),
        memory_capacity_bytes: quantity(allocatable, "memory")
            .and_then(parse_memory_bytes)
            .unwrap_or_default(),
        pod_capacity: quantity(allocatable, "pods")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_default(),
        npu_capacity: npu_count(allocatable),
        super_pod_id: labels.get(SUPER_POD_LABEL).cloned(),
        created: timestamp(node.metadata.creation_timestamp.as_ref()),
        labels,
        ..NodeData::default()
    }
}

fn node_roles(labels: &BTreeMap<String, String>) -> Vec<String> {
    let mut roles = labels
        .keys()
        .filter_map(|key| key.strip_prefix("node-role.kubernetes.io/"))
        .map(|role| {
            if role.is_empty() {
                "worker".to_string()
            } else {
                role.to_string()
            }
        })
        .collect::<Vec<_>>();

    if roles.is_empty() {
        roles.extend(labels.get("kubernetes.io/role").cloned());
    }

    roles.sort();
    roles.dedup();
    roles
}

fn map_pod(pod: Pod) -> PodData {
    let status = pod.status.as_ref();
    let (ready, total, restarts) = status.map(pod_readiness).unwrap_or_default();
    let spec = pod.spec.as_ref();
    let npu_requested = spec
        .map(|spec| {
            spec.containers
                .iter()
                .filter_map(|container| container.resources.as_ref())
                .map(|resources| {
                    let requested = npu_count(resources.requests.as_ref());
                    if requested > 0 {
                        requested
                    } else {
                        npu_count(resources.limits.as_ref())
                    }
                })
                .sum::<u32>()
        })
        .unwrap_or_default();

    PodData {
        name: name_of(&pod.metadata),
        namespace: namespace_of(&pod.metadata),
        node: spec.and_then(|spec| spec.node_name.clone()),
        phase: status
            .and_then(|status| status.phase.as_deref())
            .map(PodPhase::from_raw)
            .unwrap_or_default(),
        reason: status.and_then(pod_reason),
        ready_containers: ready,
        total_containers: total,
        restarts,
        pod_ip: status.and_then(|status| status.pod_ip.clone()),
        npu_requested,
        labels: pod.metadata.labels.clone().unwrap_or_default(),
        created: timestamp(pod.metadata.creation_timestamp.as_ref()),
        ..PodData::default()
    }
}

fn pod_readiness(status: &PodStatus) -> (u32, u32, u32) {
    let container_statuses = status.container_statuses.as_deref().unwrap_or(&[]);
    let total = container_statuses.len();
    let ready = container_statuses
        .iter()
        .filter(|container| container.ready)
        .count();
    let restarts = container_statuses
        .iter()
        .map(|container| count(Some(container.restart_count)))
        .sum::<u32>();

    (
        u32::try_from(ready).unwrap_or(u32::MAX),
        u32::try_from(total).unwrap_or(u32::MAX),
        restarts,
    )
}

/// Pod-level reason (`Evicted`) or the first waiting/terminated container
/// reason (`CrashLoopBackOff`, `OOMKilled`), the way kubectl's STATUS does.
fn pod_reason(status: &PodStatus) -> Option<String> {
    if let Some(reason) = status.reason.as_ref().filter(|reason| !reason.is_empty()) {
        return Some(reason.clone());
    }
    status
        .container_statuses
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .filter(|container| !container.ready)
        .filter_map(|container| container.state.as_ref())
        .find_map(|state| {
            state
                .waiting
                .as_ref()
                .and_then(|waiting| waiting.reason.clone())
                .or_else(|| {
                    state
                        .terminated
                        .as_ref()
                        .and_then(|terminated| terminated.reason.clone())
                        .filter(|reason| reason != "Completed")
                })
        })
}

fn map_job(job: Job) -> JobData {
    let status = job.status.as_ref();
    let condition_true = |type_: &str| {
        status
            .and_then(|status| status.conditions.as_ref())
            .is_some_and(|conditions| {
                conditions
                    .iter()
                    .any(|condition| condition.type_ == type_ && condition.status == "True")
            })
    };
    let active = count(status.and_then(|status| status.active));
    let outcome = if condition_true("Complete") {
        JobOutcome::Succeeded
    } else if condition_true("Failed") {
        JobOutcome::Failed
    } else if active > 0 {
        JobOutcome::Running
    } else {
        JobOutcome::Pending
    };

    JobData {
        name: name_of(&job.metadata),
        namespace: namespace_of(&job.metadata),
        outcome,
        completions: job
            .spec
            .as_ref()
            .and_then(|spec| spec.completions)
            .map(|value| count(Some(value)))
            .unwrap_or(1),
        succeeded: count(status.and_then(|status| status.succeeded)),
        failed: count(status.and_then(|status| status.failed)),
        active,
        created: timestamp(job.metadata.creation_timestamp.as_ref()),
        completed: timestamp(status.and_then(|status| status.completion_time.as_ref())),
    }
}

fn map_cronjob(cronjob: CronJob) -> CronJobData {
    let status = cronjob.status.as_ref();
    CronJobData {
        name: name_of(&cronjob.metadata),
        namespace: namespace_of(&cronjob.metadata),
        schedule: cronjob
            .spec
            .as_ref()
            .map(|spec| spec.schedule.clone())
            .unwrap_or_default(),
        suspended: cronjob
            .spec
            .as_ref()
            .and_then(|spec| spec.suspend)
            .unwrap_or(false),
        active: status
            .and_then(|status| status.active.as_ref())
            .map(|active| u32::try_from(active.len()).unwrap_or(u32::MAX))
            .unwrap_or_default(),
        last_schedule: timestamp(status.and_then(|status| status.last_schedule_time.as_ref())),
        created: timestamp(cronjob.metadata.creation_timestamp.as_ref()),
    }
}

fn map_daemonset(ds: DaemonSet) -> DaemonSetData {
    let status = ds.status.as_ref();
    DaemonSetData {
        name: name_of(&ds.metadata),
        namespace: namespace_of(&ds.metadata),
        desired: count(status.map(|status| status.desired_number_scheduled)),
        current: count(status.map(|status| status.current_number_scheduled)),
        ready: count(status.map(|status| status.number_ready)),
        selector: selector_labels(ds.spec.as_ref().map(|spec| &spec.selector)),
        created: timestamp(ds.metadata.creation_timestamp.as_ref()),
    }
}

fn map_deployment(deploy: Deployment) -> DeploymentData {
    let status = deploy.status.as_ref();
    DeploymentData {
        name: name_of(&deploy.metadata),
        namespace: namespace_of(&deploy.metadata),
        replicas: deploy
            .spec
            .as_ref()
            .and_then(|spec| spec.replicas)
            .map(|value| count(Some(value)))
            .unwrap_or(1),
        ready: count(status.and_then(|status| status.ready_replicas)),
        updated: count(status.and_then(|status| status.updated_replicas)),
        available: count(status.and_then(|status| status.available_replicas)),
        selector: selector_labels(deploy.spec.as_ref().map(|spec| &spec.selector)),
        created: timestamp(deploy.metadata.creation_timestamp.as_ref()),
    }
}

fn map_statefulset(sts: StatefulSet) -> StatefulSetData {
    StatefulSetData {
        name: name_of(&sts.metadata),
        namespace: namespace_of(&sts.metadata),
        replicas: sts
            .spec
            .as_ref()
            .and_then(|spec| spec.replicas)
            .map(|value| count(Some(value)))
            .unwrap_or(1),
        ready: count(sts.status.as_ref().and_then(|status| status.ready_replicas)),
        selector: selector_labels(sts.spec.as_ref().map(|spec| &spec.selector)),
        created: timestamp(sts.metadata.creation_timestamp.as_ref()),
    }
}

fn map_service(service: Service) -> ServiceData {
    let spec = service.spec.as_ref();
    let mut external_ips = spec
        .and_then(|spec| spec.external_ips.clone())
        .unwrap_or_default();
    if let Some(ingress) = service
        .status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
    {
        external_ips.extend(
            ingress
                .iter()
                .filter_map(|entry| entry.ip.clone().or_else(|| entry.hostname.clone())),
        );
    }
    let ports = spec
        .and_then(|spec| spec.ports.as_ref())
        .map(|ports| {
            ports
                .iter()
                .map(|port| ServicePortData {
                    name: port.name.clone(),
                    port: u16::try_from(port.port).unwrap_or_default(),
                    target_port: match port.target_port.as_ref() {
                        Some(IntOrString::Int(value)) => value.to_string(),
                        Some(IntOrString::String(value)) => value.clone(),
                        None => port.port.to_string(),
                    },
                    node_port: port.node_port.and_then(|value| u16::try_from(value).ok()),
                    protocol: port.protocol.clone().unwrap_or_else(|| "TCP".to_string()),
                })
                .collect()
        })
        .unwrap_or_default();

    ServiceData {
        name: name_of(&service.metadata),
        namespace: namespace_of(&service.metadata),
        service_type: spec
            .and_then(|spec| spec.type_.clone())
            .unwrap_or_else(|| "ClusterIP".to_string()),
        cluster_ip: spec.and_then(|spec| spec.cluster_ip.clone()),
        external_ips,
        ports,
        selector: spec
            .and_then(|spec| spec.selector.clone())
            .unwrap_or_default(),
        created: timestamp(service.metadata.creation_timestamp.as_ref()),
    }
}

fn map_pv(pv: PersistentVolume) -> PvData {
    let spec = pv.spec.as_ref();
    PvData {
        name: name_of(&pv.metadata),
        capacity_bytes: quantity(spec.and_then(|spec| spec.capacity.as_ref()), "storage")
            .and_then(parse_memory_bytes)
            .unwrap_or_default(),
        access_modes: spec
            .and_then(|spec| spec.access_modes.clone())
            .unwrap_or_default(),
        reclaim_policy: spec
            .and_then(|spec| spec.persistent_volume_reclaim_policy.clone())
            .unwrap_or_default(),
        phase: pv
            .status
            .as_ref()
            .and_then(|status| status.phase.as_deref())
            .map(VolumePhase::from_raw)
            .unwrap_or_default(),
        claim: spec
            .and_then(|spec| spec.claim_ref.as_ref())
            .map(|claim| EntityKeyData {
                namespace: claim.namespace.clone().unwrap_or_default(),
                name: claim.name.clone().unwrap_or_default(),
            }),
        storage_class: spec.and_then(|spec| spec.storage_class_name.clone()),
        created: timestamp(pv.metadata.creation_timestamp.as_ref()),
    }
}

fn map_pvc(pvc: PersistentVolumeClaim) -> PvcData {
    let spec = pvc.spec.as_ref();
    let status = pvc.status.as_ref();
    let capacity = quantity(status.and_then(|status| status.capacity.as_ref()), "storage")
        .or_else(|| {
            quantity(
                spec.and_then(|spec| spec.resources.as_ref())
                    .and_then(|resources| resources.requests.as_ref()),
                "storage",
            )
        });
    PvcData {
        name: name_of(&pvc.metadata),
        namespace: namespace_of(&pvc.metadata),
        phase: status
            .and_then(|status| status.phase.as_deref())
            .map(VolumePhase::from_raw)
            .unwrap_or_default(),
        volume: spec.and_then(|spec| spec.volume_name.clone()),
        capacity_bytes: capacity.and_then(parse_memory_bytes).unwrap_or_default(),
        access_modes: spec
            .and_then(|spec| spec.access_modes.clone())
            .unwrap_or_default(),
        storage_class: spec.and_then(|spec| spec.storage_class_name.clone()),
        created: timestamp(pvc.metadata.creation_timestamp.as_ref()),
    }
}

fn map_volcano_job(item: &Value) -> VolcanoJobData {
    let metadata = item.get("metadata");
    let spec = item.get("spec");
    let status = item.get("status");
    let text = |value: Option<&Value>, key: &str| {
        value
            .and_then(|value| value.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let number = |value: Option<&Value>, key: &str| {
        value
            .and_then(|value| value.get(key))
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or_default()
    };
    let task_counts = status
        .and_then(|status| status.get("taskStatusCount"))
        .and_then(Value::as_object);

    let tasks = spec
        .and_then(|spec| spec.get("tasks"))
        .and_then(Value::as_array)
        .map(|tasks| {
            tasks
                .iter()
                .map(|task| {
                    let name = text(Some(task), "name");
                    let phases = task_counts
                        .and_then(|counts| counts.get(&name))
                        .and_then(|entry| entry.get("phase"));
                    VolcanoTaskData {
                        replicas: number(Some(task), "replicas"),
                        running: number(phases, "Running"),
                        pending: number(phases, "Pending"),
                        succeeded: number(phases, "Succeeded"),
                        failed: number(phases, "Failed"),
                        name,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    VolcanoJobData {
        name: text(metadata, "name"),
        namespace: {
            let namespace = text(metadata, "namespace");
            if namespace.is_empty() {
                "default".to_string()
            } else {
                namespace
            }
        },
        queue: {
            let queue = text(spec, "queue");
            if queue.is_empty() {
                "default".to_string()
            } else {
                queue
            }
        },
        phase: VolcanoPhase::from_raw(&text(
            status.and_then(|status| status.get("state")),
            "phase",
        )),
        min_available: number(spec, "minAvailable"),
        running: number(status, "running"),
        pending: number(status, "pending"),
        succeeded: number(status, "succeeded"),
        failed: number(status, "failed"),
        tasks,
        created: metadata
            .and_then(|metadata| metadata.get("creationTimestamp"))
            .and_then(|value| serde_json::from_value::<DateTime<Utc>>(value.clone()).ok()),
    }
}

/// Charges each node with the NPUs requested by live pods scheduled on it.
fn allocate_npus(snapshot: &mut ClusterSnapshot) {
    let mut allocated = BTreeMap::<&str, u32>::new();
    for pod in &snapshot.pods {
        if !matches!(pod.phase, PodPhase::Running | PodPhase::Pending) {
            continue;
        }
        if let Some(node) = pod.node.as_deref() {
            *allocated.entry(node).or_default() += pod.npu_requested;
        }
    }
    let allocated = allocated
        .into_iter()
        .map(|(node, npus)| (node.to_string(), npus))
        .collect::<BTreeMap<_, _>>();
    for node in &mut snapshot.nodes {
        node.npu_allocated = allocated
            .get(&node.name)
            .copied()
            .unwrap_or_default()
            .min(node.npu_capacity);
    }
}

pub fn build_super_pods(nodes: &[NodeData]) -> Vec<SuperPodData> {
    let mut groups = BTreeMap::<&str, SuperPodData>::new();
    for node in nodes {
        let Some(id) = node.super_pod_id.as_deref() else {
            continue;
        };
        let entry = groups.entry(id).or_insert_with(|| SuperPodData {
            id: id.to_string(),
            ..SuperPodData::default()
        });
        entry.nodes.push(node.name.clone());
        entry.npu_total += node.npu_capacity;
        entry.npu_allocated += node.npu_allocated;
    }
    groups
        .into_values()
        .map(|mut group| {
            group.nodes.sort();
            group
        })
        .collect()
}

pub fn summarize(snapshot: &ClusterSnapshot) -> ClusterSummary {
    let mut summary = ClusterSummary {
        nodes_total: snapshot.nodes.len(),
        pods_total: snapshot.pods.len(),
        ..ClusterSummary::default()
    };
    for node in &snapshot.nodes {
        match node.status {
            NodeCondition::Ready => summary.nodes_ready += 1,
            NodeCondition::NotReady => summary.criticals += 1,
            NodeCondition::Unknown => {}
        }
        if node.unschedulable {
            summary.warnings += 1;
        }
        summary.cpu_capacity_millicores += node.cpu_capacity_millicores;
        summary.cpu_usage_millicores += node.cpu_usage_millicores;
        summary.memory_capacity_bytes += node.memory_capacity_bytes;
        summary.memory_usage_bytes += node.memory_usage_bytes;
        summary.npu_total += node.npu_capacity;
        summary.npu_allocated += node.npu_allocated;
    }
    for pod in &snapshot.pods {
        match pod.phase {
            PodPhase::Running => summary.pods_running += 1,
            PodPhase::Pending => {
                summary.pods_pending += 1;
                summary.warnings += 1;
            }
            PodPhase::Failed => {
                summary.pods_failed += 1;
                summary.criticals += 1;
            }
            PodPhase::Succeeded => summary.pods_succeeded += 1,
            PodPhase::Unknown => {}
        }
    }
    summary
}

fn parse_cpu_millicores(value: &str) -> Option<u64> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    let (number, multiplier) = if let Some(number) = raw.strip_suffix('m') {
        (number, 1.0)
    } else if let Some(number) = raw.strip_suffix('u') {
        (number, 0.001)
    } else if let Some(number) = raw.strip_suffix('n') {
        (number, 0.000001)
    } else {
        (raw, 1000.0)
    };

    let numeric = number.parse::<f64>().ok()?;
    let millicores = (numeric * multiplier).round();
    if !millicores.is_finite() || millicores < 0.0 {
        return None;
    }
    Some(millicores as u64)
}

fn parse_memory_bytes(value: &str) -> Option<u64> {
    const UNITS: [(&str, f64); 12] = [
        ("Ei", 1_152_921_504_606_846_976.0),
        ("Pi", 1_125_899_906_842_624.0),
        ("Ti", 1_099_511_627_776.0),
        ("Gi", 1_073_741_824.0),
        ("Mi", 1_048_576.0),
        ("Ki", 1_024.0),
        ("E", 1_000_000_000_000_000_000.0),
        ("P", 1_000_000_000_000_000.0),
        ("T", 1_000_000_000_000.0),
        ("G", 1_000_000_000.0),
        ("M", 1_000_000.0),
        ("k", 1_000.0),
    ];

    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    let (number, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, multiplier)| {
            raw.strip_suffix(suffix).map(|number| (number, *multiplier))
        })
        .unwrap_or((raw, 1.0));
    let bytes = (number.parse::<f64>().ok()? * multiplier).round();
    if !bytes.is_finite() || bytes < 0.0 {
        return None;
    }
    Some(bytes as u64)
}
