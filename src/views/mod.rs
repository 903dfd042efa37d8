mod detail;
mod network;
mod nodes;
mod npu;
mod overview;
mod storage;
mod volcano;
mod workloads;

use chrono::{DateTime, Utc};
use ratatui::text::Line;
use std::collections::BTreeMap;

use crate::format::{
    self, Column, format_age, header_line, muted_line, row_line, section_line, title_line,
    toned_cell,
};
use crate::i18n::Translator;
use crate::model::{
    ClusterSnapshot, DetailTarget, EntityKey, PodData, PodPhase, Screen, ServiceData, Thresholds,
    ViewKind,
};
use crate::owners::OwnerResolver;
use crate::sections::{SECTION_HEADER_LINES, SectionIndex, clamp_selection};
use crate::theme::{Tone, ratio_tone};

pub struct RenderContext<'a> {
    pub snapshot: &'a ClusterSnapshot,
    pub tr: &'a Translator,
    pub now: DateTime<Utc>,
    pub thresholds: Thresholds,
    pub resolver: &'a dyn OwnerResolver,
}

#[derive(Debug, Clone, Default)]
pub struct ViewOutput {
    pub lines: Vec<Line<'static>>,
    pub sections: SectionIndex,
    pub selected: Option<usize>,
}

impl ViewOutput {
    pub fn target_line(&self) -> Option<usize> {
        self.selected
            .and_then(|selected| self.sections.line_for_selection(selected))
    }

    fn titled(title: String) -> Self {
        Self {
            lines: vec![title_line(title)],
            ..Self::default()
        }
    }

    fn no_data(ctx: &RenderContext<'_>, title: String) -> Self {
        let mut out = Self::titled(title);
        out.lines.push(muted_line(ctx.tr.t("common.no_data")));
        out
    }

    fn push_section(
        &mut self,
        ctx: &RenderContext<'_>,
        name: &'static str,
        title: String,
        columns: &[Column],
        rows: Vec<Line<'static>>,
    ) {
        self.sections
            .push(name, self.lines.len(), SECTION_HEADER_LINES, rows.len());
        self.lines.push(section_line(title));
        self.lines.push(header_line(ctx.tr, columns));
        if rows.is_empty() {
            self.lines.push(muted_line(ctx.tr.t("common.no_data")));
        } else {
            self.lines.extend(rows);
        }
        self.lines.push(Line::default());
    }
}

pub fn produce(ctx: &RenderContext<'_>, screen: &Screen, selected: usize) -> ViewOutput {
    match screen {
        Screen::List(ViewKind::Overview) => overview::lines(ctx),
        Screen::List(ViewKind::Nodes) => nodes::lines(ctx, selected),
        Screen::List(ViewKind::Workloads) => workloads::lines(ctx, selected),
        Screen::List(ViewKind::Volcano) => volcano::lines(ctx, selected),
        Screen::List(ViewKind::Npu) => npu::lines(ctx),
        Screen::List(ViewKind::Storage) => storage::lines(ctx),
        Screen::List(ViewKind::Network) => network::lines(ctx),
        Screen::Detail(target) => detail::lines(ctx, target),
    }
}

pub fn item_count(snapshot: &ClusterSnapshot, view: ViewKind) -> usize {
    match view {
        ViewKind::Nodes => snapshot.nodes.len(),
        ViewKind::Workloads => workloads::WorkloadLists::collect(snapshot).total(),
        ViewKind::Volcano => snapshot.volcano_jobs.len(),
        ViewKind::Overview | ViewKind::Npu | ViewKind::Storage | ViewKind::Network => 0,
    }
}

pub fn selection_target(
    snapshot: &ClusterSnapshot,
    view: ViewKind,
    selected: usize,
) -> Option<DetailTarget> {
    let selected = clamp_selection(selected, item_count(snapshot, view))?;
    match view {
        ViewKind::Nodes => nodes::ordered(snapshot)
            .get(selected)
            .map(|node| DetailTarget::Node(node.name.clone())),
        ViewKind::Workloads => workloads::WorkloadLists::collect(snapshot).target(selected),
        ViewKind::Volcano => volcano::ordered(snapshot)
            .get(selected)
            .map(|job| DetailTarget::VolcanoJob(EntityKey::new(&job.namespace, &job.name))),
        ViewKind::Overview | ViewKind::Npu | ViewKind::Storage | ViewKind::Network => None,
    }
}

pub(crate) const POD_COLUMNS: [Column; 7] = [
    Column::new("col.name", 32),
    Column::new("col.namespace", 14),
    Column::new("col.status", 16),
    Column::new("col.ready", 6),
    Column::new("col.restarts", 8),
    Column::new("col.node", 16),
    Column::new("col.age", 6),
];

pub(crate) fn pod_row(ctx: &RenderContext<'_>, pod: &PodData) -> Line<'static> {
    let status = pod
        .reason
        .clone()
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| pod.phase.label().to_string());
    let status_tone = if pod.reason.is_some() && pod.phase != PodPhase::Succeeded {
        Tone::Bad
    } else {
        pod.phase.tone()
    };
    let ready_tone = ratio_tone(pod.ready_containers, pod.total_containers);
    let restart_tone = if pod.restarts >= ctx.thresholds.restart_warning {
        Tone::Warn
    } else {
        Tone::Plain
    };
    let columns = &POD_COLUMNS;
    row_line(
        vec![
            toned_cell(&pod.name, columns[0].width, Tone::Plain),
            toned_cell(&pod.namespace, columns[1].width, Tone::Muted),
            toned_cell(status, columns[2].width, status_tone),
            toned_cell(
                format::ratio(pod.ready_containers, pod.total_containers),
                columns[3].width,
                ready_tone,
            ),
            toned_cell(pod.restarts.to_string(), columns[4].width, restart_tone),
            toned_cell(
                pod.node.as_deref().unwrap_or("-"),
                columns[5].width,
                Tone::Muted,
            ),
            toned_cell(format_age(ctx.now, pod.created), columns[6].width, Tone::Muted),
        ],
        false,
    )
}

pub(crate) fn sort_pods(pods: &mut [&PodData]) {
    pods.sort_by(|a, b| {
        a.phase
            .group_rank()
            .cmp(&b.phase.group_rank())
            .then_with(|| a.namespace.cmp(&b.namespace))
            .then_with(|| a.name.cmp(&b.name))
    });
}

pub(crate) fn service_ports(service: &ServiceData) -> String {
    if service.ports.is_empty() {
        return "-".to_string();
    }
    service
        .ports
        .iter()
        .map(|port| {
            let protocol = if port.protocol.is_empty() {
                "TCP"
            } else {
                port.protocol.as_str()
            };
            match port.node_port {
                Some(node_port) => format!("{}:{}/{}", port.port, node_port, protocol),
                None => format!("{}/{}", port.port, protocol),
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn selector_text(
    ctx: &RenderContext<'_>,
    selector: &BTreeMap<String, String>,
) -> String {
    if selector.is_empty() {
        return ctx.tr.t("common.none");
    }
    selector
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn count_title(ctx: &RenderContext<'_>, key: &str, count: usize) -> String {
    ctx.tr.tf(key, &[("count", &count.to_string())])
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::BTreeMap;

    use crate::i18n::{Locale, Translator};
    use crate::model::*;
    use crate::owners::HeuristicResolver;

    use super::RenderContext;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    pub fn ago(minutes: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::minutes(minutes))
    }

    pub fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    pub fn pod(namespace: &str, name: &str, phase: PodPhase, node: &str) -> PodData {
        PodData {
            name: name.to_string(),
            namespace: namespace.to_string(),
            node: Some(node.to_string()),
            phase,
            ready_containers: u32::from(phase == PodPhase::Running),
            total_containers: 1,
            created: ago(30),
            ..PodData::default()
        }
    }

    pub fn job(namespace: &str, name: &str, outcome: JobOutcome, minutes: i64) -> JobData {
        JobData {
            name: name.to_string(),
            namespace: namespace.to_string(),
            outcome,
            completions: 1,
            created: ago(minutes),
            ..JobData::default()
        }
    }

    pub fn node(name: &str, status: NodeCondition) -> NodeData {
        NodeData {
            name: name.to_string(),
            status,
            roles: vec!["worker".to_string()],
            cpu_capacity_millicores: 8_000,
            cpu_usage_millicores: 6_000,
            memory_capacity_bytes: 32 * 1_073_741_824,
            memory_usage_bytes: 30 * 1_073_741_824,
            created: ago(60 * 24 * 3),
            ..NodeData::default()
        }
    }

    pub fn sample_snapshot() -> ClusterSnapshot {
        let mut npu_a = node("npu-a", NodeCondition::Ready);
        npu_a.npu_capacity = 8;
        npu_a.npu_allocated = 6;
        npu_a.super_pod_id = Some("sp-1".to_string());
        let mut npu_b = node("npu-b", NodeCondition::NotReady);
        npu_b.npu_capacity = 8;
        npu_b.super_pod_id = Some("sp-1".to_string());
        let mut loose = node("npu-c", NodeCondition::Ready);
        loose.npu_capacity = 4;
        loose.npu_allocated = 4;

        let mut agent = pod("kube-system", "agent-x1", PodPhase::Running, "cpu-1");
        agent.labels = labels(&[("app", "agent")]);
        let mut web = pod("shop", "web-7d9-abc", PodPhase::Running, "cpu-1");
        web.labels = labels(&[("app", "web")]);
        let mut crashing = pod("shop", "web-7d9-def", PodPhase::Running, "cpu-1");
        crashing.labels = labels(&[("app", "web")]);
        crashing.reason = Some("CrashLoopBackOff".to_string());
        crashing.restarts = 12;
        crashing.ready_containers = 0;
        let mut worker = pod("ml", "llm-worker-0", PodPhase::Running, "npu-a");
        worker.labels = labels(&[(crate::owners::VOLCANO_JOB_LABEL, "llm")]);

        ClusterSnapshot {
            captured_at: Some(now()),
            summary: ClusterSummary {
                nodes_total: 4,
                nodes_ready: 3,
                pods_total: 6,
                pods_running: 4,
                pods_pending: 1,
                pods_failed: 1,
                cpu_capacity_millicores: 32_000,
                cpu_usage_millicores: 24_000,
                memory_capacity_bytes: 128 * 1_073_741_824,
                memory_usage_bytes: 64 * 1_073_741_824,
                npu_total: 20,
                npu_allocated: 10,
                warnings: 2,
                criticals: 1,
                ..ClusterSummary::default()
            },
            nodes: vec![node("cpu-1", NodeCondition::Ready), npu_b, npu_a, loose],
            pods: vec![
                agent,
                web,
                crashing,
                worker,
                pod("ml", "train-123-0", PodPhase::Failed, "npu-a"),
                pod("ml", "train-1234-0", PodPhase::Pending, "npu-a"),
            ],
            jobs: vec![
                job("ml", "train-123", JobOutcome::Failed, 50),
                job("ml", "train-1234", JobOutcome::Running, 20),
                job("ops", "backup-1", JobOutcome::Succeeded, 90),
                job("ops", "backup-2", JobOutcome::Succeeded, 30),
            ],
            cronjobs: vec![CronJobData {
                name: "backup".to_string(),
                namespace: "ops".to_string(),
                schedule: "0 * * * *".to_string(),
                last_schedule: ago(30),
                created: ago(600),
                ..CronJobData::default()
            }],
            daemonsets: vec![DaemonSetData {
                name: "agent".to_string(),
                namespace: "kube-system".to_string(),
                desired: 4,
                current: 4,
                ready: 3,
                selector: labels(&[("app", "agent")]),
                created: ago(6000),
            }],
            deployments: vec![DeploymentData {
                name: "web".to_string(),
                namespace: "shop".to_string(),
                replicas: 2,
                ready: 1,
                updated: 2,
                available: 1,
                selector: labels(&[("app", "web")]),
                created: ago(400),
            }],
            statefulsets: Vec::new(),
            volcano_jobs: vec![VolcanoJobData {
                name: "llm".to_string(),
                namespace: "ml".to_string(),
                queue: "default".to_string(),
                phase: VolcanoPhase::Running,
                min_available: 2,
                running: 1,
                pending: 1,
                tasks: vec![VolcanoTaskData {
                    name: "worker".to_string(),
                    replicas: 2,
                    running: 1,
                    pending: 1,
                    ..VolcanoTaskData::default()
                }],
                created: ago(45),
                ..VolcanoJobData::default()
            }],
            services: vec![ServiceData {
                name: "web".to_string(),
                namespace: "shop".to_string(),
                service_type: "NodePort".to_string(),
                cluster_ip: Some("10.0.0.12".to_string()),
                ports: vec![ServicePortData {
                    port: 80,
                    target_port: "8080".to_string(),
                    node_port: Some(30080),
                    protocol: "TCP".to_string(),
                    ..ServicePortData::default()
                }],
                selector: labels(&[("app", "web")]),
                created: ago(400),
                ..ServiceData::default()
            }],
            pvs: vec![PvData {
                name: "pv-data".to_string(),
                capacity_bytes: 100 * 1_073_741_824,
                access_modes: vec!["ReadWriteOnce".to_string()],
                reclaim_policy: "Retain".to_string(),
                phase: VolumePhase::Bound,
                claim: Some(EntityKeyData {
                    namespace: "ml".to_string(),
                    name: "data".to_string(),
                }),
                storage_class: Some("fast".to_string()),
                created: ago(1000),
            }],
            pvcs: vec![PvcData {
                name: "data".to_string(),
                namespace: "ml".to_string(),
                phase: VolumePhase::Bound,
                volume: Some("pv-data".to_string()),
                capacity_bytes: 100 * 1_073_741_824,
                access_modes: vec!["ReadWriteOnce".to_string()],
                storage_class: Some("fast".to_string()),
                created: ago(1000),
            }],
            super_pods: vec![SuperPodData {
                id: "sp-1".to_string(),
                nodes: vec!["npu-a".to_string(), "npu-b".to_string()],
                npu_total: 16,
                npu_allocated: 6,
            }],
            metric_history: MetricHistory::default(),
        }
    }

    pub const RESOLVER: HeuristicResolver = HeuristicResolver;

    pub fn context<'a>(snapshot: &'a ClusterSnapshot, tr: &'a Translator) -> RenderContext<'a> {
        RenderContext {
            snapshot,
            tr,
            now: now(),
            thresholds: Thresholds::default(),
            resolver: &RESOLVER,
        }
    }

    pub fn english() -> Translator {
        Translator::new(Locale::En)
    }

    pub fn plain(lines: &[ratatui::text::Line<'static>]) -> Vec<String> {
        lines.iter().map(crate::format::plain_text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{context, english, plain, sample_snapshot};
    use super::{item_count, produce, selection_target};
    use crate::model::{ClusterSnapshot, DetailTarget, EntityKey, Screen, ViewKind};

    #[test]
    fn empty_cluster_yields_title_and_one_placeholder_per_view() {
        let snapshot = ClusterSnapshot::default();
        let tr = english();
        let ctx = context(&snapshot, &tr);
        for view in ViewKind::ALL {
            let out = produce(&ctx, &Screen::List(view), 0);
            let text = plain(&out.lines);
            assert_eq!(text.len(), 2, "{view} should render title + placeholder");
            assert_eq!(text[1].trim(), "No data", "{view}");
            assert_eq!(out.selected, None);
            assert_eq!(out.target_line(), None);
        }
    }

    #[test]
    fn views_are_deterministic_under_a_frozen_clock() {
        let snapshot = sample_snapshot();
        let tr = english();
        let ctx = context(&snapshot, &tr);
        for view in ViewKind::ALL {
            let first = produce(&ctx, &Screen::List(view), 3);
            let second = produce(&ctx, &Screen::List(view), 3);
            assert_eq!(first.lines, second.lines, "{view}");
            assert_eq!(first.sections, second.sections, "{view}");
        }
    }

    #[test]
    fn selection_targets_follow_rendered_order() {
        let snapshot = sample_snapshot();
        assert_eq!(item_count(&snapshot, ViewKind::Nodes), 4);
        assert_eq!(
            selection_target(&snapshot, ViewKind::Nodes, 0),
            Some(DetailTarget::Node("cpu-1".to_string()))
        );
        assert_eq!(
            selection_target(&snapshot, ViewKind::Workloads, 0),
            Some(DetailTarget::Job(EntityKey::new("ml", "train-1234")))
        );
        assert_eq!(
            selection_target(&snapshot, ViewKind::Volcano, 99),
            Some(DetailTarget::VolcanoJob(EntityKey::new("ml", "llm")))
        );
        assert_eq!(selection_target(&snapshot, ViewKind::Storage, 0), None);
    }
}
