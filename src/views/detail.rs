use ratatui::text::Line;

use super::nodes::{cpu_usage, npu_cell, status_text};
use super::workloads::{job_header, job_row, sort_jobs};
use super::{
    POD_COLUMNS, RenderContext, ViewOutput, count_title, pod_row, selector_text, service_ports,
    sort_pods,
};
use crate::format::{
    Column, field_line, format_age, format_bytes, format_elapsed_seconds, format_millicores,
    metric_or_dash, muted_line, ratio, row_line, section_line, toned_cell, yes_no,
};
use crate::model::{
    CronJobData, DaemonSetData, DeploymentData, DetailTarget, EntityKey, JobData, NodeData,
    PodData, PodPhase, ServiceData, StatefulSetData, VolcanoJobData,
};
use crate::sections::SECTION_HEADER_LINES;
use crate::theme::{Tone, ratio_tone};

const TASK_COLUMNS: [Column; 6] = [
    Column::new("col.task", 24),
    Column::new("col.replicas", 8),
    Column::new("col.running", 4),
    Column::new("col.pending", 4),
    Column::new("col.succeeded", 4),
    Column::new("col.failed", 4),
];

pub(super) fn lines(ctx: &RenderContext<'_>, target: &DetailTarget) -> ViewOutput {
    let snapshot = ctx.snapshot;
    let found = match target {
        DetailTarget::Node(name) => snapshot.node(name).map(|node| node_detail(ctx, node)),
        DetailTarget::Job(key) => snapshot.job(key).map(|job| job_detail(ctx, job)),
        DetailTarget::CronJob(key) => snapshot
            .cronjob(key)
            .map(|cronjob| cronjob_detail(ctx, cronjob)),
        DetailTarget::DaemonSet(key) => snapshot.daemonset(key).map(|ds| daemonset_detail(ctx, ds)),
        DetailTarget::Deployment(key) => snapshot
            .deployment(key)
            .map(|deploy| deployment_detail(ctx, deploy)),
        DetailTarget::StatefulSet(key) => snapshot
            .statefulset(key)
            .map(|sts| statefulset_detail(ctx, sts)),
        DetailTarget::Service(key) => snapshot
            .service(key)
            .map(|service| service_detail(ctx, service)),
        DetailTarget::VolcanoJob(key) => snapshot
            .volcano_job(key)
            .map(|job| volcano_detail(ctx, job)),
    };

    found.unwrap_or_else(|| {
        let mut out = ViewOutput::titled(title(ctx, target));
        out.lines.push(muted_line(ctx.tr.tf(
            "detail.not_found",
            &[("kind", target.kind_label()), ("name", &target.display_name())],
        )));
        out
    })
}

fn title(ctx: &RenderContext<'_>, target: &DetailTarget) -> String {
    ctx.tr.tf(
        "detail.title",
        &[("kind", target.kind_label()), ("name", &target.display_name())],
    )
}

fn field(
    ctx: &RenderContext<'_>,
    label_key: &str,
    value: impl Into<String>,
    tone: Tone,
) -> Line<'static> {
    field_line(&ctx.tr.t(label_key), value, tone)
}

fn header(ctx: &RenderContext<'_>, target: DetailTarget) -> ViewOutput {
    let mut out = ViewOutput::titled(title(ctx, &target));
    out.lines.push(Line::default());
    out
}

fn push_pods(ctx: &RenderContext<'_>, out: &mut ViewOutput, mut pods: Vec<&PodData>) {
    out.lines.push(Line::default());
    sort_pods(&mut pods);
    let rows = pods.iter().map(|pod| pod_row(ctx, pod)).collect();
    out.push_section(
        ctx,
        "pods",
        count_title(ctx, "section.pods", pods.len()),
        &POD_COLUMNS,
        rows,
    );
}

fn node_detail(ctx: &RenderContext<'_>, node: &NodeData) -> ViewOutput {
    let mut out = header(ctx, DetailTarget::Node(node.name.clone()));
    let (status, status_tone) = status_text(node);
    let (cpu, cpu_tone) = cpu_usage(node);
    let (memory, memory_tone) = metric_or_dash(node.memory_usage_bytes, format_bytes);
    let (npu, npu_tone) = npu_cell(ctx, node);

    out.lines.extend([
        field(ctx, "col.status", status, status_tone),
        field(
            ctx,
            "col.schedulable",
            yes_no(ctx.tr, !node.unschedulable),
            if node.unschedulable {
                Tone::Warn
            } else {
                Tone::Plain
            },
        ),
        field(
            ctx,
            "col.roles",
            if node.roles.is_empty() {
                "<none>".to_string()
            } else {
                node.roles.join(",")
            },
            Tone::Plain,
        ),
        field(ctx, "col.version", &node.kubelet_version, Tone::Muted),
        field(
            ctx,
            "col.ip",
            node.internal_ip.as_deref().unwrap_or("-"),
            Tone::Plain,
        ),
        field(
            ctx,
            "col.cpu",
            format!(
                "{cpu} / {}",
                format_millicores(node.cpu_capacity_millicores)
            ),
            cpu_tone,
        ),
        field(
            ctx,
            "col.memory",
            format!("{memory} / {}", format_bytes(node.memory_capacity_bytes)),
            memory_tone,
        ),
        field(ctx, "col.npu", npu, npu_tone),
        field(
            ctx,
            "col.superpod",
            node.super_pod_id.as_deref().unwrap_or("-"),
            Tone::Info,
        ),
        field(ctx, "col.age", format_age(ctx.now, node.created), Tone::Muted),
        field(ctx, "col.labels", selector_text(ctx, &node.labels), Tone::Muted),
    ]);

    let pods = ctx.resolver.pods_on_node(node, &ctx.snapshot.pods);
    out.lines.push(Line::default());
    if pods.is_empty() {
        out.push_section(
            ctx,
            "pods",
            count_title(ctx, "section.pods", 0),
            &POD_COLUMNS,
            Vec::new(),
        );
        return out;
    }

    for phase in PodPhase::ORDER {
        let mut group = pods
            .iter()
            .copied()
            .filter(|pod| pod.phase == phase)
            .collect::<Vec<_>>();
        if group.is_empty() {
            continue;
        }
        group.sort_by(|a, b| {
            a.namespace
                .cmp(&b.namespace)
                .then_with(|| a.name.cmp(&b.name))
        });
        let title = ctx.tr.tf(
            "section.pods_phase",
            &[("phase", phase.label()), ("count", &group.len().to_string())],
        );
        let rows = group.iter().map(|pod| pod_row(ctx, pod)).collect();
        out.push_section(ctx, "pods", title, &POD_COLUMNS, rows);
    }
    out
}

fn job_detail(ctx: &RenderContext<'_>, job: &JobData) -> ViewOutput {
    let mut out = header(ctx, DetailTarget::Job(key(&job.namespace, &job.name)));
    let duration = match (job.created, job.completed) {
        (Some(start), Some(end)) => {
            format_elapsed_seconds(end.signed_duration_since(start).num_seconds().max(0))
        }
        _ => "-".to_string(),
    };
    out.lines.extend([
        field(ctx, "col.namespace", &job.namespace, Tone::Plain),
        field(ctx, "col.status", job.outcome.label(), job.outcome.tone()),
        field(
            ctx,
            "col.completions",
            ratio(job.succeeded, job.completions),
            ratio_tone(job.succeeded, job.completions),
        ),
        field(ctx, "col.active", job.active.to_string(), Tone::Plain),
        field(ctx, "col.failed", job.failed.to_string(), count_tone(job.failed)),
        field(ctx, "col.duration", duration, Tone::Plain),
        field(ctx, "col.age", format_age(ctx.now, job.created), Tone::Muted),
    ]);
    push_pods(ctx, &mut out, ctx.resolver.pods_for_job(job, &ctx.snapshot.pods));
    out
}

fn cronjob_detail(ctx: &RenderContext<'_>, cronjob: &CronJobData) -> ViewOutput {
    let mut out = header(
        ctx,
        DetailTarget::CronJob(key(&cronjob.namespace, &cronjob.name)),
    );
    out.lines.extend([
        field(ctx, "col.namespace", &cronjob.namespace, Tone::Plain),
        field(ctx, "col.schedule", &cronjob.schedule, Tone::Info),
        field(
            ctx,
            "col.suspend",
            yes_no(ctx.tr, cronjob.suspended),
            if cronjob.suspended {
                Tone::Warn
            } else {
                Tone::Plain
            },
        ),
        field(ctx, "col.active", cronjob.active.to_string(), Tone::Plain),
        field(
            ctx,
            "col.last_schedule",
            format_age(ctx.now, cronjob.last_schedule),
            Tone::Muted,
        ),
        field(ctx, "col.age", format_age(ctx.now, cronjob.created), Tone::Muted),
    ]);

    let mut jobs = ctx.resolver.jobs_for_cronjob(cronjob, &ctx.snapshot.jobs);
    sort_jobs(&mut jobs);
    out.lines.push(Line::default());
    let start = out.lines.len();
    out.lines
        .push(section_line(count_title(ctx, "section.jobs", jobs.len())));
    out.lines.push(job_header(ctx));
    if jobs.is_empty() {
        out.lines.push(muted_line(ctx.tr.t("common.no_data")));
    } else {
        out.lines
            .extend(jobs.iter().map(|job| job_row(ctx, job, false)));
    }
    out.sections
        .push("jobs", start, SECTION_HEADER_LINES, jobs.len());
    out
}

fn daemonset_detail(ctx: &RenderContext<'_>, ds: &DaemonSetData) -> ViewOutput {
    let mut out = header(ctx, DetailTarget::DaemonSet(key(&ds.namespace, &ds.name)));
    out.lines.extend([
        field(ctx, "col.namespace", &ds.namespace, Tone::Plain),
        field(ctx, "col.desired", ds.desired.to_string(), Tone::Plain),
        field(ctx, "col.current", ds.current.to_string(), Tone::Plain),
        field(
            ctx,
            "col.ready",
            ratio(ds.ready, ds.desired),
            ratio_tone(ds.ready, ds.desired),
        ),
        field(ctx, "col.selector", selector_text(ctx, &ds.selector), Tone::Muted),
        field(ctx, "col.age", format_age(ctx.now, ds.created), Tone::Muted),
    ]);
    push_pods(ctx, &mut out, ctx.resolver.pods_for_daemonset(ds, &ctx.snapshot.pods));
    out
}

fn deployment_detail(ctx: &RenderContext<'_>, deploy: &DeploymentData) -> ViewOutput {
    let mut out = header(
        ctx,
        DetailTarget::Deployment(key(&deploy.namespace, &deploy.name)),
    );
    out.lines.extend([
        field(ctx, "col.namespace", &deploy.namespace, Tone::Plain),
        field(
            ctx,
            "col.ready",
            ratio(deploy.ready, deploy.replicas),
            ratio_tone(deploy.ready, deploy.replicas),
        ),
        field(ctx, "col.up_to_date", deploy.updated.to_string(), Tone::Plain),
        field(ctx, "col.available", deploy.available.to_string(), Tone::Plain),
        field(
            ctx,
            "col.selector",
            selector_text(ctx, &deploy.selector),
            Tone::Muted,
        ),
        field(ctx, "col.age", format_age(ctx.now, deploy.created), Tone::Muted),
    ]);
    push_pods(
        ctx,
        &mut out,
        ctx.resolver.pods_for_deployment(deploy, &ctx.snapshot.pods),
    );
    out
}

fn statefulset_detail(ctx: &RenderContext<'_>, sts: &StatefulSetData) -> ViewOutput {
    let mut out = header(
        ctx,
        DetailTarget::StatefulSet(key(&sts.namespace, &sts.name)),
    );
    out.lines.extend([
        field(ctx, "col.namespace", &sts.namespace, Tone::Plain),
        field(
            ctx,
            "col.ready",
            ratio(sts.ready, sts.replicas),
            ratio_tone(sts.ready, sts.replicas),
        ),
        field(ctx, "col.selector", selector_text(ctx, &sts.selector), Tone::Muted),
        field(ctx, "col.age", format_age(ctx.now, sts.created), Tone::Muted),
    ]);
    push_pods(
        ctx,
        &mut out,
        ctx.resolver.pods_for_statefulset(sts, &ctx.snapshot.pods),
    );
    out
}

fn service_detail(ctx: &RenderContext<'_>, service: &ServiceData) -> ViewOutput {
    let mut out = header(
        ctx,
        DetailTarget::Service(key(&service.namespace, &service.name)),
    );
    let external = if service.external_ips.is_empty() {
        "<none>".to_string()
    } else {
        service.external_ips.join(",")
    };
    out.lines.extend([
        field(ctx, "col.namespace", &service.namespace, Tone::Plain),
        field(ctx, "col.type", &service.service_type, Tone::Info),
        field(
            ctx,
            "col.cluster_ip",
            service.cluster_ip.as_deref().unwrap_or("None"),
            Tone::Plain,
        ),
        field(ctx, "col.external_ip", external, Tone::Plain),
        field(ctx, "col.ports", service_ports(service), Tone::Plain),
        field(
            ctx,
            "col.selector",
            selector_text(ctx, &service.selector),
            Tone::Muted,
        ),
        field(ctx, "col.age", format_age(ctx.now, service.created), Tone::Muted),
    ]);
    push_pods(
        ctx,
        &mut out,
        ctx.resolver.pods_for_service(service, &ctx.snapshot.pods),
    );
    out
}

fn volcano_detail(ctx: &RenderContext<'_>, job: &VolcanoJobData) -> ViewOutput {
    let mut out = header(
        ctx,
        DetailTarget::VolcanoJob(key(&job.namespace, &job.name)),
    );
    out.lines.extend([
        field(ctx, "col.namespace", &job.namespace, Tone::Plain),
        field(ctx, "col.queue", &job.queue, Tone::Info),
        field(ctx, "col.status", job.phase.label(), job.phase.tone()),
        field(
            ctx,
            "col.min_available",
            job.min_available.to_string(),
            Tone::Plain,
        ),
        field(
            ctx,
            "col.running",
            ratio(job.running, job.min_available),
            ratio_tone(job.running, job.min_available),
        ),
        field(ctx, "col.pending", job.pending.to_string(), Tone::Plain),
        field(ctx, "col.succeeded", job.succeeded.to_string(), Tone::Plain),
        field(ctx, "col.failed", job.failed.to_string(), count_tone(job.failed)),
        field(ctx, "col.age", format_age(ctx.now, job.created), Tone::Muted),
    ]);

    out.lines.push(Line::default());
    let mut tasks = job.tasks.iter().collect::<Vec<_>>();
    tasks.sort_by(|a, b| a.name.cmp(&b.name));
    let rows = tasks
        .iter()
        .map(|task| {
            row_line(
                vec![
                    toned_cell(&task.name, TASK_COLUMNS[0].width, Tone::Plain),
                    toned_cell(
                        task.replicas.to_string(),
                        TASK_COLUMNS[1].width,
                        Tone::Plain,
                    ),
                    toned_cell(
                        task.running.to_string(),
                        TASK_COLUMNS[2].width,
                        ratio_tone(task.running, task.replicas),
                    ),
                    toned_cell(task.pending.to_string(), TASK_COLUMNS[3].width, Tone::Plain),
                    toned_cell(
                        task.succeeded.to_string(),
                        TASK_COLUMNS[4].width,
                        Tone::Plain,
                    ),
                    toned_cell(
                        task.failed.to_string(),
                        TASK_COLUMNS[5].width,
                        count_tone(task.failed),
                    ),
                ],
                false,
            )
        })
        .collect();
    out.push_section(
        ctx,
        "tasks",
        count_title(ctx, "section.tasks", tasks.len()),
        &TASK_COLUMNS,
        rows,
    );
    push_pods(
        ctx,
        &mut out,
        ctx.resolver.pods_for_volcano_job(job, &ctx.snapshot.pods),
    );
    out
}

fn key(namespace: &str, name: &str) -> EntityKey {
    EntityKey::new(namespace, name)
}

fn count_tone(failed: u32) -> Tone {
    if failed > 0 { Tone::Bad } else { Tone::Plain }
}

#[cfg(test)]
mod tests {
    use super::lines;
    use crate::model::{DetailTarget, EntityKey};
    use crate::views::fixtures::{context, english, plain, sample_snapshot};

    fn render(target: DetailTarget) -> Vec<String> {
        let snapshot = sample_snapshot();
        let tr = english();
        plain(&lines(&context(&snapshot, &tr), &target).lines)
    }

    #[test]
    fn node_detail_groups_pods_by_phase() {
        let text = render(DetailTarget::Node("npu-a".to_string()));
        assert_eq!(text[0], "Node npu-a");
        let running = text
            .iter()
            .position(|line| line == "Running (1)")
            .expect("running group");
        let pending = text
            .iter()
            .position(|line| line == "Pending (1)")
            .expect("pending group");
        let failed = text
            .iter()
            .position(|line| line == "Failed (1)")
            .expect("failed group");
        assert!(running < pending && pending < failed);
        assert!(text[running + 2].starts_with("  llm-worker-0"));
    }

    #[test]
    fn job_detail_lists_prefix_matched_pods_only() {
        let text = render(DetailTarget::Job(EntityKey::new("ml", "train-123")));
        assert!(text.iter().any(|line| line == "Pods (1)"));
        assert!(text.iter().any(|line| line.starts_with("  train-123-0")));
        assert!(!text.iter().any(|line| line.starts_with("  train-1234-0")));
    }

    #[test]
    fn daemonset_detail_uses_selector() {
        let text = render(DetailTarget::DaemonSet(EntityKey::new(
            "kube-system",
            "agent",
        )));
        assert!(text.iter().any(|line| line.contains("app=agent")));
        assert!(text.iter().any(|line| line.starts_with("  agent-x1")));
    }

    #[test]
    fn cronjob_detail_lists_owned_jobs() {
        let text = render(DetailTarget::CronJob(EntityKey::new("ops", "backup")));
        let jobs = text
            .iter()
            .position(|line| line == "Jobs (2)")
            .expect("jobs section");
        assert!(text[jobs + 2].starts_with("  backup-2"));
        assert!(text[jobs + 3].starts_with("  backup-1"));
    }

    #[test]
    fn volcano_detail_shows_tasks_and_labelled_pods() {
        let text = render(DetailTarget::VolcanoJob(EntityKey::new("ml", "llm")));
        assert!(text.iter().any(|line| line == "Tasks (1)"));
        assert!(text.iter().any(|line| line.starts_with("  worker")));
        assert!(text.iter().any(|line| line.starts_with("  llm-worker-0")));
    }

    #[test]
    fn vanished_entity_renders_not_found() {
        let text = render(DetailTarget::Service(EntityKey::new("shop", "gone")));
        assert_eq!(text.len(), 2);
        assert_eq!(text[1].trim(), "Service shop/gone is no longer in the snapshot");
    }
}
