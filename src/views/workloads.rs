use ratatui::text::Line;

use super::{RenderContext, ViewOutput, count_title, service_ports};
use crate::format::{Column, format_age, header_line, ratio, row_line, toned_cell, yes_no};
use crate::model::{
    ClusterSnapshot, CronJobData, DaemonSetData, DeploymentData, DetailTarget, EntityKey,
    JobData, ServiceData, StatefulSetData, ViewKind,
};
use crate::sections::clamp_selection;
use crate::theme::{Tone, ratio_tone};

const JOB_COLUMNS: [Column; 5] = [
    Column::new("col.name", 28),
    Column::new("col.namespace", 14),
    Column::new("col.status", 10),
    Column::new("col.completions", 11),
    Column::new("col.age", 6),
];

const SERVICE_COLUMNS: [Column; 6] = [
    Column::new("col.name", 28),
    Column::new("col.namespace", 14),
    Column::new("col.type", 12),
    Column::new("col.cluster_ip", 15),
    Column::new("col.ports", 22),
    Column::new("col.age", 6),
];

const DEPLOYMENT_COLUMNS: [Column; 6] = [
    Column::new("col.name", 28),
    Column::new("col.namespace", 14),
    Column::new("col.ready", 7),
    Column::new("col.up_to_date", 10),
    Column::new("col.available", 9),
    Column::new("col.age", 6),
];

const STATEFULSET_COLUMNS: [Column; 4] = [
    Column::new("col.name", 28),
    Column::new("col.namespace", 14),
    Column::new("col.ready", 7),
    Column::new("col.age", 6),
];

const DAEMONSET_COLUMNS: [Column; 6] = [
    Column::new("col.name", 28),
    Column::new("col.namespace", 14),
    Column::new("col.desired", 7),
    Column::new("col.current", 7),
    Column::new("col.ready", 7),
    Column::new("col.age", 6),
];

const CRONJOB_COLUMNS: [Column; 7] = [
    Column::new("col.name", 28),
    Column::new("col.namespace", 14),
    Column::new("col.schedule", 14),
    Column::new("col.suspend", 7),
    Column::new("col.active", 6),
    Column::new("col.last_schedule", 6),
    Column::new("col.age", 6),
];

/// Workload collections in render order. Both the view and the selection
/// lookup go through here so they cannot disagree on ordering.
pub(crate) struct WorkloadLists<'a> {
    pub jobs: Vec<&'a JobData>,
    pub services: Vec<&'a ServiceData>,
    pub deployments: Vec<&'a DeploymentData>,
    pub statefulsets: Vec<&'a StatefulSetData>,
    pub daemonsets: Vec<&'a DaemonSetData>,
    pub cronjobs: Vec<&'a CronJobData>,
}

impl<'a> WorkloadLists<'a> {
    pub fn collect(snapshot: &'a ClusterSnapshot) -> Self {
        let mut jobs = snapshot.jobs.iter().collect::<Vec<_>>();
        sort_jobs(&mut jobs);

        Self {
            jobs,
            services: by_namespace_and_name(&snapshot.services, |svc| (&svc.namespace, &svc.name)),
            deployments: by_namespace_and_name(&snapshot.deployments, |d| (&d.namespace, &d.name)),
            statefulsets: by_namespace_and_name(&snapshot.statefulsets, |s| {
                (&s.namespace, &s.name)
            }),
            daemonsets: by_namespace_and_name(&snapshot.daemonsets, |d| (&d.namespace, &d.name)),
            cronjobs: by_namespace_and_name(&snapshot.cronjobs, |c| (&c.namespace, &c.name)),
        }
    }

    fn sizes(&self) -> [usize; 6] {
        [
            self.jobs.len(),
            self.services.len(),
            self.deployments.len(),
            self.statefulsets.len(),
            self.daemonsets.len(),
            self.cronjobs.len(),
        ]
    }

    pub fn total(&self) -> usize {
        self.sizes().iter().sum()
    }

    pub fn target(&self, selected: usize) -> Option<DetailTarget> {
        let mut index = selected;
        if let Some(job) = self.jobs.get(index) {
            return Some(DetailTarget::Job(key(&job.namespace, &job.name)));
        }
        index -= self.jobs.len();
        if let Some(svc) = self.services.get(index) {
            return Some(DetailTarget::Service(key(&svc.namespace, &svc.name)));
        }
        index -= self.services.len();
        if let Some(deploy) = self.deployments.get(index) {
            return Some(DetailTarget::Deployment(key(&deploy.namespace, &deploy.name)));
        }
        index -= self.deployments.len();
        if let Some(sts) = self.statefulsets.get(index) {
            return Some(DetailTarget::StatefulSet(key(&sts.namespace, &sts.name)));
        }
        index -= self.statefulsets.len();
        if let Some(ds) = self.daemonsets.get(index) {
            return Some(DetailTarget::DaemonSet(key(&ds.namespace, &ds.name)));
        }
        index -= self.daemonsets.len();
        self.cronjobs
            .get(index)
            .map(|cronjob| DetailTarget::CronJob(key(&cronjob.namespace, &cronjob.name)))
    }
}

fn key(namespace: &str, name: &str) -> EntityKey {
    EntityKey::new(namespace, name)
}

fn by_namespace_and_name<T>(
    items: &[T],
    sort_key: impl Fn(&T) -> (&String, &String),
) -> Vec<&T> {
    let mut sorted = items.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    sorted
}

pub(super) fn sort_jobs(jobs: &mut [&JobData]) {
    jobs.sort_by(|a, b| {
        a.outcome
            .group_rank()
            .cmp(&b.outcome.group_rank())
            .then_with(|| b.created.cmp(&a.created))
            .then_with(|| a.namespace.cmp(&b.namespace))
            .then_with(|| a.name.cmp(&b.name))
    });
}

pub(super) fn lines(ctx: &RenderContext<'_>, selected: usize) -> ViewOutput {
    let title = ctx.tr.t(ViewKind::Workloads.title_key());
    let lists = WorkloadLists::collect(ctx.snapshot);
    let total = lists.total();
    if total == 0 {
        return ViewOutput::no_data(ctx, title);
    }

    let selected = clamp_selection(selected, total);
    let mut out = ViewOutput::titled(title);
    out.lines.push(Line::default());
    let mut base = 0usize;
    let is_selected = |base: usize, index: usize| selected == Some(base + index);

    let rows = lists
        .jobs
        .iter()
        .enumerate()
        .map(|(i, job)| job_row(ctx, job, is_selected(base, i)))
        .collect();
    out.push_section(
        ctx,
        "jobs",
        count_title(ctx, "section.jobs", lists.jobs.len()),
        &JOB_COLUMNS,
        rows,
    );
    base += lists.jobs.len();

    let rows = lists
        .services
        .iter()
        .enumerate()
        .map(|(i, svc)| service_row(ctx, svc, is_selected(base, i)))
        .collect();
    out.push_section(
        ctx,
        "services",
        count_title(ctx, "section.services", lists.services.len()),
        &SERVICE_COLUMNS,
        rows,
    );
    base += lists.services.len();

    let rows = lists
        .deployments
        .iter()
        .enumerate()
        .map(|(i, deploy)| deployment_row(ctx, deploy, is_selected(base, i)))
        .collect();
    out.push_section(
        ctx,
        "deployments",
        count_title(ctx, "section.deployments", lists.deployments.len()),
        &DEPLOYMENT_COLUMNS,
        rows,
    );
    base += lists.deployments.len();

    let rows = lists
        .statefulsets
        .iter()
        .enumerate()
        .map(|(i, sts)| statefulset_row(ctx, sts, is_selected(base, i)))
        .collect();
    out.push_section(
        ctx,
        "statefulsets",
        count_title(ctx, "section.statefulsets", lists.statefulsets.len()),
        &STATEFULSET_COLUMNS,
        rows,
    );
    base += lists.statefulsets.len();

    let rows = lists
        .daemonsets
        .iter()
        .enumerate()
        .map(|(i, ds)| daemonset_row(ctx, ds, is_selected(base, i)))
        .collect();
    out.push_section(
        ctx,
        "daemonsets",
        count_title(ctx, "section.daemonsets", lists.daemonsets.len()),
        &DAEMONSET_COLUMNS,
        rows,
    );
    base += lists.daemonsets.len();

    let rows = lists
        .cronjobs
        .iter()
        .enumerate()
        .map(|(i, cronjob)| cronjob_row(ctx, cronjob, is_selected(base, i)))
        .collect();
    out.push_section(
        ctx,
        "cronjobs",
        count_title(ctx, "section.cronjobs", lists.cronjobs.len()),
        &CRONJOB_COLUMNS,
        rows,
    );

    out.selected = selected;
    out
}

pub(super) fn job_row(ctx: &RenderContext<'_>, job: &JobData, selected: bool) -> Line<'static> {
    row_line(
        vec![
            toned_cell(&job.name, JOB_COLUMNS[0].width, Tone::Plain),
            toned_cell(&job.namespace, JOB_COLUMNS[1].width, Tone::Muted),
            toned_cell(job.outcome.label(), JOB_COLUMNS[2].width, job.outcome.tone()),
            toned_cell(
                ratio(job.succeeded, job.completions),
                JOB_COLUMNS[3].width,
                ratio_tone(job.succeeded, job.completions),
            ),
            toned_cell(format_age(ctx.now, job.created), JOB_COLUMNS[4].width, Tone::Muted),
        ],
        selected,
    )
}

pub(super) fn job_header(ctx: &RenderContext<'_>) -> Line<'static> {
    header_line(ctx.tr, &JOB_COLUMNS)
}

fn service_row(ctx: &RenderContext<'_>, svc: &ServiceData, selected: bool) -> Line<'static> {
    row_line(
        vec![
            toned_cell(&svc.name, SERVICE_COLUMNS[0].width, Tone::Plain),
            toned_cell(&svc.namespace, SERVICE_COLUMNS[1].width, Tone::Muted),
            toned_cell(&svc.service_type, SERVICE_COLUMNS[2].width, Tone::Info),
            toned_cell(
                svc.cluster_ip.as_deref().unwrap_or("None"),
                SERVICE_COLUMNS[3].width,
                Tone::Plain,
            ),
            toned_cell(service_ports(svc), SERVICE_COLUMNS[4].width, Tone::Plain),
            toned_cell(format_age(ctx.now, svc.created), SERVICE_COLUMNS[5].width, Tone::Muted),
        ],
        selected,
    )
}

fn deployment_row(
    ctx: &RenderContext<'_>,
    deploy: &DeploymentData,
    selected: bool,
) -> Line<'static> {
    let columns = &DEPLOYMENT_COLUMNS;
    row_line(
        vec![
            toned_cell(&deploy.name, columns[0].width, Tone::Plain),
            toned_cell(&deploy.namespace, columns[1].width, Tone::Muted),
            toned_cell(
                ratio(deploy.ready, deploy.replicas),
                columns[2].width,
                ratio_tone(deploy.ready, deploy.replicas),
            ),
            toned_cell(deploy.updated.to_string(), columns[3].width, Tone::Plain),
            toned_cell(deploy.available.to_string(), columns[4].width, Tone::Plain),
            toned_cell(format_age(ctx.now, deploy.created), columns[5].width, Tone::Muted),
        ],
        selected,
    )
}

fn statefulset_row(
    ctx: &RenderContext<'_>,
    sts: &StatefulSetData,
    selected: bool,
) -> Line<'static> {
    let columns = &STATEFULSET_COLUMNS;
    row_line(
        vec![
            toned_cell(&sts.name, columns[0].width, Tone::Plain),
            toned_cell(&sts.namespace, columns[1].width, Tone::Muted),
            toned_cell(
                ratio(sts.ready, sts.replicas),
                columns[2].width,
                ratio_tone(sts.ready, sts.replicas),
            ),
            toned_cell(format_age(ctx.now, sts.created), columns[3].width, Tone::Muted),
        ],
        selected,
    )
}

fn daemonset_row(ctx: &RenderContext<'_>, ds: &DaemonSetData, selected: bool) -> Line<'static> {
    let columns = &DAEMONSET_COLUMNS;
    row_line(
        vec![
            toned_cell(&ds.name, columns[0].width, Tone::Plain),
            toned_cell(&ds.namespace, columns[1].width, Tone::Muted),
            toned_cell(ds.desired.to_string(), columns[2].width, Tone::Plain),
            toned_cell(ds.current.to_string(), columns[3].width, Tone::Plain),
            toned_cell(
                ds.ready.to_string(),
                columns[4].width,
                ratio_tone(ds.ready, ds.desired),
            ),
            toned_cell(format_age(ctx.now, ds.created), columns[5].width, Tone::Muted),
        ],
        selected,
    )
}

fn cronjob_row(ctx: &RenderContext<'_>, cronjob: &CronJobData, selected: bool) -> Line<'static> {
    let columns = &CRONJOB_COLUMNS;
    let suspend_tone = if cronjob.suspended {
        Tone::Warn
    } else {
        Tone::Muted
    };
    row_line(
        vec![
            toned_cell(&cronjob.name, columns[0].width, Tone::Plain),
            toned_cell(&cronjob.namespace, columns[1].width, Tone::Muted),
            toned_cell(&cronjob.schedule, columns[2].width, Tone::Info),
            toned_cell(yes_no(ctx.tr, cronjob.suspended), columns[3].width, suspend_tone),
            toned_cell(cronjob.active.to_string(), columns[4].width, Tone::Plain),
            toned_cell(
                format_age(ctx.now, cronjob.last_schedule),
                columns[5].width,
                Tone::Muted,
            ),
            toned_cell(format_age(ctx.now, cronjob.created), columns[6].width, Tone::Muted),
        ],
        selected,
    )
}

#[cfg(test)]
mod tests {
    use super::{WorkloadLists, lines};
    use crate::format::plain_text;
    use crate::model::{ClusterSnapshot, DetailTarget, EntityKey, JobOutcome};
    use crate::sections::SECTION_HEADER_LINES;
    use crate::views::fixtures::{context, english, job, plain, sample_snapshot};

    #[test]
    fn jobs_group_by_outcome_then_newest_first() {
        let snapshot = sample_snapshot();
        let names = WorkloadLists::collect(&snapshot)
            .jobs
            .iter()
            .map(|job| job.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["train-1234", "train-123", "backup-2", "backup-1"]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_namespace_then_name() {
        let snapshot = ClusterSnapshot {
            jobs: vec![
                job("b", "x", JobOutcome::Running, 10),
                job("a", "z", JobOutcome::Running, 10),
                job("a", "y", JobOutcome::Running, 10),
            ],
            ..ClusterSnapshot::default()
        };
        let lists = WorkloadLists::collect(&snapshot);
        let keys = lists
            .jobs
            .iter()
            .map(|job| format!("{}/{}", job.namespace, job.name))
            .collect::<Vec<_>>();
        assert_eq!(keys, ["a/y", "a/z", "b/x"]);
    }

    #[test]
    fn section_index_matches_rendered_rows() {
        let snapshot = sample_snapshot();
        let tr = english();
        let ctx = context(&snapshot, &tr);
        let lists = WorkloadLists::collect(&snapshot);

        for selected in 0..lists.total() {
            let out = lines(&ctx, selected);
            let line = out.target_line().expect("selection resolves");
            let text = plain_text(&out.lines[line]);
            assert!(text.starts_with("> "), "row {selected}: {text}");

            let (section, offset) = out.sections.locate(selected).expect("in range");
            assert_eq!(out.sections.section_at_line(line), Some(section));
            let start = out.sections.sections()[section].start_line;
            assert_eq!(line, start + SECTION_HEADER_LINES + offset);

            let name = match lists.target(selected).expect("target") {
                DetailTarget::Job(key)
                | DetailTarget::Service(key)
                | DetailTarget::Deployment(key)
                | DetailTarget::StatefulSet(key)
                | DetailTarget::DaemonSet(key)
                | DetailTarget::CronJob(key) => key.name,
                other => panic!("unexpected target {other:?}"),
            };
            assert!(text[2..].starts_with(&name), "{text} vs {name}");
        }
    }

    #[test]
    fn empty_sections_keep_their_place() {
        let snapshot = sample_snapshot();
        let tr = english();
        let out = lines(&context(&snapshot, &tr), 0);
        let names = out
            .sections
            .sections()
            .iter()
            .map(|section| (section.name, section.item_count))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                ("jobs", 4),
                ("services", 1),
                ("deployments", 1),
                ("statefulsets", 0),
                ("daemonsets", 1),
                ("cronjobs", 1),
            ]
        );
        let text = plain(&out.lines);
        assert!(text.iter().any(|line| line.starts_with("StatefulSets (0)")));
    }

    #[test]
    fn stale_selection_clamps_to_last_workload() {
        let snapshot = sample_snapshot();
        let tr = english();
        let out = lines(&context(&snapshot, &tr), 50);
        assert_eq!(out.selected, Some(7));
        assert_eq!(
            WorkloadLists::collect(&snapshot).target(7),
            Some(DetailTarget::CronJob(EntityKey::new("ops", "backup")))
        );
        assert_eq!(WorkloadLists::collect(&snapshot).target(8), None);
    }
}
