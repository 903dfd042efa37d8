use ratatui::text::{Line, Span};

use super::{RenderContext, ViewOutput, count_title};
use crate::format::{Column, format_age, row_line, toned_cell};
use crate::model::{ClusterSnapshot, VolcanoJobData, ViewKind};
use crate::sections::clamp_selection;
use crate::theme::Tone;

const COLUMNS: [Column; 10] = [
    Column::new("col.name", 26),
    Column::new("col.namespace", 12),
    Column::new("col.queue", 10),
    Column::new("col.status", 12),
    Column::new("col.min_available", 4),
    Column::new("col.running", 4),
    Column::new("col.pending", 4),
    Column::new("col.succeeded", 4),
    Column::new("col.failed", 4),
    Column::new("col.age", 6),
];

pub(super) fn ordered(snapshot: &ClusterSnapshot) -> Vec<&VolcanoJobData> {
    let mut jobs = snapshot.volcano_jobs.iter().collect::<Vec<_>>();
    jobs.sort_by(|a, b| {
        a.phase
            .group_rank()
            .cmp(&b.phase.group_rank())
            .then_with(|| b.created.cmp(&a.created))
            .then_with(|| a.namespace.cmp(&b.namespace))
            .then_with(|| a.name.cmp(&b.name))
    });
    jobs
}

pub(super) fn lines(ctx: &RenderContext<'_>, selected: usize) -> ViewOutput {
    let title = ctx.tr.t(ViewKind::Volcano.title_key());
    if ctx.snapshot.volcano_jobs.is_empty() {
        return ViewOutput::no_data(ctx, title);
    }

    let jobs = ordered(ctx.snapshot);
    let selected = clamp_selection(selected, jobs.len());
    let rows = jobs
        .iter()
        .enumerate()
        .map(|(index, job)| job_row(ctx, job, selected == Some(index)))
        .collect();

    let mut out = ViewOutput::titled(title);
    out.lines.push(Line::default());
    out.push_section(
        ctx,
        "volcano_jobs",
        count_title(ctx, "section.volcano_jobs", jobs.len()),
        &COLUMNS,
        rows,
    );
    out.selected = selected;
    out
}

fn count_cell(value: u32, width: usize, tone: Tone) -> Span<'static> {
    if value == 0 {
        toned_cell("0", width, Tone::Muted)
    } else {
        toned_cell(value.to_string(), width, tone)
    }
}

fn job_row(ctx: &RenderContext<'_>, job: &VolcanoJobData, selected: bool) -> Line<'static> {
    let below_min = job.min_available > 0 && job.running < job.min_available;
    let min_tone = if below_min && job.phase.is_active() {
        Tone::Warn
    } else {
        Tone::Plain
    };
    row_line(
        vec![
            toned_cell(&job.name, COLUMNS[0].width, Tone::Plain),
            toned_cell(&job.namespace, COLUMNS[1].width, Tone::Muted),
            toned_cell(&job.queue, COLUMNS[2].width, Tone::Info),
            toned_cell(job.phase.label(), COLUMNS[3].width, job.phase.tone()),
            toned_cell(job.min_available.to_string(), COLUMNS[4].width, min_tone),
            count_cell(job.running, COLUMNS[5].width, Tone::Good),
            count_cell(job.pending, COLUMNS[6].width, Tone::Warn),
            count_cell(job.succeeded, COLUMNS[7].width, Tone::Plain),
            count_cell(job.failed, COLUMNS[8].width, Tone::Bad),
            toned_cell(format_age(ctx.now, job.created), COLUMNS[9].width, Tone::Muted),
        ],
        selected,
    )
}
