use ratatui::text::{Line, Span};

use super::nodes::{npu_cell, status_text};
use super::{RenderContext, ViewOutput, count_title};
use crate::format::{Column, format_age, meter, percent_of, row_line, toned_cell};
use crate::model::{NodeData, SuperPodData, ViewKind};
use crate::theme::{self, Tone, percent_tone};

const COLUMNS: [Column; 5] = [
    Column::new("col.node", 24),
    Column::new("col.status", 16),
    Column::new("col.npu", 7),
    Column::new("col.ip", 16),
    Column::new("col.age", 6),
];

const METER_WIDTH: usize = 20;

pub(super) fn lines(ctx: &RenderContext<'_>) -> ViewOutput {
    let title = ctx.tr.t(ViewKind::Npu.title_key());
    let mut super_pods = ctx.snapshot.super_pods.iter().collect::<Vec<_>>();
    super_pods.sort_by(|a, b| a.id.cmp(&b.id));
    let mut unassigned = ctx
        .snapshot
        .nodes
        .iter()
        .filter(|node| node.npu_capacity > 0)
        .filter(|node| {
            !super_pods
                .iter()
                .any(|pod| pod.nodes.iter().any(|member| *member == node.name))
        })
        .collect::<Vec<_>>();
    unassigned.sort_by(|a, b| a.name.cmp(&b.name));

    if super_pods.is_empty() && unassigned.is_empty() {
        return ViewOutput::no_data(ctx, title);
    }

    let mut out = ViewOutput::titled(title);
    out.lines.push(summary_line(ctx));
    out.lines.push(Line::default());

    for super_pod in super_pods {
        let mut members = super_pod
            .nodes
            .iter()
            .map(|name| (name.as_str(), ctx.snapshot.node(name)))
            .collect::<Vec<_>>();
        members.sort_by(|a, b| a.0.cmp(b.0));
        let rows = members
            .into_iter()
            .map(|(name, node)| match node {
                Some(node) => node_row(ctx, node),
                None => missing_row(name),
            })
            .collect();
        out.push_section(ctx, "superpod", super_pod_title(ctx, super_pod), &COLUMNS, rows);
    }

    if !unassigned.is_empty() {
        let rows = unassigned.iter().map(|node| node_row(ctx, node)).collect();
        out.push_section(
            ctx,
            "unassigned_npu",
            count_title(ctx, "section.unassigned_npu", unassigned.len()),
            &COLUMNS,
            rows,
        );
    }
    out
}

fn summary_line(ctx: &RenderContext<'_>) -> Line<'static> {
    let summary = &ctx.snapshot.summary;
    let percent = percent_of(u64::from(summary.npu_allocated), u64::from(summary.npu_total))
        .unwrap_or_default();
    Line::from(vec![
        Span::styled(format!("  {:<10} ", ctx.tr.t("overview.npu")), theme::label_style()),
        Span::styled(
            meter(percent, METER_WIDTH),
            percent_tone(percent, &ctx.thresholds).style(),
        ),
        Span::raw(format!(
            " {}/{} ({percent}%)",
            summary.npu_allocated, summary.npu_total
        )),
    ])
}

fn super_pod_title(ctx: &RenderContext<'_>, super_pod: &SuperPodData) -> String {
    let percent = percent_of(
        u64::from(super_pod.npu_allocated),
        u64::from(super_pod.npu_total),
    )
    .unwrap_or_default();
    let text = ctx.tr.tf(
        "npu.superpod",
        &[
            ("id", &super_pod.id),
            ("allocated", &super_pod.npu_allocated.to_string()),
            ("total", &super_pod.npu_total.to_string()),
            ("nodes", &super_pod.nodes.len().to_string()),
        ],
    );
    format!("{text}  {}", meter(percent, METER_WIDTH))
}

fn node_row(ctx: &RenderContext<'_>, node: &NodeData) -> Line<'static> {
    let (status, status_tone) = status_text(node);
    let (npu, npu_tone) = npu_cell(ctx, node);
    row_line(
        vec![
            toned_cell(&node.name, COLUMNS[0].width, Tone::Plain),
            toned_cell(status, COLUMNS[1].width, status_tone),
            toned_cell(npu, COLUMNS[2].width, npu_tone),
            toned_cell(
                node.internal_ip.as_deref().unwrap_or("-"),
                COLUMNS[3].width,
                Tone::Muted,
            ),
            toned_cell(format_age(ctx.now, node.created), COLUMNS[4].width, Tone::Muted),
        ],
        false,
    )
}

fn missing_row(name: &str) -> Line<'static> {
    row_line(
        vec![
            toned_cell(name, COLUMNS[0].width, Tone::Plain),
            toned_cell("Unknown", COLUMNS[1].width, Tone::Muted),
            toned_cell("-", COLUMNS[2].width, Tone::Muted),
            toned_cell("-", COLUMNS[3].width, Tone::Muted),
            toned_cell("-", COLUMNS[4].width, Tone::Muted),
        ],
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::lines;
    use crate::views::fixtures::{context, english, plain, sample_snapshot};

    #[test]
    fn super_pods_then_unassigned_nodes() {
        let snapshot = sample_snapshot();
        let tr = english();
        let out = lines(&context(&snapshot, &tr));
        let text = plain(&out.lines);

        let sp = text
            .iter()
            .position(|line| line.starts_with("SuperPod sp-1  6/16 NPUs  2 nodes"))
            .expect("super pod block");
        assert!(text[sp + 2].starts_with("  npu-a"));
        assert!(text[sp + 2].contains("6/8"));
        assert!(text[sp + 3].contains("NotReady"));

        let loose = text
            .iter()
            .position(|line| line.starts_with("NPU nodes without SuperPod (1)"))
            .expect("unassigned block");
        assert!(loose > sp);
        assert!(text[loose + 2].starts_with("  npu-c"));
        assert_eq!(out.selected, None);
    }
}
