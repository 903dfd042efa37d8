use ratatui::text::Line;

use super::{RenderContext, ViewOutput, count_title};
use crate::format::{
    Column, format_age, format_millicores, metric_or_dash, percent_cell, percent_of, ratio,
    row_line, toned_cell,
};
use crate::model::{ClusterSnapshot, NodeData, ViewKind};
use crate::sections::clamp_selection;
use crate::theme::{Tone, percent_tone};

const COLUMNS: [Column; 8] = [
    Column::new("col.name", 24),
    Column::new("col.status", 16),
    Column::new("col.roles", 14),
    Column::new("col.cpu", 6),
    Column::new("col.memory", 6),
    Column::new("col.pods", 9),
    Column::new("col.npu", 7),
    Column::new("col.age", 6),
];

pub(super) fn ordered(snapshot: &ClusterSnapshot) -> Vec<&NodeData> {
    let mut nodes = snapshot.nodes.iter().collect::<Vec<_>>();
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    nodes
}

pub(super) fn lines(ctx: &RenderContext<'_>, selected: usize) -> ViewOutput {
    let title = ctx.tr.t(ViewKind::Nodes.title_key());
    if ctx.snapshot.nodes.is_empty() {
        return ViewOutput::no_data(ctx, title);
    }

    let nodes = ordered(ctx.snapshot);
    let selected = clamp_selection(selected, nodes.len());
    let rows = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let pods = ctx.resolver.pods_on_node(node, &ctx.snapshot.pods).len();
            node_row(ctx, node, pods, selected == Some(index))
        })
        .collect();

    let mut out = ViewOutput::titled(title);
    out.lines.push(Line::default());
    out.push_section(
        ctx,
        "nodes",
        count_title(ctx, "section.nodes", nodes.len()),
        &COLUMNS,
        rows,
    );
    out.selected = selected;
    out
}

pub(super) fn status_text(node: &NodeData) -> (String, Tone) {
    let mut text = node.status.label().to_string();
    let mut tone = node.status.tone();
    if node.unschedulable {
        text.push_str(",SchedulingDisabled");
        if tone == Tone::Good {
            tone = Tone::Warn;
        }
    }
    (text, tone)
}

fn node_row(
    ctx: &RenderContext<'_>,
    node: &NodeData,
    pods: usize,
    selected: bool,
) -> Line<'static> {
    let (status, status_tone) = status_text(node);
    let roles = if node.roles.is_empty() {
        "<none>".to_string()
    } else {
        node.roles.join(",")
    };
    let (cpu, cpu_tone) = percent_cell(
        node.cpu_usage_millicores,
        node.cpu_capacity_millicores,
        &ctx.thresholds,
    );
    let (mem, mem_tone) = percent_cell(
        node.memory_usage_bytes,
        node.memory_capacity_bytes,
        &ctx.thresholds,
    );
    let pods_text = if node.pod_capacity == 0 {
        pods.to_string()
    } else {
        format!("{pods}/{}", node.pod_capacity)
    };
    let (npu, npu_tone) = npu_cell(ctx, node);

    row_line(
        vec![
            toned_cell(&node.name, COLUMNS[0].width, Tone::Plain),
            toned_cell(status, COLUMNS[1].width, status_tone),
            toned_cell(roles, COLUMNS[2].width, Tone::Muted),
            toned_cell(cpu, COLUMNS[3].width, cpu_tone),
            toned_cell(mem, COLUMNS[4].width, mem_tone),
            toned_cell(pods_text, COLUMNS[5].width, Tone::Plain),
            toned_cell(npu, COLUMNS[6].width, npu_tone),
            toned_cell(format_age(ctx.now, node.created), COLUMNS[7].width, Tone::Muted),
        ],
        selected,
    )
}

pub(super) fn npu_cell(ctx: &RenderContext<'_>, node: &NodeData) -> (String, Tone) {
    if node.npu_capacity == 0 {
        return ("-".to_string(), Tone::Muted);
    }
    let percent = percent_of(u64::from(node.npu_allocated), u64::from(node.npu_capacity))
        .unwrap_or_default();
    (
        ratio(node.npu_allocated, node.npu_capacity),
        percent_tone(percent, &ctx.thresholds),
    )
}

pub(super) fn cpu_usage(node: &NodeData) -> (String, Tone) {
    metric_or_dash(node.cpu_usage_millicores, format_millicores)
}

#[cfg(test)]
mod tests {
    use super::lines;
    use crate::format::plain_text;
    use crate::views::fixtures::{context, english, plain, sample_snapshot};

    #[test]
    fn nodes_render_sorted_with_selection_marker() {
        let snapshot = sample_snapshot();
        let tr = english();
        let out = lines(&context(&snapshot, &tr), 1);
        let text = plain(&out.lines);
        assert_eq!(text[0], "Nodes");
        assert!(text[2].starts_with("Nodes (4)"));
        assert!(text[4].starts_with("  cpu-1"));
        assert!(text[5].starts_with("> npu-a"));
        assert!(text[6].contains("NotReady"));
        assert_eq!(out.target_line(), Some(5));
    }

    #[test]
    fn shrinking_node_list_reclamps_selection() {
        let mut snapshot = sample_snapshot();
        let tr = english();
        let out = lines(&context(&snapshot, &tr), 9);
        assert_eq!(out.selected, Some(3));

        snapshot.nodes.truncate(2);
        let out = lines(&context(&snapshot, &tr), 9);
        assert_eq!(out.selected, Some(1));
        assert_eq!(out.target_line(), Some(5));
        assert!(plain_text(&out.lines[5]).starts_with("> "));
    }

    #[test]
    fn zero_usage_renders_as_dash() {
        let mut snapshot = sample_snapshot();
        snapshot.nodes[0].cpu_usage_millicores = 0;
        let tr = english();
        let text = plain(&lines(&context(&snapshot, &tr), 1).lines);
        assert!(text[4].starts_with("  "));
        let cells = text[4].split_whitespace().collect::<Vec<_>>();
        assert_eq!(cells[0], "cpu-1");
        assert_eq!(cells[3], "-");
    }
}
