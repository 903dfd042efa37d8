use ratatui::text::Line;

use super::{RenderContext, ViewOutput, count_title, service_ports};
use crate::format::{
    Column, format_age, format_rate, metric_or_dash, muted_line, row_line, section_line,
    toned_cell,
};
use crate::model::{MetricHistory, NodeData, ServiceData, ViewKind};
use crate::theme::Tone;

const TRAFFIC_COLUMNS: [Column; 4] = [
    Column::new("col.node", 24),
    Column::new("col.ip", 16),
    Column::new("col.rx", 12),
    Column::new("col.tx", 12),
];

const SERVICE_COLUMNS: [Column; 7] = [
    Column::new("col.name", 26),
    Column::new("col.namespace", 14),
    Column::new("col.type", 12),
    Column::new("col.cluster_ip", 15),
    Column::new("col.external_ip", 15),
    Column::new("col.ports", 22),
    Column::new("col.age", 6),
];

pub(super) fn lines(ctx: &RenderContext<'_>) -> ViewOutput {
    let title = ctx.tr.t(ViewKind::Network.title_key());
    if ctx.snapshot.nodes.is_empty() && ctx.snapshot.services.is_empty() {
        return ViewOutput::no_data(ctx, title);
    }

    let mut nodes = ctx.snapshot.nodes.iter().collect::<Vec<_>>();
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    let mut services = ctx.snapshot.services.iter().collect::<Vec<_>>();
    services.sort_by(|a, b| {
        a.namespace
            .cmp(&b.namespace)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut out = ViewOutput::titled(title);
    out.lines.push(Line::default());

    let history = &ctx.snapshot.metric_history;
    if history.has_rate() {
        let rows = nodes.iter().map(|node| traffic_row(node)).collect();
        out.push_section(
            ctx,
            "node_traffic",
            count_title(ctx, "section.node_traffic", nodes.len()),
            &TRAFFIC_COLUMNS,
            rows,
        );
    } else {
        out.lines.push(section_line(count_title(
            ctx,
            "section.node_traffic",
            nodes.len(),
        )));
        out.lines.push(insufficient_history(ctx, history));
        out.lines.push(Line::default());
    }

    let rows = services
        .iter()
        .map(|service| service_row(ctx, service))
        .collect();
    out.push_section(
        ctx,
        "services",
        count_title(ctx, "section.services", services.len()),
        &SERVICE_COLUMNS,
        rows,
    );
    out
}

fn insufficient_history(ctx: &RenderContext<'_>, history: &MetricHistory) -> Line<'static> {
    muted_line(ctx.tr.tf(
        "network.insufficient_history",
        &[
            ("samples", &history.samples.len().to_string()),
            ("required", &MetricHistory::MIN_SAMPLES_FOR_RATE.to_string()),
        ],
    ))
}

fn traffic_row(node: &NodeData) -> Line<'static> {
    let (rx, rx_tone) = metric_or_dash(node.network.rx_bytes_per_sec, format_rate);
    let (tx, tx_tone) = metric_or_dash(node.network.tx_bytes_per_sec, format_rate);
    row_line(
        vec![
            toned_cell(&node.name, TRAFFIC_COLUMNS[0].width, Tone::Plain),
            toned_cell(
                node.internal_ip.as_deref().unwrap_or("-"),
                TRAFFIC_COLUMNS[1].width,
                Tone::Muted,
            ),
            toned_cell(rx, TRAFFIC_COLUMNS[2].width, rx_tone),
            toned_cell(tx, TRAFFIC_COLUMNS[3].width, tx_tone),
        ],
        false,
    )
}

fn service_row(ctx: &RenderContext<'_>, service: &ServiceData) -> Line<'static> {
    let external = if service.external_ips.is_empty() {
        "<none>".to_string()
    } else {
        service.external_ips.join(",")
    };
    row_line(
        vec![
            toned_cell(&service.name, SERVICE_COLUMNS[0].width, Tone::Plain),
            toned_cell(&service.namespace, SERVICE_COLUMNS[1].width, Tone::Muted),
            toned_cell(&service.service_type, SERVICE_COLUMNS[2].width, Tone::Info),
            toned_cell(
                service.cluster_ip.as_deref().unwrap_or("None"),
                SERVICE_COLUMNS[3].width,
                Tone::Plain,
            ),
            toned_cell(external, SERVICE_COLUMNS[4].width, Tone::Plain),
            toned_cell(service_ports(service), SERVICE_COLUMNS[5].width, Tone::Plain),
            toned_cell(
                format_age(ctx.now, service.created),
                SERVICE_COLUMNS[6].width,
                Tone::Muted,
            ),
        ],
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::lines;
    use crate::model::{MetricSample, NetworkRate};
    use crate::views::fixtures::{context, english, now, plain, sample_snapshot};

    #[test]
    fn single_sample_shows_insufficient_history() {
        let mut snapshot = sample_snapshot();
        snapshot.metric_history.samples.push(MetricSample {
            timestamp: now(),
            rx_bytes: 10,
            tx_bytes: 10,
        });
        let tr = english();
        let text = plain(&lines(&context(&snapshot, &tr)).lines);
        assert_eq!(text[2], "Node Traffic (4)");
        assert_eq!(
            text[3].trim(),
            "Collecting throughput history (1/2 samples)"
        );
        assert!(text.iter().any(|line| line.contains("80:30080/TCP")));
    }

    #[test]
    fn rates_render_once_history_is_sufficient() {
        let mut snapshot = sample_snapshot();
        for _ in 0..2 {
            snapshot.metric_history.samples.push(MetricSample {
                timestamp: now(),
                rx_bytes: 0,
                tx_bytes: 0,
            });
        }
        snapshot.nodes[0].network = NetworkRate {
            rx_bytes_per_sec: 2_048,
            tx_bytes_per_sec: 0,
        };
        let tr = english();
        let text = plain(&lines(&context(&snapshot, &tr)).lines);
        let row = text
            .iter()
            .find(|line| line.starts_with("  cpu-1"))
            .expect("traffic row");
        let cells = row.split_whitespace().collect::<Vec<_>>();
        assert_eq!(cells, ["cpu-1", "-", "2Ki/s", "-"]);
    }
}
