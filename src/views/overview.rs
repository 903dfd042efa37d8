use ratatui::text::{Line, Span};

use super::{POD_COLUMNS, RenderContext, ViewOutput, count_title, pod_row};
use crate::format::{format_bytes, format_millicores, meter, percent_of};
use crate::i18n::Translator;
use crate::model::{PodData, PodPhase, ViewKind};
use crate::theme::{self, Tone, percent_tone};

const METER_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MetricsHint {
    Permission,
    Tls,
    Unknown,
}

impl MetricsHint {
    pub fn classify(error: &str) -> Self {
        let lowered = error.to_ascii_lowercase();
        if contains_any(&lowered, &["forbidden", "rbac", "permission", "unauthorized"]) {
            Self::Permission
        } else if contains_any(&lowered, &["x509", "certificate", "tls"]) {
            Self::Tls
        } else {
            Self::Unknown
        }
    }

    pub fn message(self, tr: &Translator, error: &str) -> String {
        match self {
            Self::Permission => tr.t("hint.metrics_permission"),
            Self::Tls => tr.t("hint.metrics_tls"),
            Self::Unknown => tr.tf("hint.metrics_unknown", &[("error", error)]),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

pub(super) fn lines(ctx: &RenderContext<'_>) -> ViewOutput {
    let title = ctx.tr.t(ViewKind::Overview.title_key());
    if ctx.snapshot.is_empty() {
        return ViewOutput::no_data(ctx, title);
    }

    let summary = &ctx.snapshot.summary;
    let mut out = ViewOutput::titled(title);
    out.lines.push(Line::default());

    let nodes_tone = if summary.nodes_ready < summary.nodes_total {
        Tone::Warn
    } else {
        Tone::Good
    };
    out.lines.push(text_line(
        ctx.tr.tf(
            "overview.nodes",
            &[
                ("ready", &summary.nodes_ready.to_string()),
                ("total", &summary.nodes_total.to_string()),
            ],
        ),
        nodes_tone,
    ));
    out.lines.push(text_line(
        ctx.tr.tf(
            "overview.pods",
            &[
                ("total", &summary.pods_total.to_string()),
                ("running", &summary.pods_running.to_string()),
                ("pending", &summary.pods_pending.to_string()),
                ("failed", &summary.pods_failed.to_string()),
                ("succeeded", &summary.pods_succeeded.to_string()),
            ],
        ),
        if summary.pods_failed > 0 {
            Tone::Bad
        } else {
            Tone::Plain
        },
    ));
    out.lines.push(usage_line(
        ctx,
        &ctx.tr.t("overview.cpu"),
        summary.cpu_usage_millicores,
        summary.cpu_capacity_millicores,
        format_millicores,
    ));
    out.lines.push(usage_line(
        ctx,
        &ctx.tr.t("overview.memory"),
        summary.memory_usage_bytes,
        summary.memory_capacity_bytes,
        format_bytes,
    ));
    if summary.npu_total > 0 {
        out.lines.push(usage_line(
            ctx,
            &ctx.tr.t("overview.npu"),
            u64::from(summary.npu_allocated),
            u64::from(summary.npu_total),
            |value| value.to_string(),
        ));
    }
    let alert_tone = if summary.criticals > 0 {
        Tone::Bad
    } else if summary.warnings > 0 {
        Tone::Warn
    } else {
        Tone::Good
    };
    out.lines.push(text_line(
        ctx.tr.tf(
            "overview.alerts",
            &[
                ("critical", &summary.criticals.to_string()),
                ("warning", &summary.warnings.to_string()),
            ],
        ),
        alert_tone,
    ));
    if let Some(error) = summary.metrics_error.as_deref() {
        let hint = MetricsHint::classify(error).message(ctx.tr, error);
        out.lines.push(Line::from(Span::styled(
            format!("  {hint}"),
            Tone::Warn.style(),
        )));
    }
    out.lines.push(Line::default());

    let problems = problem_pods(ctx);
    let rows = problems.iter().map(|pod| pod_row(ctx, pod)).collect();
    out.push_section(
        ctx,
        "problem_pods",
        count_title(ctx, "section.problem_pods", problems.len()),
        &POD_COLUMNS,
        rows,
    );
    out
}

fn text_line(text: String, tone: Tone) -> Line<'static> {
    Line::from(Span::styled(format!("  {text}"), tone.style()))
}

fn usage_line(
    ctx: &RenderContext<'_>,
    label: &str,
    used: u64,
    capacity: u64,
    render: impl Fn(u64) -> String,
) -> Line<'static> {
    let label = Span::styled(
        format!("  {:<width$} ", label, width = LABEL_WIDTH),
        theme::label_style(),
    );
    match percent_of(used, capacity) {
        Some(percent) if used > 0 => Line::from(vec![
            label,
            Span::styled(
                meter(percent, METER_WIDTH),
                percent_tone(percent, &ctx.thresholds).style(),
            ),
            Span::raw(format!(
                " {} / {} ({percent}%)",
                render(used),
                render(capacity)
            )),
        ]),
        _ => Line::from(vec![
            label,
            Span::styled("-", Tone::Muted.style()),
            Span::raw(if capacity > 0 {
                format!(" / {}", render(capacity))
            } else {
                String::new()
            }),
        ]),
    }
}

fn problem_pods<'a>(ctx: &RenderContext<'a>) -> Vec<&'a PodData> {
    let mut pods = ctx
        .snapshot
        .pods
        .iter()
        .filter(|pod| {
            !matches!(pod.phase, PodPhase::Running | PodPhase::Succeeded)
                || pod.restarts >= ctx.thresholds.restart_warning
                || (pod.phase == PodPhase::Running && pod.reason.is_some())
        })
        .collect::<Vec<_>>();
    pods.sort_by(|a, b| {
        a.phase
            .severity_rank()
            .cmp(&b.phase.severity_rank())
            .then_with(|| b.restarts.cmp(&a.restarts))
            .then_with(|| a.namespace.cmp(&b.namespace))
            .then_with(|| a.name.cmp(&b.name))
    });
    pods
}
