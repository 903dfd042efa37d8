use chrono::{DateTime, Utc};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::i18n::Translator;
use crate::theme::{self, Tone};

pub const ELLIPSIS: &str = "...";
const CELL_GAP: &str = " ";
const GUTTER: &str = "  ";
const SELECTED_GUTTER: &str = "> ";

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Terminal cells taken by unstyled text; CJK glyphs count as two.
pub fn visible_width(value: &str) -> usize {
    value.chars().map(char_width).sum()
}

fn take_width(value: &str, budget: usize) -> String {
    let mut used = 0;
    value
        .chars()
        .take_while(|c| {
            used += char_width(*c);
            used <= budget
        })
        .collect()
}

pub fn truncate(value: &str, width: usize) -> String {
    if visible_width(value) <= width {
        return value.to_string();
    }

    if width <= ELLIPSIS.len() {
        return take_width(value, width);
    }

    let mut out = take_width(value, width - ELLIPSIS.len());
    out.push_str(ELLIPSIS);
    out
}

pub fn pad(value: &str, width: usize) -> String {
    let len = visible_width(value);
    let mut out = value.to_string();
    if len < width {
        out.extend(std::iter::repeat_n(' ', width - len));
    }
    out
}

pub fn fit(value: &str, width: usize) -> String {
    pad(&truncate(value, width), width)
}

pub fn cell(value: impl AsRef<str>, width: usize, style: Style) -> Span<'static> {
    Span::styled(fit(value.as_ref(), width), style)
}

pub fn toned_cell(value: impl AsRef<str>, width: usize, tone: Tone) -> Span<'static> {
    cell(value, width, tone.style())
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Column {
    pub key: &'static str,
    pub width: usize,
}

impl Column {
    pub const fn new(key: &'static str, width: usize) -> Self {
        Self { key, width }
    }
}

pub fn header_line(tr: &Translator, columns: &[Column]) -> Line<'static> {
    let cells = columns
        .iter()
        .map(|column| cell(tr.t(column.key), column.width, theme::header_style()))
        .collect::<Vec<_>>();
    row_line(cells, false)
}

pub fn row_line(cells: Vec<Span<'static>>, selected: bool) -> Line<'static> {
    let gutter = if selected { SELECTED_GUTTER } else { GUTTER };
    let mut spans = Vec::with_capacity(cells.len() * 2 + 1);
    spans.push(Span::styled(gutter, theme::Tone::Info.style()));
    for (index, cell) in cells.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(CELL_GAP));
        }
        spans.push(cell);
    }
    let line = Line::from(spans);
    if selected {
        line.patch_style(theme::selected_style())
    } else {
        line
    }
}

pub fn plain_text(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

pub fn title_line(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), theme::title_style()))
}

pub fn section_line(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), theme::section_style()))
}

pub fn muted_line(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(format!("  {}", text.into()), Tone::Muted.style()))
}

pub fn field_line(label: &str, value: impl Into<String>, tone: Tone) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}", fit(label, 14)), theme::label_style()),
        Span::raw(" "),
        Span::styled(value.into(), tone.style()),
    ])
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(&str, u64); 6] = [
        ("Ei", 1_152_921_504_606_846_976),
        ("Pi", 1_125_899_906_842_624),
        ("Ti", 1_099_511_627_776),
        ("Gi", 1_073_741_824),
        ("Mi", 1_048_576),
        ("Ki", 1_024),
    ];

    if bytes == 0 {
        return "0B".to_string();
    }

    for (suffix, unit) in UNITS {
        if bytes >= unit {
            let whole = bytes / unit;
            let decimal = ((bytes % unit) * 10) / unit;
            if decimal == 0 {
                return format!("{whole}{suffix}");
            }
            return format!("{whole}.{decimal}{suffix}");
        }
    }

    format!("{bytes}B")
}

pub fn format_millicores(value: u64) -> String {
    if value >= 1000 {
        let whole = value / 1000;
        let decimal = (value % 1000) / 100;
        if decimal == 0 {
            format!("{whole}c")
        } else {
            format!("{whole}.{decimal}c")
        }
    } else {
        format!("{value}m")
    }
}

pub fn format_rate(bytes_per_sec: u64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec))
}

pub fn percent_of(used: u64, capacity: u64) -> Option<u64> {
    if capacity == 0 {
        return None;
    }
    Some(used.saturating_mul(100) / capacity)
}

pub fn ratio(current: u32, desired: u32) -> String {
    format!("{current}/{desired}")
}

pub fn yes_no(tr: &Translator, value: bool) -> String {
    if value {
        tr.t("common.yes")
    } else {
        tr.t("common.no")
    }
}

pub fn metric_or_dash(value: u64, render: impl FnOnce(u64) -> String) -> (String, Tone) {
    if value == 0 {
        ("-".to_string(), Tone::Muted)
    } else {
        (render(value), Tone::Plain)
    }
}

pub fn percent_cell(
    used: u64,
    capacity: u64,
    thresholds: &crate::model::Thresholds,
) -> (String, Tone) {
    match percent_of(used, capacity) {
        Some(percent) if used > 0 => (
            format!("{percent}%"),
            theme::percent_tone(percent, thresholds),
        ),
        _ => ("-".to_string(), Tone::Muted),
    }
}

/// Age relative to `now`. This is the only clock-dependent formatting call.
pub fn format_age(now: DateTime<Utc>, timestamp: Option<DateTime<Utc>>) -> String {
    let Some(timestamp) = timestamp else {
        return "-".to_string();
    };
    let elapsed = now.signed_duration_since(timestamp).num_seconds().max(0);
    format_elapsed_seconds(elapsed)
}

pub fn format_elapsed_seconds(seconds: i64) -> String {
    if seconds >= 86_400 {
        return format!("{}d", seconds / 86_400);
    }

    if seconds >= 3_600 {
        return format!("{}h", seconds / 3_600);
    }

    if seconds >= 60 {
        return format!("{}m", seconds / 60);
    }

    format!("{seconds}s")
}

pub fn meter(percent: u64, width: usize) -> String {
    let percent = percent.min(100) as usize;
    let mut filled = width.saturating_mul(percent) / 100;
    if percent > 0 && filled == 0 {
        filled = 1;
    }
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}
