use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::model::{Screen, ViewKind};
use crate::scroll::{ScrollWindow, viewport_height};
use crate::views::ViewOutput;
use crate::theme::{ACCENT, BG, MUTED, PANEL, PL_A, PL_B, PL_C, PL_D, WARN};

pub const RESERVED_CHROME: usize = 4;

/// What the frame used, for the app to persist once drawing is done.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FrameOutcome {
    pub viewport: usize,
    pub offset: usize,
}

pub fn render(frame: &mut Frame, app: &App, now: DateTime<Utc>) -> FrameOutcome {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, root[0], app);
    let outcome = render_body(frame, root[1], app, now);
    render_footer(frame, root[2], app);

    if app.show_help() {
        render_help_modal(frame, app);
    }
    outcome
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let left_line = build_left_header_line(app);
    let right_line = build_right_header_line(app);
    let right_width = spans_width(&right_line.spans) as u16;
    if area.width < 42 || right_width == 0 || right_width >= area.width {
        frame.render_widget(
            Paragraph::new(left_line).style(Style::default().bg(BG).fg(Color::White)),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(right_width)])
        .split(area);
    frame.render_widget(
        Paragraph::new(left_line).style(Style::default().bg(BG).fg(Color::White)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(right_line).style(Style::default().bg(BG)),
        chunks[1],
    );
}

fn build_left_header_line(app: &App) -> Line<'static> {
    let tr = app.translator();
    let mut spans = Vec::new();
    push_powerline_segment(
        &mut spans,
        format!(" {} ", tr.t("app.title")),
        Color::White,
        PL_A,
        PL_B,
    );
    push_powerline_segment(
        &mut spans,
        format!(" {} ", compact_text(app.source(), 32)),
        Color::White,
        PL_B,
        PL_C,
    );
    let location = match app.screen() {
        Screen::List(view) => tr.t(view.title_key()),
        Screen::Detail(target) => format!(
            "{} › {}",
            tr.t(app.list_view().title_key()),
            target.kind_label()
        ),
    };
    push_powerline_segment(
        &mut spans,
        format!(" {} ", location),
        Color::White,
        PL_C,
        PL_D,
    );
    push_powerline_segment(
        &mut spans,
        format!(" {} ", tr.locale()),
        Color::White,
        PL_D,
        BG,
    );
    Line::from(spans)
}

fn build_right_header_line(app: &App) -> Line<'static> {
    let mut spans = Vec::new();
    let mut next_bg = BG;
    for view in ViewKind::ALL {
        let active = view == app.list_view();
        let bg = if active {
            Color::Rgb(59, 130, 246)
        } else {
            Color::Rgb(30, 41, 59)
        };
        let fg = if active { Color::Black } else { Color::White };
        push_powerline_segment_rtl(
            &mut spans,
            view_slot_label(view.index() + 1, active),
            fg,
            bg,
            next_bg,
        );
        next_bg = bg;
    }
    spans.push(Span::styled(" ", Style::default().bg(next_bg)));
    Line::from(spans)
}

fn render_body(frame: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) -> FrameOutcome {
    let viewport = viewport_height(
        usize::from(frame.area().height),
        RESERVED_CHROME,
    );
    let output = app.current_output(now);
    let target = match app.screen() {
        Screen::List(_) => output.target_line(),
        Screen::Detail(_) => None,
    };
    let view = ScrollWindow::new(app.translator()).apply(
        &output.lines,
        viewport,
        app.requested_offset(),
        target,
    );
    let offset = view.offset;

    let title = body_title(app, &output, target);
    let mut block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .style(Style::default().bg(PANEL));
    if let Some(trailer) = view.trailer {
        block = block.title_bottom(trailer.right_aligned());
    }
    frame.render_widget(
        Paragraph::new(view.visible)
            .block(block)
            .style(Style::default().fg(Color::White)),
        area,
    );

    FrameOutcome { viewport, offset }
}

fn body_title(app: &App, output: &ViewOutput, target_line: Option<usize>) -> String {
    let tr = app.translator();
    let kind = match app.screen() {
        Screen::Detail(target) => return target.display_name(),
        Screen::List(kind) => *kind,
    };
    let title = tr.t(kind.title_key());
    let located = target_line.zip(output.selected).and_then(|(line, selected)| {
        let index = output.sections.section_at_line(line)?;
        let section = output.sections.sections().get(index)?;
        let section_title = tr.tf(
            &format!("section.{}", section.name),
            &[("count", &section.item_count.to_string())],
        );
        Some(format!(
            "{title} · {section_title} · {}/{}",
            selected + 1,
            output.sections.total_items()
        ))
    });
    located.unwrap_or(title)
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let tr = app.translator();
    let mut spans = Vec::new();
    let status = app.status();
    let status_bg = if status.is_empty() { PL_A } else { PL_B };
    push_powerline_segment(
        &mut spans,
        format!(" {} ", compact_text(status, usize::from(area.width / 2).max(24))),
        Color::White,
        status_bg,
        BG,
    );
    spans.push(Span::styled(
        format!(" {}", tr.t("footer.hints")),
        Style::default().fg(MUTED).bg(BG),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(BG)),
        area,
    );
}

fn push_powerline_segment(
    spans: &mut Vec<Span<'static>>,
    content: impl Into<String>,
    fg: Color,
    bg: Color,
    next_bg: Color,
) {
    spans.push(Span::styled(
        content.into(),
        Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled("", Style::default().fg(bg).bg(next_bg)));
}

fn push_powerline_segment_rtl(
    spans: &mut Vec<Span<'static>>,
    content: impl Into<String>,
    fg: Color,
    bg: Color,
    next_bg: Color,
) {
    spans.push(Span::styled("", Style::default().fg(bg).bg(next_bg)));
    spans.push(Span::styled(
        content.into(),
        Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
    ));
}

fn view_slot_label(slot: usize, active: bool) -> String {
    if active {
        format!(" ◉{slot} ")
    } else {
        format!(" {slot} ")
    }
}

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|span| span.content.chars().count()).sum()
}

fn render_help_modal(frame: &mut Frame, app: &App) {
    let tr = app.translator();
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            tr.t("app.title"),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (index, view) in ViewKind::ALL.iter().enumerate() {
        lines.push(Line::from(format!("  {}  {}", index + 1, tr.t(view.title_key()))));
    }
    lines.push(Line::from(""));
    for key in ["help.views", "help.move", "help.open", "help.misc"] {
        lines.push(Line::from(tr.t(key)));
    }

    let modal = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(tr.t("help.title"))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(WARN))
                .style(Style::default().bg(PANEL)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(modal, area);
}

fn compact_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out = value
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{FrameOutcome, compact_text, render};
    use crate::app::App;
    use crate::i18n::Locale;
    use crate::input::Action;
    use crate::model::{Thresholds, ViewKind};
    use crate::views::fixtures::{now, sample_snapshot};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, width: u16, height: u16) -> (FrameOutcome, String) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
        let mut outcome = None;
        terminal
            .draw(|frame| outcome = Some(render(frame, app, now())))
            .expect("draw");
        let buffer = terminal.backend().buffer().clone();
        let text = buffer
            .content()
            .chunks(usize::from(width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        (outcome.expect("render ran"), text)
    }

    #[test]
    fn body_viewport_leaves_room_for_chrome() {
        let mut app = App::new(
            "cluster.yaml".to_string(),
            Locale::En,
            Thresholds::default(),
            ViewKind::Workloads,
        );
        app.set_snapshot(sample_snapshot());
        let (outcome, text) = draw(&app, 120, 12);
        assert_eq!(outcome.viewport, 8);
        assert_eq!(outcome.offset, 0);
        assert!(text.contains("Workloads"));
        assert!(text.contains("[Lines 1-8 of"));
    }

    #[test]
    fn selection_below_the_fold_scrolls_into_view() {
        let mut app = App::new(
            "cluster.yaml".to_string(),
            Locale::En,
            Thresholds::default(),
            ViewKind::Workloads,
        );
        app.set_snapshot(sample_snapshot());
        app.apply_action(Action::Bottom);
        let (outcome, text) = draw(&app, 120, 12);
        assert!(outcome.offset > 0);
        assert!(text.contains("> backup"));
        assert!(text.contains("Workloads · CronJobs (1) · 8/8"));
    }

    #[test]
    fn help_modal_lists_views() {
        let mut app = App::new(
            "cluster.yaml".to_string(),
            Locale::En,
            Thresholds::default(),
            ViewKind::Overview,
        );
        app.apply_action(Action::ToggleHelp);
        let (_, text) = draw(&app, 100, 30);
        assert!(text.contains("NPU Topology"));
        assert!(text.contains("Enter opens the selected row"));
    }

    #[test]
    fn compacts_long_text() {
        assert_eq!(compact_text("abcdef", 4), "abc…");
        assert_eq!(compact_text("abc", 4), "abc");
    }
}
