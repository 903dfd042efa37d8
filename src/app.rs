use crate::format::plain_text;
use crate::i18n::{Locale, Translator};
use crate::input::Action;
use crate::model::{ClusterSnapshot, Screen, Thresholds, ViewKind};
use crate::owners::HeuristicResolver;
use crate::sections::clamp_selection;
use crate::views::{self, RenderContext, ViewOutput};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    None,
    ReloadSnapshot,
}

pub struct App {
    running: bool,
    screen: Screen,
    list_view: ViewKind,
    source: String,
    snapshot: Arc<ClusterSnapshot>,
    translator: Translator,
    thresholds: Thresholds,
    resolver: HeuristicResolver,
    selected: HashMap<ViewKind, usize>,
    list_scroll: usize,
    detail_scroll: usize,
    viewport: usize,
    status: String,
    show_help: bool,
    pending_g: bool,
}

impl App {
    pub fn new(
        source: String,
        locale: Locale,
        thresholds: Thresholds,
        start_view: ViewKind,
    ) -> Self {
        Self {
            running: true,
            screen: Screen::List(start_view),
            list_view: start_view,
            source,
            snapshot: Arc::new(ClusterSnapshot::default()),
            translator: Translator::new(locale),
            thresholds,
            resolver: HeuristicResolver,
            selected: HashMap::new(),
            list_scroll: 0,
            detail_scroll: 0,
            viewport: 1,
            status: String::new(),
            show_help: false,
            pending_g: false,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn list_view(&self) -> ViewKind {
        self.list_view
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn selected_index(&self) -> usize {
        self.selected
            .get(&self.list_view)
            .copied()
            .unwrap_or_default()
    }

    pub fn requested_offset(&self) -> usize {
        match self.screen {
            Screen::List(_) => self.list_scroll,
            Screen::Detail(_) => self.detail_scroll,
        }
    }

    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport = rows.max(1);
    }

    pub fn commit_scroll(&mut self, offset: usize) {
        match self.screen {
            Screen::List(_) => self.list_scroll = offset,
            Screen::Detail(_) => self.detail_scroll = offset,
        }
    }

    /// Swaps in a new snapshot between frames and re-clamps every remembered
    /// selection against it.
    pub fn set_snapshot(&mut self, snapshot: ClusterSnapshot) {
        self.snapshot = Arc::new(snapshot);
        for view in ViewKind::ALL.into_iter().filter(|view| view.selectable()) {
            let count = views::item_count(&self.snapshot, view);
            if let Some(selected) = self.selected.get_mut(&view) {
                *selected = clamp_selection(*selected, count).unwrap_or_default();
            }
        }
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.translator = Translator::new(locale);
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = normalize_status_text(status.into());
    }

    pub fn render_context(&self, now: DateTime<Utc>) -> RenderContext<'_> {
        RenderContext {
            snapshot: &self.snapshot,
            tr: &self.translator,
            now,
            thresholds: self.thresholds,
            resolver: &self.resolver,
        }
    }

    pub fn current_output(&self, now: DateTime<Utc>) -> ViewOutput {
        views::produce(&self.render_context(now), &self.screen, self.selected_index())
    }

    pub fn print_view(&self, view: ViewKind, now: DateTime<Utc>) -> String {
        let selected = self.selected.get(&view).copied().unwrap_or_default();
        let output = views::produce(&self.render_context(now), &Screen::List(view), selected);
        let mut text = output
            .lines
            .iter()
            .map(|line| plain_text(line).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        text
    }

    pub fn apply_action(&mut self, action: Action) -> AppCommand {
        if !matches!(action, Action::GPrefix) {
            self.pending_g = false;
        }

        if self.show_help && !matches!(action, Action::ToggleHelp | Action::Quit) {
            self.show_help = false;
            return AppCommand::None;
        }

        match action {
            Action::Quit => {
                self.running = false;
                AppCommand::None
            }
            Action::NextView => self.switch_view_by_offset(1),
            Action::PrevView => self.switch_view_by_offset(-1),
            Action::JumpView(slot) => {
                if let Some(view) = usize::from(slot)
                    .checked_sub(1)
                    .and_then(|index| ViewKind::ALL.get(index))
                {
                    self.show_list(*view);
                }
                AppCommand::None
            }
            Action::Down => {
                self.move_by(1);
                AppCommand::None
            }
            Action::Up => {
                self.move_by(-1);
                AppCommand::None
            }
            Action::PageDown => {
                self.move_by(self.page_step());
                AppCommand::None
            }
            Action::PageUp => {
                self.move_by(-self.page_step());
                AppCommand::None
            }
            Action::Top => {
                self.jump_to_edge(false);
                AppCommand::None
            }
            Action::Bottom => {
                self.jump_to_edge(true);
                AppCommand::None
            }
            Action::GPrefix => {
                if self.pending_g {
                    self.pending_g = false;
                    self.jump_to_edge(false);
                } else {
                    self.pending_g = true;
                }
                AppCommand::None
            }
            Action::Open => {
                self.open_selected();
                AppCommand::None
            }
            Action::Back => {
                if matches!(self.screen, Screen::Detail(_)) {
                    self.screen = Screen::List(self.list_view);
                }
                AppCommand::None
            }
            Action::Reload => AppCommand::ReloadSnapshot,
            Action::ToggleLocale => {
                let locale = self.translator.locale().toggled();
                self.translator = Translator::new(locale);
                self.status = self
                    .translator
                    .tf("status.locale", &[("locale", &locale.to_string())]);
                AppCommand::None
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                AppCommand::None
            }
        }
    }

    fn show_list(&mut self, view: ViewKind) {
        self.list_view = view;
        self.screen = Screen::List(view);
    }

    fn switch_view_by_offset(&mut self, delta: isize) -> AppCommand {
        let len = ViewKind::ALL.len() as isize;
        let current = self.list_view.index() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.show_list(ViewKind::ALL[next]);
        AppCommand::None
    }

    fn page_step(&self) -> isize {
        self.viewport.saturating_sub(1).max(1) as isize
    }

    fn move_by(&mut self, delta: isize) {
        match self.screen {
            Screen::List(view) if view.selectable() => {
                let count = views::item_count(&self.snapshot, view);
                let Some(last) = count.checked_sub(1) else {
                    return;
                };
                let current = self.selected.get(&view).copied().unwrap_or_default();
                let next = current.saturating_add_signed(delta).min(last);
                self.selected.insert(view, next);
            }
            Screen::List(_) => {
                self.list_scroll = self.list_scroll.saturating_add_signed(delta);
            }
            Screen::Detail(_) => {
                self.detail_scroll = self.detail_scroll.saturating_add_signed(delta);
            }
        }
    }

    fn jump_to_edge(&mut self, bottom: bool) {
        match self.screen {
            Screen::List(view) if view.selectable() => {
                let count = views::item_count(&self.snapshot, view);
                let index = if bottom { count.saturating_sub(1) } else { 0 };
                self.selected.insert(view, index);
            }
            // Oversized offsets are clamped by the scroll window on the next frame.
            _ => self.commit_scroll(if bottom { usize::MAX } else { 0 }),
        }
    }

    fn open_selected(&mut self) {
        let Screen::List(view) = self.screen else {
            return;
        };
        match views::selection_target(&self.snapshot, view, self.selected_index()) {
            Some(target) => {
                self.status = format!("{} {}", target.kind_label(), target.display_name());
                self.detail_scroll = 0;
                self.screen = Screen::Detail(target);
            }
            None => self.status = self.translator.t("status.no_selection"),
        }
    }
}

fn normalize_status_text(status: String) -> String {
    const MAX_STATUS_LEN: usize = 180;
    let status = status.lines().next().unwrap_or_default().to_string();
    if status.chars().count() <= MAX_STATUS_LEN {
        return status;
    }

    let mut shortened = status
        .chars()
        .take(MAX_STATUS_LEN.saturating_sub(1))
        .collect::<String>();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use super::{App, AppCommand, normalize_status_text};
    use crate::i18n::Locale;
    use crate::input::Action;
    use crate::model::{DetailTarget, EntityKey, Screen, Thresholds, ViewKind};
    use crate::views::fixtures::{now, sample_snapshot};

    fn app_on(view: ViewKind) -> App {
        let mut app = App::new(
            "cluster.yaml".to_string(),
            Locale::En,
            Thresholds::default(),
            view,
        );
        app.set_snapshot(sample_snapshot());
        app.set_viewport(10);
        app
    }

    #[test]
    fn view_switching_wraps_around() {
        let mut app = app_on(ViewKind::Overview);
        app.apply_action(Action::PrevView);
        assert_eq!(app.list_view(), ViewKind::Network);
        app.apply_action(Action::NextView);
        assert_eq!(app.screen(), &Screen::List(ViewKind::Overview));

        app.apply_action(Action::JumpView(4));
        assert_eq!(app.list_view(), ViewKind::Volcano);
        app.apply_action(Action::JumpView(9));
        assert_eq!(app.list_view(), ViewKind::Volcano);
    }

    #[test]
    fn selection_stays_within_item_count() {
        let mut app = app_on(ViewKind::Nodes);
        for _ in 0..10 {
            app.apply_action(Action::Down);
        }
        assert_eq!(app.selected_index(), 3);
        app.apply_action(Action::PageUp);
        assert_eq!(app.selected_index(), 0);
        app.apply_action(Action::Bottom);
        assert_eq!(app.selected_index(), 3);
        app.apply_action(Action::GPrefix);
        app.apply_action(Action::GPrefix);
        assert_eq!(app.selected_index(), 0);
    }

    #[test]
    fn enter_opens_detail_and_escape_returns() {
        let mut app = app_on(ViewKind::Workloads);
        app.apply_action(Action::Open);
        assert_eq!(
            app.screen(),
            &Screen::Detail(DetailTarget::Job(EntityKey::new("ml", "train-1234")))
        );
        app.apply_action(Action::Back);
        assert_eq!(app.screen(), &Screen::List(ViewKind::Workloads));
    }

    #[test]
    fn open_in_non_selectable_view_reports_nothing_selected() {
        let mut app = app_on(ViewKind::Storage);
        app.apply_action(Action::Open);
        assert_eq!(app.screen(), &Screen::List(ViewKind::Storage));
        assert_eq!(app.status(), "Nothing selected");
    }

    #[test]
    fn new_snapshot_reclamps_remembered_selection() {
        let mut app = app_on(ViewKind::Nodes);
        app.apply_action(Action::Bottom);
        let mut smaller = sample_snapshot();
        smaller.nodes.truncate(2);
        app.set_snapshot(smaller);
        assert_eq!(app.selected_index(), 1);
    }

    #[test]
    fn non_selectable_views_scroll_instead() {
        let mut app = app_on(ViewKind::Overview);
        app.apply_action(Action::Down);
        app.apply_action(Action::Down);
        assert_eq!(app.requested_offset(), 2);
        app.apply_action(Action::Bottom);
        assert_eq!(app.requested_offset(), usize::MAX);
        app.commit_scroll(7);
        app.apply_action(Action::Up);
        assert_eq!(app.requested_offset(), 6);
    }

    #[test]
    fn detail_scroll_resets_on_open() {
        let mut app = app_on(ViewKind::Nodes);
        app.apply_action(Action::Open);
        app.apply_action(Action::PageDown);
        assert_eq!(app.requested_offset(), 9);
        app.apply_action(Action::Back);
        app.apply_action(Action::Open);
        assert_eq!(app.requested_offset(), 0);
    }

    #[test]
    fn help_swallows_the_next_key() {
        let mut app = app_on(ViewKind::Nodes);
        app.apply_action(Action::ToggleHelp);
        assert!(app.show_help());
        app.apply_action(Action::Down);
        assert!(!app.show_help());
        assert_eq!(app.selected_index(), 0);
    }

    #[test]
    fn reload_and_locale_toggle() {
        let mut app = app_on(ViewKind::Nodes);
        assert_eq!(app.apply_action(Action::Reload), AppCommand::ReloadSnapshot);
        app.apply_action(Action::ToggleLocale);
        assert_eq!(app.translator().locale(), Locale::Zh);
        app.apply_action(Action::Quit);
        assert!(!app.running());
    }

    #[test]
    fn print_view_is_plain_text() {
        let app = app_on(ViewKind::Overview);
        let text = app.print_view(ViewKind::Storage, now());
        assert!(text.starts_with("Storage\n"));
        assert!(text.contains("pv-data"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn status_is_single_line_and_bounded() {
        assert_eq!(normalize_status_text("a\nb".to_string()), "a");
        assert_eq!(normalize_status_text("x".repeat(300)).chars().count(), 180);
    }
}
