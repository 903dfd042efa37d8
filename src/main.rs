mod app;
mod cli;
mod config;
mod format;
mod i18n;
mod input;
mod k8s;
mod model;
mod owners;
mod scroll;
mod sections;
mod snapshot;
mod theme;
mod ui;
mod views;

use anyhow::{Context, Result, anyhow};
use app::{App, AppCommand};
use chrono::Utc;
use clap::Parser;
use cli::CliArgs;
use config::{LiveSettings, RuntimeConfigWatcher, Settings};
use crossterm::event::{
    Event, EventStream, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use futures::StreamExt;
use model::ViewKind;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use snapshot::SnapshotSource;
use std::fs::OpenOptions;
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_filter, args.log_file.as_deref())?;

    let mut config_watcher = RuntimeConfigWatcher::discover();
    let config = config_watcher.load_current()?;
    let settings = Settings::resolve(&args, &config)?;
    debug!(?settings, config = ?config.source, "resolved settings");

    let mut source = SnapshotSource::new(&settings.snapshot);
    let snapshot = source.load()?;
    let mut app = App::new(
        source.label(),
        settings.locale,
        settings.thresholds,
        settings.start_view,
    );
    app.set_snapshot(snapshot);

    if let Some(token) = args.print.as_deref() {
        let view = ViewKind::from_token(token).ok_or_else(|| anyhow!("unknown view {token:?}"))?;
        let text = app.print_view(view, Utc::now());
        io::stdout()
            .write_all(text.as_bytes())
            .context("failed to write view to stdout")?;
        return Ok(());
    }

    let loaded = app
        .translator()
        .tf("status.loaded", &[("source", &source.label())]);
    app.set_status(loaded);
    run(&args, &mut app, &mut source, &mut config_watcher, settings.refresh_ms).await
}

fn init_tracing(level_filter: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    // The alternate screen owns stdout, so logs go to a file or nowhere.
    let _ = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::sink).try_init(),
    };

    Ok(())
}

async fn run(
    args: &CliArgs,
    app: &mut App,
    source: &mut SnapshotSource,
    config_watcher: &mut RuntimeConfigWatcher,
    refresh_ms: u64,
) -> Result<()> {
    let (mut terminal, keyboard_enhanced) = init_terminal()?;
    let run_result = run_loop(&mut terminal, args, app, source, config_watcher, refresh_ms).await;
    let restore_result = restore_terminal(&mut terminal, keyboard_enhanced);

    match (run_result, restore_result) {
        (Err(run_error), Err(restore_error)) => Err(anyhow!(
            "{run_error:#}\nterminal restore error: {restore_error:#}"
        )),
        (Err(error), _) => Err(error),
        (_, Err(error)) => Err(error),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn init_terminal() -> Result<(TuiTerminal, bool)> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if keyboard_enhanced {
        execute!(
            stdout,
            EnterAlternateScreen,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .context("failed to enter alternate screen with keyboard enhancement")?;
    } else {
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().context("failed to clear terminal")?;
    Ok((terminal, keyboard_enhanced))
}

fn restore_terminal(terminal: &mut TuiTerminal, keyboard_enhanced: bool) -> Result<()> {
    if keyboard_enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("failed to pop keyboard enhancement flags")?;
    }
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

fn draw(terminal: &mut TuiTerminal, app: &mut App) -> Result<()> {
    let now = Utc::now();
    let mut outcome = None;
    terminal
        .draw(|frame| outcome = Some(ui::render(frame, app, now)))
        .context("failed to render terminal frame")?;
    if let Some(outcome) = outcome {
        app.set_viewport(outcome.viewport);
        app.commit_scroll(outcome.offset);
    }
    Ok(())
}

async fn run_loop(
    terminal: &mut TuiTerminal,
    args: &CliArgs,
    app: &mut App,
    source: &mut SnapshotSource,
    config_watcher: &mut RuntimeConfigWatcher,
    refresh_ms: u64,
) -> Result<()> {
    let mut reader = EventStream::new();
    let mut ticker = interval(Duration::from_millis(refresh_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        draw(terminal, app)?;

        if !app.running() {
            break;
        }

        tokio::select! {
            maybe_event = reader.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = input::map_key(key) {
                            debug!("action={action:?}");
                            if app.apply_action(action) == AppCommand::ReloadSnapshot {
                                refresh_snapshot(app, source, true);
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        app.set_status(format!("terminal event error: {error}"));
                    }
                    None => {
                        app.set_status("terminal event stream closed");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                refresh_snapshot(app, source, false);
                refresh_config(args, app, config_watcher);
            }
        }
    }

    Ok(())
}

/// Re-reads the snapshot (always when `forced`, otherwise only on mtime
/// change). A failed read keeps the previous snapshot on screen.
fn refresh_snapshot(app: &mut App, source: &mut SnapshotSource, forced: bool) {
    let result = if forced {
        source.load().map(Some)
    } else {
        source.reload_if_changed()
    };
    match result {
        Ok(Some(snapshot)) => {
            info!(path = %source.path().display(), forced, "snapshot reloaded");
            app.set_snapshot(snapshot);
            let status = app
                .translator()
                .tf("status.reloaded", &[("source", &source.label())]);
            app.set_status(status);
        }
        Ok(None) => {}
        Err(error) => {
            warn!(error = %compact_error(&error), "snapshot reload failed");
            let status = app
                .translator()
                .tf("status.reload_failed", &[("error", &compact_error(&error))]);
            app.set_status(status);
        }
    }
}

fn refresh_config(args: &CliArgs, app: &mut App, config_watcher: &mut RuntimeConfigWatcher) {
    match config_watcher.reload_if_changed() {
        Ok(Some(config)) => {
            info!(source = ?config.source, "runtime config reloaded");
            let live = LiveSettings::resolve(args, &config);
            app.set_thresholds(live.thresholds);
            if let Some(locale) = live.locale {
                app.set_locale(locale);
            }
            let source = config.source.unwrap_or_else(|| "defaults".to_string());
            let status = app
                .translator()
                .tf("status.config_reloaded", &[("source", &source)]);
            app.set_status(status);
        }
        Ok(None) => {}
        Err(error) => {
            warn!(error = %compact_error(&error), "runtime config reload failed");
            let status = app
                .translator()
                .tf("status.config_failed", &[("error", &compact_error(&error))]);
            app.set_status(status);
        }
    }
}

fn compact_error(error: &anyhow::Error) -> String {
    error
        .chain()
        .take(3)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}
