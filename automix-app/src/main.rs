//! automix - terminal auto-DJ mixer
//!
//! Two decks mixed by an autonomous crossfade cycle, with a track browser,
//! mix analysis and a player bar.

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use automix_core::{demo_playlist, run_engine_thread, DeckId, MixerCommand, MixerEngine};
use automix_input::{Command, InputHandler, View};
use automix_library::{
    import_files, mock_catalog, uploaded_files, AnalysisProgress, AnalysisRunner, AnalysisSource,
    ColumnLayout, Config, Favorites, KeyValueStore, LibraryView,
};
use automix_tui::{
    AnalysisWidget, App, CrossfaderWidget, DeckWidget, HelpWidget, LibraryState, LibraryWidget,
    PlayerBarWidget, StatusBarWidget, Theme,
};

/// Frame rate for UI updates
const FPS: u64 = 30;

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load();
    let automation = config.automation_config();

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (cmd_tx, cmd_rx, evt_tx, evt_rx) = MixerEngine::create_channels();

    // Shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_engine = shutdown.clone();

    let thresholds = automation.thresholds;
    let engine_handle = thread::spawn(move || {
        run_engine_thread(cmd_rx, evt_tx, shutdown_engine, automation, demo_playlist());
    });

    let engine = MixerEngine::new(cmd_tx, evt_rx, shutdown.clone());

    let mut app = App::new();
    app.state.thresholds = thresholds;
    let result = run_app(&mut terminal, &mut app, &engine, &config);

    // Cleanup
    engine.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let _ = engine_handle.join();
    info!("automix stopped");

    result
}

/// Log to a file; the terminal belongs to the UI
///
/// Filter comes from `RUST_LOG`, defaulting to `info`.
fn init_logging() {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("automix");
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = File::create(log_dir.join("automix.log")) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

/// Open the on-disk store, falling back to memory so the UI still runs
fn open_store() -> anyhow::Result<(KeyValueStore, Option<String>)> {
    let path = KeyValueStore::default_path();
    match KeyValueStore::open(&path) {
        Ok(store) => Ok((store, None)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "store unavailable, using memory");
            let store = KeyValueStore::in_memory()?;
            Ok((store, Some(format!("Storage unavailable, changes won't persist: {}", e))))
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    engine: &MixerEngine,
    config: &Config,
) -> anyhow::Result<()> {
    let mut input_handler = InputHandler::new();
    let (store, store_warning) = open_store()?;

    if let Some(name) = config.theme.as_deref() {
        match Theme::by_name(name) {
            Some(theme) => app.state.theme = theme,
            None => warn!(theme = name, "unknown theme in config"),
        }
    }

    let layouts = LibraryView::ALL
        .iter()
        .map(|&view| ColumnLayout::load(&store, view))
        .collect();
    app.state.library = LibraryState::new(mock_catalog(), layouts, Favorites::load(&store));
    app.state.analysis.uploads = uploaded_files(&store);

    let mut analysis_rx: Option<Receiver<AnalysisProgress>> = None;

    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    match store_warning {
        Some(msg) => app.state.set_warning(msg),
        None => app.state.set_message(format!(
            "automix - {} tracks | Space pauses automation, Tab switches view, ? for help",
            app.state.library.tracks.len()
        )),
    }
    info!(tracks = app.state.library.tracks.len(), "automix started");

    loop {
        if engine.is_shutdown() || app.should_quit {
            break;
        }

        // Process engine events
        while let Ok(event) = engine.event_rx.try_recv() {
            app.state.handle_mixer_event(event);
        }

        // Process analysis progress
        let mut analysis_done = false;
        if let Some(ref rx) = analysis_rx {
            loop {
                match rx.try_recv() {
                    Ok(progress) => {
                        if let Some(summary) = app.state.analysis.handle_progress(progress) {
                            app.state.set_success(summary);
                            analysis_done = true;
                        }
                    }
                    Err(crossbeam_channel::TryRecvError::Empty) => break,
                    Err(crossbeam_channel::TryRecvError::Disconnected) => {
                        analysis_done = true;
                        break;
                    }
                }
            }
        }
        if analysis_done {
            analysis_rx = None;
            app.state.analysis.running = false;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame);
        app.state.tick(dt.as_secs_f64());

        terminal.draw(|frame| render_ui(frame, app))?;

        // Handle input
        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = input_handler.handle_key(key) {
                    handle_command(app, engine, &store, config, &mut analysis_rx, cmd);
                }
                app.state.set_mode(input_handler.mode());
                app.state.command_buffer = input_handler.command_buffer().to_string();
            }
        }

        // Maintain frame rate
        let elapsed = last_frame.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
        last_frame = now;
    }

    Ok(())
}

fn handle_command(
    app: &mut App,
    engine: &MixerEngine,
    store: &KeyValueStore,
    config: &Config,
    analysis_rx: &mut Option<Receiver<AnalysisProgress>>,
    cmd: Command,
) {
    match cmd {
        Command::Quit => app.quit(),

        // Automation
        Command::ToggleAutomation => {
            // Toast comes from the engine's PauseChanged reply
            engine.send(MixerCommand::TogglePause);
        }
        Command::ResetMix => {
            engine.send(MixerCommand::Reset);
            app.state.set_message("Mix reset");
        }
        Command::SetPeriod(ms) => {
            engine.send(MixerCommand::SetPeriod(ms));
            app.state
                .set_success(format!("Cycle period set to {:.1}s", ms as f64 / 1000.0));
        }

        // Library
        Command::SelectNext => app.state.library.select_next(),
        Command::SelectPrev => app.state.library.select_prev(),
        Command::SelectFirst => app.state.library.select_first(),
        Command::SelectLast => app.state.library.select_last(),
        Command::ToggleFavorite => {
            let title = app
                .state
                .library
                .selected_track()
                .map(|t| t.title.clone())
                .unwrap_or_default();
            if let Some((_, added)) = app.state.library.toggle_favorite() {
                if let Err(e) = app.state.library.favorites.save(store) {
                    error!(error = %e, "failed to save favorites");
                    app.state.set_error(format!("Could not save favorites: {}", e));
                } else if added {
                    app.state.set_success(format!("Added to favorites: {}", title));
                } else {
                    app.state.set_message(format!("Removed from favorites: {}", title));
                }
            }
        }
        Command::CycleLibraryView => {
            app.state.library.cycle_view();
            let label = app.state.library.view.label();
            app.state.set_message(format!("Library view: {}", label));
        }
        Command::FocusColumn(direction) => app.state.library.focus_column(direction),
        Command::ToggleColumn => {
            if app.state.library.toggle_column() {
                save_layout(app, store);
            } else {
                app.state.set_warning("At least one column must stay visible");
            }
        }
        Command::MoveColumn(direction) => {
            if app.state.library.move_column(direction) {
                save_layout(app, store);
            }
        }
        Command::ResetColumns => {
            app.state.library.reset_columns();
            save_layout(app, store);
            app.state.set_message("Columns reset");
        }
        Command::Upload(paths) => {
            let report = import_files(store, paths.as_slice());
            for err in &report.errors {
                warn!(error = %err, "upload skipped");
            }
            let summary = report.summary();
            if report.added.is_empty() {
                app.state.set_error(summary);
            } else if report.has_errors() {
                app.state.set_warning(summary);
            } else {
                app.state.set_success(summary);
            }
            app.state.analysis.uploads = uploaded_files(store);
        }

        // Analysis
        Command::Analyze(input) => match AnalysisSource::parse(&input) {
            Ok(AnalysisSource::Upload(id))
                if !app.state.analysis.uploads.iter().any(|u| u.id == id) =>
            {
                app.state.set_error(format!("Unknown upload: {}", id));
            }
            Ok(source) => {
                let step_delay = Duration::from_millis(config.analysis_step_ms);
                app.state.set_message(format!("Analyzing {}", source));
                let (rx, _handle) = AnalysisRunner::spawn(source, step_delay);
                *analysis_rx = Some(rx);
                app.state.analysis.running = true;
                app.state.view = View::Analysis;
            }
            Err(e) => app.state.set_error(format!("Cannot analyze: {}", e)),
        },

        // Player
        Command::PlaySelected => {
            if let Some(track) = app.state.library.selected_track().cloned() {
                app.state.play_track(&track);
            }
        }
        Command::PlayerToggle => app.state.player.toggle(),
        Command::PlayerSeek(delta) => app.state.player.seek_by(delta),
        Command::AdjustVolume(delta) => app.state.player.adjust_volume(delta),
        Command::ToggleMute => app.state.player.toggle_mute(),

        // UI
        Command::CycleView => app.state.cycle_view(),
        Command::ToggleHelp => app.state.toggle_help(),
        Command::HelpScrollUp => app.state.help_scroll_up(),
        Command::HelpScrollDown => app.state.help_scroll_down(),
        Command::SetTheme(name) => {
            app.state.set_theme(&name);
        }

        Command::EnterCommandMode | Command::EnterNormalMode => {}
        Command::Cancel => app.state.clear_message(),
        Command::ExecuteCommand(line) => {
            if !line.trim().is_empty() {
                app.state.set_error(format!("Unknown command: {}", line.trim()));
            }
        }
    }
}

/// Persist the current view's column layout
fn save_layout(app: &mut App, store: &KeyValueStore) {
    if let Err(e) = app.state.library.layout().save(store) {
        error!(error = %e, "failed to save column layout");
        app.state.set_error(format!("Could not save columns: {}", e));
    }
}

fn render_ui(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let theme = app.state.theme.clone();

    // Clear with background
    let block = ratatui::widgets::Block::default().style(theme.normal());
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Min(10),   // View content
        Constraint::Length(2), // Player bar
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], &theme, app.state.view);

    match app.state.view {
        View::Mixer => render_mixer(frame, chunks[1], app, &theme),
        View::Library => {
            let library = LibraryWidget::new(&mut app.state.library, &theme);
            frame.render_widget(library, chunks[1]);
        }
        View::Analysis => {
            let analysis = AnalysisWidget::new(&app.state.analysis, &theme);
            frame.render_widget(analysis, chunks[1]);
        }
    }

    frame.render_widget(PlayerBarWidget::new(&app.state.player, &theme), chunks[2]);

    let status = StatusBarWidget::new(app.state.mode, &app.state.command_buffer, &theme)
        .view(app.state.view)
        .message(app.state.message.as_deref(), app.state.message_type);
    frame.render_widget(status, chunks[3]);

    // Help overlay (scrollable)
    if app.state.show_help {
        let help_area = centered_rect(60, 30, area);
        let help = HelpWidget::new(&theme).scroll(app.state.help_scroll);
        frame.render_widget(help, help_area);
    }
}

fn render_mixer(frame: &mut ratatui::Frame, area: Rect, app: &App, theme: &Theme) {
    let mixer = &app.state.mixer;
    let [decks_area, fader_area] =
        Layout::vertical([Constraint::Min(8), Constraint::Length(5)]).areas(area);
    let [deck_a_area, deck_b_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(decks_area);

    frame.render_widget(DeckWidget::new(&mixer.deck_a, DeckId::A, theme), deck_a_area);
    frame.render_widget(DeckWidget::new(&mixer.deck_b, DeckId::B, theme), deck_b_area);

    let crossfader = CrossfaderWidget::new(mixer.crossfader, mixer.phase, theme)
        .cycle(mixer.cycle, app.state.thresholds)
        .pulse(app.state.pulse)
        .paused(mixer.paused);
    frame.render_widget(crossfader, fader_area);
}

fn render_title(frame: &mut ratatui::Frame, area: Rect, theme: &Theme, view: View) {
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let title_text = format!(" AUTOMIX - {} ", view.title());
    let width = area.width as usize;
    let title_len = title_text.chars().count();
    if width < title_len {
        frame.render_widget(Paragraph::new(Line::from(title_text)), area);
        return;
    }
    let padding = (width - title_len) / 2;
    let padded = format!(
        "{:═<pad$}{}{:═<rest$}",
        "",
        title_text,
        "",
        pad = padding,
        rest = width - padding - title_len
    );

    let line = Line::from(Span::styled(padded, theme.title()));
    frame.render_widget(Paragraph::new(line), area);
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
