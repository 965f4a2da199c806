//! src/main.rs
//! ============================================================================
//! # Demo browser hosting the file list widget
//!
//! Owns the terminal and the input loop. Key, mouse and tick events are
//! multiplexed on a single-threaded runtime; every branch runs to completion
//! before the next frame is drawn. The bottom line shows the widget's latest
//! notification. Changed options are written back to the config on exit.
//!
//! Usage: `filelist [DIR]`. Esc, Ctrl+C or Ctrl+Q quits.

use std::{
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend as Backend,
    layout::{Constraint, Layout},
    style::Style,
    widgets::Paragraph,
};
use tokio::time;
use tracing::{error, info, warn};

use filelist_core::{
    Config, FileList, Logger,
    model::{Notification, NotificationLevel},
    view::theme,
};

type AppTerminal = Terminal<Backend<Stdout>>;

/// Redraw cadence; also drives the search timeout and name scrolling.
const TICK: Duration = Duration::from_millis(100);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (config, load_error) = match Config::load().await {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let _log_guard =
        Logger::init_tracing(&config.logging).context("Failed to initialise logging")?;
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {e}");
    }
    info!("Starting file list demo");

    setup_panic_handler();

    let mut app = App::new(config).context("Failed to initialize application")?;
    let result = app.run().await.context("Application runtime error");
    app.save_settings().await;

    info!("Application exited");
    result
}

struct App {
    terminal: AppTerminal,
    widget: FileList,
    config: Config,
    status: Option<Notification>,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let mut widget = FileList::new(config.file_list.clone());
        if let Some(dir) = std::env::args_os().nth(1).map(PathBuf::from)
            && !widget.set_current_dir(&dir)
        {
            warn!("Ignoring start directory {}", dir.display());
        }

        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        Ok(Self {
            terminal,
            widget,
            config,
            status: None,
        })
    }

    async fn run(&mut self) -> Result<()> {
        let mut events = EventStream::new();
        let mut tick = time::interval(TICK);

        loop {
            let now = Instant::now();
            self.widget.update(now);
            self.collect_notifications(now);
            self.draw()?;

            tokio::select! {
                _ = tick.tick() => {}

                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => {
                        if !self.handle_event(&event) {
                            info!("Quit requested");
                            break;
                        }
                    }
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => {
                        info!("Event stream ended");
                        break;
                    }
                },
            }
        }

        Ok(())
    }

    /// Returns false when the host should quit.
    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => self.widget.handle_key(key, Instant::now()) || !is_quit(key),
            Event::Mouse(mouse) => {
                self.widget.handle_mouse(mouse);
                true
            }
            _ => true,
        }
    }

    fn collect_notifications(&mut self, now: Instant) {
        if let Some(latest) = self.widget.take_notifications().pop() {
            self.status = Some(latest);
        }

        let expired = self.status.as_ref().is_some_and(|note| {
            note.auto_dismiss_ms.is_some_and(|ms| {
                now.saturating_duration_since(note.timestamp) >= Duration::from_millis(ms.into())
            })
        });
        if expired {
            self.status = None;
        }
    }

    fn draw(&mut self) -> Result<()> {
        let widget = &mut self.widget;
        let status = self.status.as_ref();

        self.terminal
            .draw(|frame: &mut Frame<'_>| {
                let [list_area, status_area] =
                    Layout::vertical([Constraint::Min(0), Constraint::Length(1)])
                        .areas(frame.area());

                widget.render(frame, list_area, Instant::now());

                if let Some(note) = status {
                    frame.render_widget(
                        Paragraph::new(note.message.as_str()).style(notification_style(note.level)),
                        status_area,
                    );
                }
            })
            .context("Failed to draw terminal")?;

        Ok(())
    }

    async fn save_settings(&mut self) {
        if !self.widget.settings_changed() {
            return;
        }
        self.config.file_list = self.widget.options().clone();
        if let Err(e) = self.config.save().await {
            error!("Failed to save config: {e}");
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            error!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && (key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c' | 'q'))))
}

fn notification_style(level: NotificationLevel) -> Style {
    let fg = match level {
        NotificationLevel::Info => theme::CYAN,
        NotificationLevel::Success => theme::PURPLE,
        NotificationLevel::Warning => theme::YELLOW,
        NotificationLevel::Error => theme::RED,
    };
    Style::default().fg(fg).bg(theme::BACKGROUND)
}

/// Initialize terminal in raw mode with alternate screen and mouse capture
fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let terminal = Terminal::new(Backend::new(stdout)).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

/// Restore terminal to normal mode
fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("Failed to leave alternate screen")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

/// Setup panic handler for graceful terminal restoration
fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
