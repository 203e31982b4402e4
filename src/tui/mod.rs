//! Terminal front end.
//!
//! Input arrives on a blocking reader thread and generation outcomes on the
//! runner's task; both are funnelled into one [`AppEvent`] channel that the
//! draw loop drains.

pub mod app;
pub mod dialog;
pub mod input;
pub mod render;

pub use app::{App, Command, InputMode};

use crate::config::AppConfig;
use crate::desktop::SystemDesktop;
use crate::error::Result;
use crate::runner::GenerationOutcome;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEvent};
use crossterm::execute;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Generation(GenerationOutcome),
}

/// Cloneable handle for posting [`AppEvent`]s from any thread or task.
#[derive(Debug, Clone)]
pub struct AppEventSender {
    tx: UnboundedSender<AppEvent>,
}

impl AppEventSender {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    /// Post an event. Returns false once the loop has shut down.
    pub fn send(&self, event: AppEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(e) => {
                debug!(event = ?e.0, "Event loop closed; dropping event");
                false
            }
        }
    }
}

fn spawn_input_thread(events: AppEventSender) {
    std::thread::spawn(move || loop {
        let posted = match event::read() {
            Ok(Event::Key(key)) => events.send(AppEvent::Key(key)),
            Ok(Event::Paste(text)) => events.send(AppEvent::Paste(text)),
            Ok(Event::Resize(_, _)) => events.send(AppEvent::Resize),
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Terminal input failed");
                false
            }
        };
        if !posted {
            break;
        }
    });
}

/// Run the editor until the user quits. `startup_errors` are shown in an
/// error dialog on the first frame.
pub async fn run(config: AppConfig, startup_errors: Vec<String>) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let events = AppEventSender::new(tx);
    let mut app = App::new(config, events.clone(), SystemDesktop);
    if !startup_errors.is_empty() {
        app.show_error(startup_errors.join("\n\n"));
    }

    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableBracketedPaste)?;
    spawn_input_thread(events);
    info!("Editor started");

    let result = event_loop(&mut terminal, app, rx).await;

    if let Err(e) = execute!(std::io::stdout(), DisableBracketedPaste) {
        debug!(error = %e, "Failed to disable bracketed paste");
    }
    ratatui::restore();
    info!("Editor closed");
    result
}

async fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    mut app: App<SystemDesktop>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    terminal.draw(|frame| render::draw(frame, &app))?;
    while let Some(event) = rx.recv().await {
        app.handle_event(event);
        if app.should_quit() {
            break;
        }
        terminal.draw(|frame| render::draw(frame, &app))?;
    }
    Ok(())
}
