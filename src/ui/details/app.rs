use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::network_identity::{LocationRecord, LocationResolver};
use crate::core::runtime::{DetailsRuntime, SocketSettings};
use crate::core::server::ServerProfile;
use crate::core::telemetry::TelemetryView;

use super::blocks::{stat_blocks, StatBlock};
use super::event_handler::DetailsEvent;
use super::render::render_ui;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Details application state
pub struct DetailsApp {
    pub view: TelemetryView,
    pub location: Option<LocationRecord>,
    pub address: String,
    pub socket_url: Option<String>,
    pub should_quit: bool,
    pub show_help: bool,
    refresh_requested: bool,
}

impl DetailsApp {
    pub fn new(profile: &ServerProfile, socket_url: Option<String>) -> Self {
        Self {
            view: TelemetryView::default(),
            location: None,
            address: profile.display_address(),
            socket_url,
            should_quit: false,
            show_help: false,
            refresh_requested: false,
        }
    }

    pub fn blocks(&self) -> Vec<StatBlock> {
        stat_blocks(&self.view, &self.address, self.location.as_ref())
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: DetailsEvent) {
        match event {
            DetailsEvent::Quit => self.should_quit = true,
            DetailsEvent::ToggleHelp => self.show_help = !self.show_help,
            DetailsEvent::RefreshLocation => self.refresh_requested = true,
            DetailsEvent::None => {}
        }
    }

    /// Whether a location refresh was requested since the last call
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    /// Pull whatever the background tasks published since the last frame
    fn sync(&mut self, runtime: &mut DetailsRuntime) {
        if runtime.telemetry_rx.has_changed().unwrap_or(false) {
            self.view = *runtime.telemetry_rx.borrow_and_update();
        }
        if runtime.location_rx.has_changed().unwrap_or(false) {
            self.location = runtime.location_rx.borrow_and_update().clone();
        }
    }
}

/// Configuration for the details app
pub struct DetailsAppConfig {
    pub profile: ServerProfile,
    pub socket: SocketSettings,
    pub resolver: LocationResolver,
}

/// Run the details TUI application
pub fn run_details_app(config: DetailsAppConfig) -> Result<()> {
    let DetailsAppConfig {
        profile,
        socket,
        resolver,
    } = config;

    let mut app = DetailsApp::new(&profile, socket.url.clone());
    let mut runtime = DetailsRuntime::new(&profile, socket, resolver)?;
    let default_ip = profile.default_ip().map(str::to_string);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = (|| -> Result<()> {
        while !app.should_quit {
            app.sync(&mut runtime);
            terminal.draw(|frame| render_ui(frame, &app))?;

            if event::poll(TICK_RATE).context("Event poll failed")? {
                if let Event::Key(key) = event::read().context("Event read failed")? {
                    if key.kind == KeyEventKind::Press {
                        app.handle_event(DetailsEvent::from_key(key.code));
                    }
                }
            }

            if app.take_refresh() {
                runtime.set_address(default_ip.clone());
            }
        }
        Ok(())
    })();

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    runtime.shutdown();
    result
}
