mod app;
mod cards;
mod config;
mod events;
mod logging;
mod notify;
mod ui;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use app::App;
use config::Database;
use events::Action;
use notify::LocalNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    let data_dir = config::data_dir()?;
    logging::init(&data_dir)?;
    info!(version = env!("CARGO_PKG_VERSION"), dir = %data_dir.display(), "starting wordcards");

    // Open storage before touching the terminal so errors print normally
    let database = Database::new()?;
    let (notifier, deliveries) = LocalNotifier::new();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::with_parts(Box::new(database), Box::new(notifier), Some(deliveries));

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        error!(error = %e, "exited with error");
        eprintln!("Error: {}", e);
    }

    info!("shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            ui::render(app, frame.area(), frame.buffer_mut());
        })?;

        // Surface notifications that fired since the last tick
        app.process_notification_events();

        // Handle input with timeout
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    let action = match Action::typed_char(key) {
                        Some(c) if app.input_mode.is_text_entry() => Action::Char(c),
                        _ => Action::from_key_event(key),
                    };
                    app.handle_action(action)?;
                }
            }
        }

        // Let notification tasks run between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}
