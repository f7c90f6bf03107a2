mod app;
mod input;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use muse_core::GenerationProvider;
use muse_gemini::GeminiClient;
use ratatui::prelude::*;
use tracing::info;

use app::ChatApp;

use crate::error::MuseError;

pub async fn run(client: GeminiClient) -> Result<(), MuseError> {
    let models = format!("{} / {}", client.text_model(), client.image_model());
    info!(%models, "Starting chat session");
    let mut app = ChatApp::new(Arc::new(client), models);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(
        messages = app.orchestrator.messages().len(),
        "Chat session ended"
    );
    result
}

async fn run_loop<P: GenerationProvider>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut ChatApp<P>,
) -> Result<(), MuseError> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with timeout to allow checking async responses
        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            input::handle_event(app, event);
        }

        app.poll_response();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
