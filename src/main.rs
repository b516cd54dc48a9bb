//! Hava Durumu - current weather and forecasts in the terminal
//!
//! A terminal UI application that shows current conditions, a 24-step hourly
//! forecast and a 7-day outlook for any city, backed by OpenWeatherMap.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use havadurumu::app::App;
use havadurumu::cli::{Cli, StartupConfig};
use havadurumu::config::AppConfig;
use havadurumu::data::WeatherClient;
use havadurumu::logging;
use havadurumu::search::{self, SearchConfig, SearchHandle};
use havadurumu::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Loads configuration and builds the app; nothing here touches the terminal
fn startup(cli: &Cli) -> Result<(App, SearchHandle), Box<dyn std::error::Error>> {
    let config = AppConfig::load(cli.config.as_deref())?.with_api_key(cli.api_key.clone());

    if let Some(path) = logging::init(&config.logging, cli.log_file.as_deref()) {
        info!(log_file = %path.display(), "logging initialized");
    }

    let client = WeatherClient::from_config(&config.weather)?;
    let startup = StartupConfig::resolve(cli, &config);
    info!(location = %startup.location, detail = startup.start_in_detail, "starting");

    let search = SearchHandle::spawn(
        Arc::new(client.clone()),
        SearchConfig::from(&config.display),
    );
    Ok((App::with_startup_config(client, startup), search))
}

/// Main event loop: drains search results, performs queued loads, draws and
/// handles input until the user quits
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    search_handle: &mut SearchHandle,
) -> io::Result<()> {
    loop {
        while let Some(message) = search::try_recv(search_handle) {
            app.apply_search_message(message);
        }

        if let Some(query) = app.take_pending_search() {
            search_handle.submit(query);
        }

        if let Some(location) = app.take_pending_request() {
            // Show the loading state (or the previous data) while waiting
            terminal.draw(|f| ui::render(f, app))?;
            app.load(location).await;
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (mut app, mut search_handle) = match startup(&cli) {
        Ok(parts) => parts,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    match run_terminal(&mut app, &mut search_handle).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "terminal error");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the terminal, runs the loop and always restores the terminal
async fn run_terminal(app: &mut App, search_handle: &mut SearchHandle) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, app, search_handle).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    info!("exiting");

    result
}
