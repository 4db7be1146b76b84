//! APOD viewer - browse NASA's Astronomy Picture of the Day in the terminal
//!
//! A terminal UI application that lists recent APOD images, queries them by
//! date range or at random, and looks up each title on Wikipedia.

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use apodview::app::{App, AppState};
use apodview::cache::{CacheStore, FileStorage, MemoryStorage, Storage};
use apodview::cli::{Cli, StartupConfig};
use apodview::config::AppConfig;
use apodview::data::{ApodClient, WikipediaClient};
use apodview::enrich::EnrichmentClient;
use apodview::feed::FeedService;
use apodview::tasks::{self, Services, TaskHandle};
use apodview::ui;

const LOG_FILE: &str = "apodview.log";

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

/// Sends log output to a file next to the cache; the terminal belongs to the UI
fn init_logging(dir: &Path) {
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

/// Picks the cache directory: command line, then environment, then the platform default
fn resolve_cache_dir(startup: &StartupConfig, config: &AppConfig) -> Option<PathBuf> {
    startup
        .cache_dir
        .clone()
        .or_else(|| config.cache_dir.clone())
        .or_else(|| FileStorage::new().map(|storage| storage.dir().to_path_buf()))
}

fn build_services(startup: &StartupConfig, config: &AppConfig, cache_dir: Option<PathBuf>) -> Services {
    let storage: Arc<dyn Storage> = match cache_dir {
        Some(dir) => Arc::new(FileStorage::with_dir(dir)),
        None => {
            warn!("no cache directory available, caching in memory only");
            Arc::new(MemoryStorage::new())
        }
    };

    let source = Arc::new(ApodClient::with_base_url(
        config.nasa_api_key.clone(),
        config.apod_api_url.clone(),
    ));
    let feed = Arc::new(FeedService::new(source.clone(), CacheStore::new(storage)));
    info!(ttl_hours = feed.ttl().num_hours(), "default feed cache policy");
    let wikipedia = WikipediaClient::with_base_urls(
        config.wikipedia_summary_url.clone(),
        config.wikipedia_search_url.clone(),
    );

    Services {
        feed,
        source,
        enrichment: EnrichmentClient::new(Arc::new(wikipedia)),
        random_count: startup.random_count,
    }
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &mut App) {
    match app.state {
        AppState::Loading => {
            render_loading(frame);
        }
        AppState::FeedList => {
            ui::render_feed_list(frame, app);
        }
        AppState::EntryDetail(index) => {
            ui::render_entry_detail(frame, app, index);
        }
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading space images...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments before touching the terminal
    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let config = AppConfig::from_env();
    let cache_dir = resolve_cache_dir(&startup, &config);
    if let Some(dir) = &cache_dir {
        init_logging(dir);
    }
    info!(
        cache_dir = ?cache_dir,
        api_key_set = config.nasa_api_key.is_some(),
        "starting apodview"
    );

    let mut handle = TaskHandle::new(build_services(&startup, &config, cache_dir));

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app instance and trigger the initial load
    let mut app = App::with_startup_config(&startup);
    handle.dispatch(app.start());

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &mut app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = app.handle_key(key) {
                    handle.dispatch(command);
                }
            }
        }

        // Apply finished fetches
        while let Some(message) = tasks::try_recv(&mut handle) {
            app.apply(message);
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    info!("exiting apodview");
    Ok(())
}
