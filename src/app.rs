//! Application state management for the APOD viewer
//!
//! This module contains the main application state, keyboard handling and the
//! rules for applying fetch results to the visible feed. Key handling never
//! performs I/O; it returns a `Command` for the caller to dispatch.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cli::StartupConfig;
use crate::data::{EnrichmentResult, FeedEntry};
use crate::error::{FeedError, NetworkError};
use crate::range::{parse_date, DateRangeSelection, RangeRejection};
use crate::tasks::{Command, FeedOrigin, FetchMessage};

/// Message shown when a range query returns no images
pub const EMPTY_RANGE_MESSAGE: &str = "No images found for that range.";

/// Message shown when the encyclopedia has nothing for a title
pub const NOT_FOUND_MESSAGE: &str = "No Wikipedia information found for this topic.";

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while the default feed is fetched
    Loading,
    /// List of feed entries
    FeedList,
    /// Detail view for the entry at this index
    EntryDetail(usize),
}

/// Date entry mode in the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingStart,
    EditingEnd,
}

/// One-line notification shown under the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Enrichment status of the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentState {
    Idle,
    Loading { title: String },
    Found {
        title: String,
        result: EnrichmentResult,
    },
    NotFound { title: String },
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Active result set, in API order
    pub entries: Vec<FeedEntry>,
    /// Index of the selected entry in the list view
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Dates chosen for a range query
    pub selection: DateRangeSelection,
    /// Date entry mode
    pub input_mode: InputMode,
    /// Text typed into the active date field
    pub input_buffer: String,
    /// Latest notification
    pub notice: Option<Notice>,
    /// A feed request is in flight
    pub feed_loading: bool,
    /// Enrichment for the entry being viewed
    pub enrichment: EnrichmentState,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for the detail view
    pub detail_scroll_offset: u16,
    /// Time the visible feed was last replaced
    pub last_refresh: Option<DateTime<Local>>,
    /// Command to dispatch once the terminal is ready
    startup_command: Command,
}

impl App {
    /// Creates a new App instance with default state
    pub fn new() -> Self {
        Self {
            state: AppState::Loading,
            entries: Vec::new(),
            selected_index: 0,
            should_quit: false,
            selection: DateRangeSelection::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            notice: None,
            feed_loading: false,
            enrichment: EnrichmentState::Idle,
            show_help: false,
            detail_scroll_offset: 0,
            last_refresh: None,
            startup_command: Command::LoadDefault,
        }
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// A range given on the command line replaces the default feed load.
    pub fn with_startup_config(config: &StartupConfig) -> Self {
        let mut app = Self::new();
        if let Some(range) = config.initial_range {
            app.selection = DateRangeSelection::new(Some(range.start()), Some(range.end()));
            app.startup_command = Command::QueryRange(range);
        }
        app
    }

    /// Marks the initial load as started and returns its command
    pub fn start(&mut self) -> Command {
        self.feed_loading = true;
        self.startup_command.clone()
    }

    /// Returns the currently selected entry, if any
    pub fn selected_entry(&self) -> Option<&FeedEntry> {
        self.entries.get(self.selected_index)
    }

    /// Entry shown in the detail view, if that view is active
    pub fn detail_entry(&self) -> Option<&FeedEntry> {
        match self.state {
            AppState::EntryDetail(index) => self.entries.get(index),
            _ => None,
        }
    }

    /// Applies a finished fetch to the state
    pub fn apply(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::FeedLoaded { origin, result } => self.apply_feed(origin, result),
            FetchMessage::EnrichmentLoaded { title, result } => {
                if !self.awaiting_enrichment(&title) {
                    // The detail view it was requested from has closed
                    return;
                }
                self.apply_enrichment(title, result);
            }
        }
    }

    fn awaiting_enrichment(&self, title: &str) -> bool {
        matches!(&self.enrichment, EnrichmentState::Loading { title: t } if t == title)
    }

    fn apply_enrichment(
        &mut self,
        title: String,
        result: Result<Option<EnrichmentResult>, NetworkError>,
    ) {
        match result {
            Ok(Some(result)) => self.enrichment = EnrichmentState::Found { title, result },
            Ok(None) => {
                self.enrichment = EnrichmentState::NotFound { title };
                self.notice = Some(Notice::Info(NOT_FOUND_MESSAGE.to_string()));
            }
            Err(e) => {
                self.enrichment = EnrichmentState::Idle;
                self.notice = Some(Notice::Error(format!(
                    "Failed to fetch Wikipedia information: {}",
                    e
                )));
            }
        }
    }

    fn apply_feed(
        &mut self,
        origin: FeedOrigin,
        result: Result<Vec<FeedEntry>, FeedError>,
    ) {
        self.feed_loading = false;
        if self.state == AppState::Loading {
            self.state = AppState::FeedList;
        }

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                // Previous result set stays on screen
                if e.is_config() {
                    self.notice = Some(Notice::Error(e.to_string()));
                    return;
                }
                let context = match origin {
                    FeedOrigin::Default => "Failed to load images",
                    FeedOrigin::Random => "Failed to reload random images",
                    FeedOrigin::Range(_) => "Failed to search images by date",
                };
                self.notice = Some(Notice::Error(format!("{}: {}", context, e)));
                return;
            }
        };

        self.notice = match origin {
            FeedOrigin::Range(_) => {
                self.selection.clear();
                entries
                    .is_empty()
                    .then(|| Notice::Info(EMPTY_RANGE_MESSAGE.to_string()))
            }
            FeedOrigin::Random if entries.is_empty() => {
                Some(Notice::Info("This batch contained no images.".to_string()))
            }
            _ => None,
        };

        self.replace_entries(entries);
    }

    fn replace_entries(&mut self, entries: Vec<FeedEntry>) {
        self.entries = entries;
        self.selected_index = 0;
        self.last_refresh = Some(Local::now());
        if matches!(self.state, AppState::EntryDetail(_)) {
            self.leave_detail();
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (Esc also quits from the list)
    /// - `Up`/`k`, `Down`/`j`: Move selection or scroll
    /// - `Enter`: Open the selected entry
    /// - `r`: Reload a random batch
    /// - `s` / `e`: Edit start / end date, `c`: clear dates, `f`: search range
    /// - `w`: Fetch Wikipedia information (detail view)
    /// - `Esc` (detail view): Back to list
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Option<Command> {
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return None;
        }

        if self.input_mode != InputMode::Normal {
            self.handle_date_input(key_event);
            return None;
        }

        match self.state {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
                None
            }
            AppState::FeedList => self.handle_list_key(key_event),
            AppState::EntryDetail(_) => self.handle_detail_key(key_event),
        }
    }

    fn handle_list_key(&mut self, key_event: KeyEvent) -> Option<Command> {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Enter => {
                if self.selected_entry().is_some() {
                    self.state = AppState::EntryDetail(self.selected_index);
                }
            }
            KeyCode::Char('r') => return self.request_random(),
            KeyCode::Char('s') => self.begin_date_input(InputMode::EditingStart),
            KeyCode::Char('e') => self.begin_date_input(InputMode::EditingEnd),
            KeyCode::Char('c') => {
                self.selection.clear();
                self.notice = None;
            }
            KeyCode::Char('f') => return self.request_range(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        None
    }

    fn handle_detail_key(&mut self, key_event: KeyEvent) -> Option<Command> {
        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.leave_detail(),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            KeyCode::Char('g') => self.scroll_to_top(),
            KeyCode::Char('w') => return self.request_enrichment(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        None
    }

    fn handle_date_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => self.end_date_input(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Enter => {
                match parse_date(&self.input_buffer) {
                    Some(date) => {
                        if self.input_mode == InputMode::EditingStart {
                            self.selection.start = Some(date);
                        } else {
                            self.selection.end = Some(date);
                        }
                        self.notice = None;
                    }
                    None => {
                        self.notice = Some(Notice::Error(format!(
                            "Invalid date '{}': use YYYY-MM-DD",
                            self.input_buffer
                        )));
                    }
                }
                self.end_date_input();
            }
            KeyCode::Char(c) if (c.is_ascii_digit() || c == '-') && self.input_buffer.len() < 10 => {
                self.input_buffer.push(c);
            }
            _ => {}
        }
    }

    fn begin_date_input(&mut self, mode: InputMode) {
        let current = match mode {
            InputMode::EditingStart => self.selection.start,
            _ => self.selection.end,
        };
        self.input_buffer = current
            .map(|d| d.format(crate::range::DATE_FORMAT).to_string())
            .unwrap_or_default();
        self.input_mode = mode;
    }

    fn end_date_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    fn request_random(&mut self) -> Option<Command> {
        if self.feed_loading {
            return None;
        }
        self.feed_loading = true;
        Some(Command::ReloadRandom)
    }

    fn request_range(&mut self) -> Option<Command> {
        if self.feed_loading {
            return None;
        }
        match self.selection.validate() {
            Ok(range) => {
                self.feed_loading = true;
                Some(Command::QueryRange(range))
            }
            // Selection still in progress
            Err(RangeRejection::Incomplete) => None,
            Err(RangeRejection::Inverted { .. }) => {
                self.notice = Some(Notice::Error(
                    "The start date must be on or before the end date.".to_string(),
                ));
                None
            }
        }
    }

    fn request_enrichment(&mut self) -> Option<Command> {
        let title = self.detail_entry()?.title.clone();
        if self.awaiting_enrichment(&title) {
            return None;
        }
        self.enrichment = EnrichmentState::Loading {
            title: title.clone(),
        };
        Some(Command::Enrich(title))
    }

    /// Enrichment to show for the entry in the detail view
    pub fn visible_enrichment(&self) -> Option<&EnrichmentState> {
        let title = &self.detail_entry()?.title;
        match &self.enrichment {
            EnrichmentState::Idle => None,
            EnrichmentState::Loading { title: t }
            | EnrichmentState::NotFound { title: t }
            | EnrichmentState::Found { title: t, .. } => (t == title).then_some(&self.enrichment),
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.entries.len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.entries.len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    /// Scrolls one row down; the detail renderer clamps the offset to its content
    pub fn scroll_down(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_add(1);
    }

    pub fn scroll_to_top(&mut self) {
        self.detail_scroll_offset = 0;
    }

    /// Resets detail view state when navigating away
    ///
    /// Enrichment belongs to the open view; a lookup still in flight is
    /// dropped when it reports back.
    fn leave_detail(&mut self) {
        self.detail_scroll_offset = 0;
        self.enrichment = EnrichmentState::Idle;
        self.state = AppState::FeedList;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
