//! Application state management for Hava Durumu
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, search suggestions and transitions between the views.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::cli::StartupConfig;
use crate::data::{CitySuggestion, CurrentWeather, Forecast, Location, WeatherClient, WeatherError};
use crate::search::SearchMessage;

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first response
    Loading,
    /// Current conditions with the search bar
    Home,
    /// Detailed conditions with hourly and daily forecasts
    Detail,
}

/// Whether keystrokes go to the search bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Severity of the status line message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Warning,
    Error,
}

/// Message shown in the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// User-facing text for a failed weather request
fn describe_error(err: &WeatherError) -> String {
    if err.is_not_found() {
        return "Bu şehir bulunamadı. Lütfen geçerli bir şehir adı girin.".to_string();
    }
    match err {
        WeatherError::Unauthorized => "API anahtarı geçersiz.".to_string(),
        WeatherError::Timeout => "Sunucu yanıt vermedi, lütfen tekrar deneyin.".to_string(),
        other => format!("Hava durumu alınamadı: {}", other),
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Latest current conditions
    pub current: Option<CurrentWeather>,
    /// Latest forecast for the current location
    pub forecast: Option<Forecast>,
    /// Location of the data on screen (or being loaded)
    pub location: Location,
    /// Status line message
    pub status: Option<StatusMessage>,
    /// Text typed into the search bar
    pub search_query: String,
    /// Whether the search bar has focus
    pub input_mode: InputMode,
    /// Suggestions for the current query
    pub suggestions: Vec<CitySuggestion>,
    /// Highlighted suggestion, if any
    pub selected_suggestion: Option<usize>,
    /// Whether a suggestion lookup is running
    pub searching: bool,
    /// Scroll offset for the detail view
    pub detail_scroll_offset: u16,
    /// Timestamp of last successful load
    pub last_refresh: Option<DateTime<Local>>,
    /// Open the detail view after the next successful load
    pending_detail: bool,
    /// Location waiting to be loaded by the main loop
    pending_request: Option<Location>,
    /// Query waiting to be handed to the search task
    pending_search: Option<String>,
    /// Weather API client
    client: WeatherClient,
}

impl App {
    /// Creates a new App that will first load the given location
    pub fn new(client: WeatherClient, location: Location) -> Self {
        Self {
            state: AppState::Loading,
            should_quit: false,
            show_help: false,
            current: None,
            forecast: None,
            location: location.clone(),
            status: None,
            search_query: String::new(),
            input_mode: InputMode::Normal,
            suggestions: Vec::new(),
            selected_suggestion: None,
            searching: false,
            detail_scroll_offset: 0,
            last_refresh: None,
            pending_detail: false,
            pending_request: Some(location),
            pending_search: None,
            client,
        }
    }

    /// Creates a new App instance from the startup configuration.
    ///
    /// # Arguments
    /// * `client` - The weather API client
    /// * `config` - Settings derived from CLI arguments
    pub fn with_startup_config(client: WeatherClient, config: StartupConfig) -> Self {
        let mut app = Self::new(client, config.location);
        app.pending_detail = config.start_in_detail;
        app
    }

    /// Takes the location the main loop should load next, if any
    pub fn take_pending_request(&mut self) -> Option<Location> {
        self.pending_request.take()
    }

    /// Takes the query the main loop should hand to the search task, if any
    pub fn take_pending_search(&mut self) -> Option<String> {
        self.pending_search.take()
    }

    /// Loads current conditions and the forecast for a location.
    ///
    /// A failed current-conditions request keeps whatever was on screen and
    /// reports the error. A failed forecast keeps the new current conditions
    /// and shows a notice.
    pub async fn load(&mut self, location: Location) {
        info!(location = %location, "loading weather");

        let (current, forecast) = match &location {
            Location::Coordinates {
                latitude,
                longitude,
            } => {
                let (current, forecast) = futures::future::join(
                    self.client.fetch_current(&location),
                    self.client.fetch_forecast(*latitude, *longitude),
                )
                .await;
                (current, Some(forecast))
            }
            Location::City(_) => (self.client.fetch_current(&location).await, None),
        };

        let current = match current {
            Ok(current) => current,
            Err(err) => {
                warn!(location = %location, error = %err, "failed to load current weather");
                self.status = Some(StatusMessage::error(describe_error(&err)));
                self.pending_detail = false;
                self.finish_loading();
                return;
            }
        };

        let forecast = match forecast {
            Some(forecast) => forecast,
            None => {
                self.client
                    .fetch_forecast(current.latitude, current.longitude)
                    .await
            }
        };

        self.apply_loaded(location, current, forecast);
    }

    /// Stores a completed load
    fn apply_loaded(
        &mut self,
        location: Location,
        current: CurrentWeather,
        forecast: Result<Forecast, WeatherError>,
    ) {
        self.status = None;
        self.forecast = match forecast {
            Ok(forecast) => Some(forecast),
            Err(err) => {
                warn!(city = %current.city, error = %err, "failed to load forecast");
                self.status = Some(StatusMessage::warning("Tahmin verisi alınamadı."));
                None
            }
        };
        info!(city = %current.city, code = %current.condition_code, "weather loaded");
        self.current = Some(current);
        self.location = location;
        self.last_refresh = Some(Local::now());
        self.detail_scroll_offset = 0;

        if self.pending_detail {
            self.pending_detail = false;
            self.state = AppState::Detail;
        } else {
            self.finish_loading();
        }
    }

    fn finish_loading(&mut self) {
        if self.state == AppState::Loading {
            self.state = AppState::Home;
        }
    }

    /// Applies a message from the search task
    ///
    /// Messages for a query other than the one in the search bar are stale
    /// and ignored.
    pub fn apply_search_message(&mut self, message: SearchMessage) {
        match message {
            SearchMessage::Started { query } if query == self.search_query => {
                self.searching = true;
            }
            SearchMessage::Results { query, cities } if query == self.search_query => {
                self.searching = false;
                self.suggestions = cities;
                self.selected_suggestion = None;
            }
            SearchMessage::Cleared { query } | SearchMessage::Failed { query, .. }
                if query == self.search_query =>
            {
                self.searching = false;
                self.suggestions.clear();
                self.selected_suggestion = None;
            }
            _ => {}
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (outside the search bar)
    /// - `/` or `s` (Home): Focus the search bar
    /// - `Enter` or `d` (Home): Open the detail view
    /// - `r`: Reload the current location
    /// - `j`/`k`, `g`/`G` (Detail): Scroll
    /// - `Esc`: Leave the search bar, go back, or quit from Home
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_search_key(key_event);
            return;
        }

        match self.state {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Home => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('/') | KeyCode::Char('s') => {
                    self.input_mode = InputMode::Editing;
                }
                KeyCode::Enter | KeyCode::Char('d') => {
                    self.open_detail();
                }
                KeyCode::Char('r') => {
                    self.request_refresh();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::Detail => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    self.detail_scroll_offset = 0;
                    self.state = AppState::Home;
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.detail_scroll_offset = self.detail_scroll_offset.saturating_add(1);
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
                }
                KeyCode::Char('g') => {
                    self.detail_scroll_offset = 0;
                }
                KeyCode::Char('G') => {
                    // Clamped to the content height while rendering
                    self.detail_scroll_offset = u16::MAX;
                }
                KeyCode::Char('r') => {
                    self.request_refresh();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Keys while the search bar has focus
    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.clear_search();
            }
            KeyCode::Enter => {
                self.submit_search();
            }
            KeyCode::Up => {
                self.selected_suggestion = match self.selected_suggestion {
                    Some(0) | None => None,
                    Some(i) => Some(i - 1),
                };
            }
            KeyCode::Down => {
                if !self.suggestions.is_empty() {
                    let last = self.suggestions.len() - 1;
                    self.selected_suggestion = Some(match self.selected_suggestion {
                        None => 0,
                        Some(i) => (i + 1).min(last),
                    });
                }
            }
            KeyCode::Backspace => {
                if self.search_query.pop().is_some() {
                    self.query_changed();
                }
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.query_changed();
            }
            _ => {}
        }
    }

    fn query_changed(&mut self) {
        self.selected_suggestion = None;
        self.pending_search = Some(self.search_query.clone());
    }

    fn clear_search(&mut self) {
        self.search_query.clear();
        self.suggestions.clear();
        self.selected_suggestion = None;
        self.searching = false;
        self.pending_search = None;
    }

    /// Loads the highlighted suggestion, or the typed city name
    fn submit_search(&mut self) {
        let selected = self
            .selected_suggestion
            .and_then(|i| self.suggestions.get(i))
            .map(CitySuggestion::location);

        let location = match selected {
            Some(location) => location,
            None => {
                let query = self.search_query.trim();
                if query.is_empty() {
                    self.status = Some(StatusMessage::warning("Lütfen bir şehir adı girin."));
                    return;
                }
                Location::City(query.to_string())
            }
        };

        self.pending_request = Some(location);
        self.input_mode = InputMode::Normal;
        self.clear_search();
    }

    fn open_detail(&mut self) {
        if self.current.is_some() {
            self.detail_scroll_offset = 0;
            self.state = AppState::Detail;
        }
    }

    fn request_refresh(&mut self) {
        self.pending_request = Some(self.location.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{current_weather, sample};
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn test_app() -> App {
        App::new(
            WeatherClient::new("test-key"),
            Location::City("Istanbul".to_string()),
        )
    }

    fn loaded_app() -> App {
        let mut app = test_app();
        let location = app.take_pending_request().unwrap();
        let forecast = Forecast {
            city: "İstanbul".to_string(),
            timezone_offset: 10_800,
            samples: vec![sample(1_721_044_800, "02d")],
        };
        app.apply_loaded(location, current_weather(), Ok(forecast));
        app
    }

    fn suggestion(name: &str, latitude: f64, longitude: f64) -> CitySuggestion {
        CitySuggestion {
            id: 1,
            name: name.to_string(),
            country: Some("TR".to_string()),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_new_app_requests_initial_location() {
        let mut app = test_app();
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(
            app.take_pending_request(),
            Some(Location::City("Istanbul".to_string()))
        );
        assert_eq!(app.take_pending_request(), None);
    }

    #[test]
    fn test_apply_loaded_moves_to_home() {
        let app = loaded_app();
        assert_eq!(app.state, AppState::Home);
        assert!(app.current.is_some());
        assert!(app.forecast.is_some());
        assert!(app.status.is_none());
        assert!(app.last_refresh.is_some());
    }

    #[test]
    fn test_startup_detail_opens_after_load() {
        let mut app = App::with_startup_config(
            WeatherClient::new("test-key"),
            StartupConfig {
                location: Location::City("Ankara".to_string()),
                start_in_detail: true,
            },
        );
        let location = app.take_pending_request().unwrap();
        app.apply_loaded(location, current_weather(), Ok(Forecast {
            city: "Ankara".to_string(),
            timezone_offset: 10_800,
            samples: Vec::new(),
        }));
        assert_eq!(app.state, AppState::Detail);
    }

    #[test]
    fn test_forecast_failure_keeps_current() {
        let mut app = test_app();
        let location = app.take_pending_request().unwrap();
        app.apply_loaded(location, current_weather(), Err(WeatherError::Timeout));

        assert_eq!(app.state, AppState::Home);
        assert!(app.current.is_some());
        assert!(app.forecast.is_none());
        assert_eq!(
            app.status.as_ref().map(|s| s.kind),
            Some(StatusKind::Warning)
        );
    }

    #[tokio::test]
    async fn test_failed_load_reports_error_and_leaves_loading() {
        let client = WeatherClient::new("test-key").with_base_url("http://127.0.0.1:1");
        let mut app = App::new(client, Location::City("Istanbul".to_string()));
        let location = app.take_pending_request().unwrap();

        app.load(location).await;

        assert_eq!(app.state, AppState::Home);
        assert!(app.current.is_none());
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
    }

    #[test]
    fn test_describe_not_found() {
        let text = describe_error(&WeatherError::NotFound("Atlantis".to_string()));
        assert!(text.contains("bulunamadı"));
        let text = describe_error(&WeatherError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_home_quit_keys() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_detail_navigation() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Detail);

        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.detail_scroll_offset, 2);
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.detail_scroll_offset, 1);
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.detail_scroll_offset, 0);
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.detail_scroll_offset, 0);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Home);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_detail_requires_data() {
        let mut app = test_app();
        app.state = AppState::Home;
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.state, AppState::Home);
    }

    #[test]
    fn test_refresh_requests_current_location() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(
            app.take_pending_request(),
            Some(Location::City("Istanbul".to_string()))
        );
    }

    #[test]
    fn test_typing_queues_search() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "Ank");
        assert_eq!(app.search_query, "Ank");
        assert_eq!(app.take_pending_search(), Some("Ank".to_string()));
        assert_eq!(app.take_pending_search(), None);

        // 'q' is text while editing
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.search_query, "Ank");
    }

    #[test]
    fn test_enter_with_empty_query_warns() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "   ");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.take_pending_request(), None);
        assert_eq!(
            app.status.as_ref().map(|s| s.kind),
            Some(StatusKind::Warning)
        );
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_enter_loads_typed_city() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, " Bursa ");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(
            app.take_pending_request(),
            Some(Location::City("Bursa".to_string()))
        );
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.search_query.is_empty());
    }

    #[test]
    fn test_selected_suggestion_loads_coordinates() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "Ank");
        app.apply_search_message(SearchMessage::Results {
            query: "Ank".to_string(),
            cities: vec![
                suggestion("Ankara", 39.92, 32.85),
                suggestion("Ankaran", 45.57, 13.73),
            ],
        });
        assert_eq!(app.suggestions.len(), 2);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_suggestion, Some(1));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_suggestion, Some(0));

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.take_pending_request(),
            Some(Location::Coordinates {
                latitude: 39.92,
                longitude: 32.85
            })
        );
        assert!(app.suggestions.is_empty());
    }

    #[test]
    fn test_stale_search_results_ignored() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "Izmir");

        app.apply_search_message(SearchMessage::Results {
            query: "Iz".to_string(),
            cities: vec![suggestion("Izmit", 40.77, 29.94)],
        });
        assert!(app.suggestions.is_empty());

        app.apply_search_message(SearchMessage::Started {
            query: "Izmir".to_string(),
        });
        assert!(app.searching);
        app.apply_search_message(SearchMessage::Failed {
            query: "Izmir".to_string(),
            error: "timeout".to_string(),
        });
        assert!(!app.searching);
        assert!(app.suggestions.is_empty());
    }

    #[test]
    fn test_escape_leaves_search_and_clears() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "Van");
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.search_query.is_empty());
        assert_eq!(app.take_pending_search(), None);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.state, AppState::Home);

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}
