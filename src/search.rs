//! Debounced city search
//!
//! Runs city lookups in a background task so typing never blocks the UI.
//! Every keystroke replaces the current query in a watch channel; only a
//! query that stays unchanged for the debounce period is searched. Results
//! come back to the main loop over a tokio channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::config::DisplayConfig;
use crate::data::{CitySearch, CitySuggestion};

/// Messages sent from the search task to the main app
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMessage {
    /// A lookup for this query has started
    Started { query: String },
    /// Matches for the query
    Results {
        query: String,
        cities: Vec<CitySuggestion>,
    },
    /// The query is too short; suggestions should be cleared
    Cleared { query: String },
    /// The lookup failed
    Failed { query: String, error: String },
}

/// Configuration for the search task
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period before a query is searched
    pub debounce: Duration,
    /// Shortest query, in characters, that is searched
    pub min_query_len: usize,
    /// Maximum number of suggestions returned
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            limit: 5,
        }
    }
}

impl From<&DisplayConfig> for SearchConfig {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            debounce: Duration::from_millis(display.search_debounce_ms),
            min_query_len: display.min_query_len,
            limit: display.suggestion_limit,
        }
    }
}

/// Handle for talking to the background search task
pub struct SearchHandle {
    /// Channel for receiving search messages
    pub receiver: mpsc::Receiver<SearchMessage>,
    /// Latest query typed; the task only ever sees the newest value
    query_tx: watch::Sender<String>,
}

impl SearchHandle {
    /// Spawns the search task
    ///
    /// # Arguments
    /// * `searcher` - The city lookup to call once a query settles
    /// * `config` - Debounce and result settings
    ///
    /// The task stops when the handle is dropped.
    pub fn spawn(searcher: Arc<dyn CitySearch>, config: SearchConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (query_tx, mut query_rx) = watch::channel(String::new());

        tokio::spawn(async move {
            'task: loop {
                // Wait for input
                if query_rx.changed().await.is_err() {
                    break;
                }

                // A newer query restarts the quiet period
                loop {
                    match tokio::time::timeout(config.debounce, query_rx.changed()).await {
                        Ok(Ok(())) => continue,
                        Ok(Err(_closed)) => break 'task,
                        Err(_elapsed) => break,
                    }
                }

                let query = query_rx.borrow_and_update().clone();
                let message = if query.trim().chars().count() < config.min_query_len {
                    SearchMessage::Cleared { query }
                } else {
                    let started = SearchMessage::Started {
                        query: query.clone(),
                    };
                    if msg_tx.send(started).await.is_err() {
                        break;
                    }
                    run_search(searcher.as_ref(), &config, query).await
                };

                if msg_tx.send(message).await.is_err() {
                    break;
                }
            }
            debug!("search task stopped");
        });

        Self {
            receiver: msg_rx,
            query_tx,
        }
    }

    /// Replaces the pending query with the current input.
    ///
    /// Never blocks. Queries typed while a lookup is running collapse into
    /// the newest one, which is searched once the lookup finishes.
    pub fn submit(&self, query: impl Into<String>) {
        self.query_tx.send_replace(query.into());
    }
}

async fn run_search(searcher: &dyn CitySearch, config: &SearchConfig, query: String) -> SearchMessage {
    let trimmed = query.trim();
    debug!(query = %trimmed, "searching cities");
    match searcher.search(trimmed).await {
        Ok(mut cities) => {
            cities.truncate(config.limit);
            SearchMessage::Results { query, cities }
        }
        Err(err) => {
            warn!(query = %trimmed, error = %err, "city search failed");
            SearchMessage::Failed {
                query,
                error: err.to_string(),
            }
        }
    }
}

/// Checks for pending search messages without blocking
///
/// # Returns
/// * `Some(SearchMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut SearchHandle) -> Option<SearchMessage> {
    handle.receiver.try_recv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeatherError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every query and answers with one city per call
    #[derive(Default)]
    struct RecordingSearch {
        queries: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl CitySearch for RecordingSearch {
        async fn search(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(WeatherError::Unauthorized);
            }
            Ok((0..10)
                .map(|i| CitySuggestion {
                    id: i,
                    name: format!("{} {}", query, i),
                    country: Some("TR".to_string()),
                    latitude: 39.0,
                    longitude: 32.0,
                })
                .collect())
        }
    }

    /// Takes a while to answer, like a slow network
    #[derive(Default)]
    struct SlowSearch {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CitySearch for SlowSearch {
        async fn search(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
            self.queries.lock().unwrap().push(query.to_string());
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(Vec::new())
        }
    }

    fn test_config() -> SearchConfig {
        SearchConfig {
            debounce: Duration::from_millis(30),
            min_query_len: 2,
            limit: 5,
        }
    }

    async fn next_message(handle: &mut SearchHandle) -> SearchMessage {
        tokio::time::timeout(Duration::from_secs(2), handle.receiver.recv())
            .await
            .expect("timed out waiting for search message")
            .expect("search task ended")
    }

    #[test]
    fn test_search_config_default() {
        let config = SearchConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.limit, 5);
    }

    #[test]
    fn test_search_config_from_display() {
        let display = DisplayConfig {
            search_debounce_ms: 120,
            min_query_len: 3,
            suggestion_limit: 8,
            ..DisplayConfig::default()
        };
        let config = SearchConfig::from(&display);
        assert_eq!(config.debounce, Duration::from_millis(120));
        assert_eq!(config.min_query_len, 3);
        assert_eq!(config.limit, 8);
    }

    #[tokio::test]
    async fn test_rapid_queries_search_only_the_last() {
        let searcher = Arc::new(RecordingSearch::default());
        let mut handle = SearchHandle::spawn(searcher.clone(), test_config());

        handle.submit("An");
        handle.submit("Ank");
        handle.submit("Ankara");

        assert_eq!(
            next_message(&mut handle).await,
            SearchMessage::Started {
                query: "Ankara".to_string()
            }
        );
        match next_message(&mut handle).await {
            SearchMessage::Results { query, cities } => {
                assert_eq!(query, "Ankara");
                assert_eq!(cities.len(), 5);
                assert_eq!(cities[0].name, "Ankara 0");
            }
            other => panic!("unexpected message: {other:?}"),
        }

        assert_eq!(*searcher.queries.lock().unwrap(), vec!["Ankara".to_string()]);
    }

    #[tokio::test]
    async fn test_short_query_clears_without_searching() {
        let searcher = Arc::new(RecordingSearch::default());
        let mut handle = SearchHandle::spawn(searcher.clone(), test_config());

        handle.submit(" A ");

        assert_eq!(
            next_message(&mut handle).await,
            SearchMessage::Cleared {
                query: " A ".to_string()
            }
        );
        assert!(searcher.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_search_reports_error() {
        let searcher = Arc::new(RecordingSearch {
            fail: true,
            ..Default::default()
        });
        let mut handle = SearchHandle::spawn(searcher, test_config());

        handle.submit("Izmir");

        assert!(matches!(
            next_message(&mut handle).await,
            SearchMessage::Started { .. }
        ));
        match next_message(&mut handle).await {
            SearchMessage::Failed { query, error } => {
                assert_eq!(query, "Izmir");
                assert!(error.contains("API key"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_try_recv_empty_before_any_query() {
        let searcher = Arc::new(RecordingSearch::default());
        let mut handle = SearchHandle::spawn(searcher, test_config());
        assert!(try_recv(&mut handle).is_none());
    }

    #[tokio::test]
    async fn test_typing_during_slow_lookup_searches_final_query() {
        let searcher = Arc::new(SlowSearch::default());
        let mut handle = SearchHandle::spawn(searcher.clone(), test_config());

        handle.submit("Ankara");
        assert!(matches!(
            next_message(&mut handle).await,
            SearchMessage::Started { .. }
        ));

        // Far more keystrokes than the message channel holds
        let mut typed = String::from("Iz");
        for c in ('a'..='z').cycle().take(40) {
            typed.push(c);
            handle.submit(typed.clone());
        }

        loop {
            match next_message(&mut handle).await {
                SearchMessage::Results { query, .. } if query == typed => break,
                _ => {}
            }
        }

        assert_eq!(
            *searcher.queries.lock().unwrap(),
            vec!["Ankara".to_string(), typed.clone()]
        );
    }

    #[tokio::test]
    async fn test_search_task_stops_when_handle_dropped() {
        let searcher = Arc::new(RecordingSearch::default());
        let handle = SearchHandle::spawn(searcher.clone(), test_config());
        handle.submit("Van");
        drop(handle);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(searcher.queries.lock().unwrap().is_empty());
    }
}
