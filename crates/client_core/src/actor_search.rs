use std::sync::Arc;

use futures::StreamExt;
use shared::domain::Movie;
use storage::Storage;
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorResults {
    pub query: String,
    pub movies: Vec<Movie>,
    pub error: Option<String>,
    /// False until the store has answered `query` at least once; `movies` is
    /// meaningless before that.
    pub loaded: bool,
}

/// Keeps at most one live actor query open. Every new query cancels the
/// previous subscription before the new one starts, so results for an
/// outdated query are never published.
pub struct ActorSearch {
    storage: Storage,
    results: Arc<watch::Sender<ActorResults>>,
    task: Option<JoinHandle<()>>,
}

impl ActorSearch {
    pub fn new(storage: Storage) -> Self {
        let (results, _) = watch::channel(ActorResults::default());
        Self {
            storage,
            results: Arc::new(results),
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ActorResults> {
        self.results.subscribe()
    }

    pub fn current(&self) -> ActorResults {
        self.results.borrow().clone()
    }

    /// Must be called from within a tokio runtime. The new query is published
    /// right away as not yet loaded; an empty query clears the results without
    /// subscribing.
    pub fn set_query(&mut self, query: &str) {
        self.cancel();
        // Nothing to wait for on an empty query.
        self.results.send_replace(ActorResults {
            query: query.to_string(),
            loaded: query.is_empty(),
            ..ActorResults::default()
        });
        if query.is_empty() {
            return;
        }

        let query = query.to_string();
        let mut updates = self.storage.search_by_actor(&query);
        let results = Arc::clone(&self.results);
        debug!(%query, "actor search started");
        self.task = Some(tokio::spawn(async move {
            while let Some(update) = updates.next().await {
                results.send_if_modified(|current| {
                    // A cancelled task can still be mid-update on another worker.
                    if current.query != query {
                        return false;
                    }
                    match update {
                        Ok(movies) => {
                            current.movies = movies;
                            current.error = None;
                        }
                        Err(err) => current.error = Some(format!("Actor search failed: {err}")),
                    }
                    current.loaded = true;
                    true
                });
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ActorSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "tests/actor_search_tests.rs"]
mod tests;
