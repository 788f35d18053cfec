//! View-state orchestration between the provider and the local store.
//!
//! All observable slots live in one [`ViewState`] published through a watch
//! channel. Each transition replaces the snapshot in a single step, so an
//! observer sees either the state before an operation, its loading state, or
//! its outcome, never a mix of them.

use std::sync::Arc;

use shared::{
    domain::{Movie, SearchItem},
    seed::predefined_movies,
};
use storage::{MovieStream, Storage, StorageError, StorageResult};
use tokio::sync::watch;
use tracing::{debug, error};

use crate::{actor_search::ActorSearch, remote::MovieRemoteSource};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub current_movie: Option<Movie>,
    pub search_results: Vec<SearchItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct MovieViewModel {
    storage: Storage,
    remote: Arc<dyn MovieRemoteSource>,
    state: watch::Sender<ViewState>,
}

impl MovieViewModel {
    pub fn new(storage: Storage, remote: Arc<dyn MovieRemoteSource>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            storage,
            remote,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Looks a title up remotely and makes it the current movie. On failure
    /// the previous current movie stays in place.
    pub async fn search_movie_by_title(&self, title: &str) {
        self.begin_loading();
        let outcome = self.remote.fetch_by_title(title).await;
        self.state.send_modify(|state| {
            state.is_loading = false;
            match outcome {
                Ok(movie) => {
                    state.current_movie = Some(movie);
                    state.error = None;
                }
                Err(err) => {
                    state.error = Some(format!("Movie not found or API error: {err}"));
                }
            }
        });
    }

    pub async fn search_movies_by_title_remote(&self, term: &str) {
        self.begin_loading();
        let outcome = self.remote.search_by_term(term).await;
        self.state.send_modify(|state| {
            state.is_loading = false;
            match outcome {
                Ok(items) => {
                    state.search_results = items;
                    state.error = None;
                }
                Err(err) => {
                    state.error = Some(format!("No movies found: {err}"));
                }
            }
        });
    }

    /// Persists the current movie, if any. A storage failure is published in
    /// the error slot and also returned.
    pub async fn save_current_movie_to_db(&self) -> StorageResult<()> {
        let current = self.state.borrow().current_movie.clone();
        let Some(movie) = current else {
            debug!("no current movie to save");
            return Ok(());
        };
        self.storage
            .upsert(&movie)
            .await
            .inspect_err(|err| self.publish_storage_failure("Failed to save movie", err))
    }

    pub async fn add_predefined_movies_to_db(&self) -> StorageResult<()> {
        self.storage
            .upsert_many(&predefined_movies())
            .await
            .inspect_err(|err| self.publish_storage_failure("Failed to add movies", err))
    }

    pub fn search_movies_by_actor(&self, name: &str) -> MovieStream {
        self.storage.search_by_actor(name)
    }

    pub fn all_movies(&self) -> MovieStream {
        self.storage.all_movies()
    }

    /// A fresh actor search session over the same store.
    pub fn actor_search(&self) -> ActorSearch {
        ActorSearch::new(self.storage.clone())
    }

    fn begin_loading(&self) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    fn publish_storage_failure(&self, context: &str, err: &StorageError) {
        error!(error = %err, "{context}");
        self.state
            .send_modify(|state| state.error = Some(format!("{context}: {err}")));
    }
}

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod tests;
