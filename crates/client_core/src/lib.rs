//! Client side of the movie catalogue: provider lookups, the view-state
//! orchestrator and live actor search over the local store.

pub mod actor_search;
pub mod error;
pub mod remote;
pub mod view_model;

pub use actor_search::{ActorResults, ActorSearch};
pub use error::FetchError;
pub use remote::{MissingRemoteSource, MovieRemoteSource, OmdbClient, OmdbConfig};
pub use view_model::{MovieViewModel, ViewState};
