use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use futures::{stream::BoxStream, StreamExt};
use shared::{
    codec::{decode_ratings, encode_ratings},
    domain::Movie,
    error::DecodeError,
};
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use thiserror::Error;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

macro_rules! movie_columns {
    () => {
        "imdb_id, title, year, rated, released, runtime, genre, director, writer, actors, plot, \
         language, country, awards, ratings, metascore, imdb_rating, imdb_votes, kind, \
         total_seasons, response"
    };
}

const UPSERT_MOVIE: &str = concat!(
    "INSERT INTO movies (",
    movie_columns!(),
    ") VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
     ON CONFLICT(imdb_id) DO UPDATE SET
        title = excluded.title,
        year = excluded.year,
        rated = excluded.rated,
        released = excluded.released,
        runtime = excluded.runtime,
        genre = excluded.genre,
        director = excluded.director,
        writer = excluded.writer,
        actors = excluded.actors,
        plot = excluded.plot,
        language = excluded.language,
        country = excluded.country,
        awards = excluded.awards,
        ratings = excluded.ratings,
        metascore = excluded.metascore,
        imdb_rating = excluded.imdb_rating,
        imdb_votes = excluded.imdb_votes,
        kind = excluded.kind,
        total_seasons = excluded.total_seasons,
        response = excluded.response"
);
const SELECT_BY_ID: &str = concat!("SELECT ", movie_columns!(), " FROM movies WHERE imdb_id = ?");
const SELECT_ALL: &str = concat!("SELECT ", movie_columns!(), " FROM movies ORDER BY imdb_id");
const SELECT_BY_ACTOR: &str = concat!(
    "SELECT ",
    movie_columns!(),
    " FROM movies WHERE actors LIKE ? ESCAPE '\\' ORDER BY imdb_id"
);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("schema migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("failed to create parent directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("stored ratings for '{imdb_id}' are unreadable: {source}")]
    Ratings {
        imdb_id: String,
        source: DecodeError,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Live result set of a movie query. Yields the current rows on first poll and
/// again after every committed write; dropping it ends the subscription.
pub type MovieStream = BoxStream<'static, StorageResult<Vec<Movie>>>;

/// Handle to the local movie table. Cloning is cheap and every clone shares
/// the same pool and change notifications.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
    revision: Arc<watch::Sender<u64>>,
}

#[derive(Debug, Clone)]
enum LiveQuery {
    All,
    ActorLike(String),
}

impl Storage {
    pub async fn new(database_url: &str) -> StorageResult<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // An in-memory database lives only as long as its connections, so it
        // gets exactly one that is never recycled.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let (revision, _) = watch::channel(0);
        info!(%database_url, "movie store ready");
        Ok(Self {
            pool,
            revision: Arc::new(revision),
        })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> StorageResult<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Closes the pool. Later calls on any clone fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Inserts the movie or replaces every column of the stored record with
    /// the same id.
    pub async fn upsert(&self, movie: &Movie) -> StorageResult<()> {
        upsert_query(movie).execute(&self.pool).await?;
        self.bump_revision();
        info!(imdb_id = %movie.imdb_id, title = %movie.title, "movie saved");
        Ok(())
    }

    /// Same as [`Storage::upsert`] for a batch, inside one transaction.
    pub async fn upsert_many(&self, movies: &[Movie]) -> StorageResult<()> {
        if movies.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for movie in movies {
            upsert_query(movie).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        self.bump_revision();
        info!(count = movies.len(), "movies saved");
        Ok(())
    }

    pub async fn find_by_id(&self, imdb_id: &str) -> StorageResult<Option<Movie>> {
        let row = sqlx::query(SELECT_BY_ID)
            .bind(imdb_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_movie).transpose()
    }

    /// Movies whose `actors` field contains `substring`, ignoring ASCII case.
    /// An empty substring matches every movie.
    pub fn search_by_actor(&self, substring: &str) -> MovieStream {
        self.live_query(LiveQuery::ActorLike(format!(
            "%{}%",
            escape_like(substring)
        )))
    }

    pub fn all_movies(&self) -> MovieStream {
        self.live_query(LiveQuery::All)
    }

    fn live_query(&self, query: LiveQuery) -> MovieStream {
        let pool = self.pool.clone();
        debug!(?query, "live movie query subscribed");
        WatchStream::new(self.revision.subscribe())
            .then(move |revision| {
                let pool = pool.clone();
                let query = query.clone();
                async move {
                    debug!(revision, ?query, "re-running live movie query");
                    query.fetch(&pool).await
                }
            })
            .boxed()
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl LiveQuery {
    async fn fetch(&self, pool: &Pool<Sqlite>) -> StorageResult<Vec<Movie>> {
        let rows = match self {
            Self::All => sqlx::query(SELECT_ALL).fetch_all(pool).await?,
            Self::ActorLike(pattern) => {
                sqlx::query(SELECT_BY_ACTOR)
                    .bind(pattern.as_str())
                    .fetch_all(pool)
                    .await?
            }
        };
        rows.iter().map(row_to_movie).collect()
    }
}

fn upsert_query(movie: &Movie) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(UPSERT_MOVIE)
        .bind(movie.imdb_id.as_str())
        .bind(movie.title.as_str())
        .bind(movie.year.as_str())
        .bind(movie.rated.as_str())
        .bind(movie.released.as_str())
        .bind(movie.runtime.as_str())
        .bind(movie.genre.as_str())
        .bind(movie.director.as_str())
        .bind(movie.writer.as_str())
        .bind(movie.actors.as_str())
        .bind(movie.plot.as_str())
        .bind(movie.language.as_str())
        .bind(movie.country.as_str())
        .bind(movie.awards.as_str())
        .bind(encode_ratings(movie.ratings.as_deref()))
        .bind(movie.metascore.as_str())
        .bind(movie.imdb_rating.as_str())
        .bind(movie.imdb_votes.as_str())
        .bind(movie.kind.as_str())
        .bind(movie.total_seasons.as_deref())
        .bind(movie.response.as_str())
}

fn row_to_movie(row: &SqliteRow) -> StorageResult<Movie> {
    let imdb_id: String = row.try_get("imdb_id")?;
    let ratings_text: String = row.try_get("ratings")?;
    let ratings = decode_ratings(&ratings_text).map_err(|source| StorageError::Ratings {
        imdb_id: imdb_id.clone(),
        source,
    })?;

    Ok(Movie {
        imdb_id,
        title: row.try_get("title")?,
        year: row.try_get("year")?,
        rated: row.try_get("rated")?,
        released: row.try_get("released")?,
        runtime: row.try_get("runtime")?,
        genre: row.try_get("genre")?,
        director: row.try_get("director")?,
        writer: row.try_get("writer")?,
        actors: row.try_get("actors")?,
        plot: row.try_get("plot")?,
        language: row.try_get("language")?,
        country: row.try_get("country")?,
        awards: row.try_get("awards")?,
        ratings: Some(ratings),
        metascore: row.try_get("metascore")?,
        imdb_rating: row.try_get("imdb_rating")?,
        imdb_votes: row.try_get("imdb_votes")?,
        kind: row.try_get("kind")?,
        total_seasons: row.try_get("total_seasons")?,
        response: row.try_get("response")?,
    })
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> StorageResult<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
