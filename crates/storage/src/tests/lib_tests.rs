use super::*;
use futures::StreamExt;
use shared::{domain::Rating, seed::predefined_movies};
use std::time::Duration;
use tokio::time::timeout;

fn movie(imdb_id: &str, title: &str, actors: &str) -> Movie {
    Movie {
        imdb_id: imdb_id.into(),
        title: title.into(),
        actors: actors.into(),
        ratings: Some(vec![Rating::new("Internet Movie Database", "7.0/10")]),
        response: "True".into(),
        ..Movie::default()
    }
}

async fn next_set(stream: &mut MovieStream) -> Vec<Movie> {
    timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("live query emitted in time")
        .expect("live query still open")
        .expect("live query rows")
}

fn ids(movies: &[Movie]) -> Vec<&str> {
    movies.iter().map(|m| m.imdb_id.as_str()).collect()
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("movies.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage.close().await;

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn file_backed_store_survives_reopen() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let database_url = format!(
        "sqlite://{}",
        temp_root
            .path()
            .join("movies.db")
            .to_string_lossy()
            .replace('\\', "/")
    );

    let storage = Storage::new(&database_url).await.expect("db");
    storage
        .upsert(&movie("tt0000001", "Persisted", "Someone"))
        .await
        .expect("upsert");
    storage.close().await;

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let found = reopened.find_by_id("tt0000001").await.expect("find");
    assert_eq!(found.map(|m| m.title), Some("Persisted".to_string()));
}

#[tokio::test]
async fn upserting_same_movie_twice_keeps_one_equal_record() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let shawshank = predefined_movies().remove(0);

    storage.upsert(&shawshank).await.expect("first upsert");
    storage.upsert(&shawshank).await.expect("second upsert");

    let mut all = storage.all_movies();
    let movies = next_set(&mut all).await;
    assert_eq!(movies, vec![shawshank]);
}

#[tokio::test]
async fn upsert_replaces_whole_record() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let mut first = movie("tt0903747", "A", "Bryan Cranston");
    first.plot = "old plot".into();
    first.total_seasons = Some("5".into());
    storage.upsert(&first).await.expect("first upsert");

    let second = Movie {
        imdb_id: "tt0903747".into(),
        title: "B".into(),
        ratings: Some(Vec::new()),
        ..Movie::default()
    };
    storage.upsert(&second).await.expect("second upsert");

    let found = storage
        .find_by_id("tt0903747")
        .await
        .expect("find")
        .expect("present");
    assert_eq!(found, second);
    assert_eq!(found.plot, "");
    assert_eq!(found.actors, "");
    assert_eq!(found.total_seasons, None);
}

#[tokio::test]
async fn find_by_id_is_exact() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .upsert(&movie("tt0133093", "The Matrix", "Keanu Reeves"))
        .await
        .expect("upsert");

    assert!(storage.find_by_id("tt013309").await.expect("find").is_none());
    assert!(storage.find_by_id("TT0133093").await.expect("find").is_none());
    assert!(storage.find_by_id("tt0133093").await.expect("find").is_some());
}

#[tokio::test]
async fn missing_ratings_read_back_as_empty_list() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let mut unrated = movie("tt0000002", "Unrated", "Nobody");
    unrated.ratings = None;
    storage.upsert(&unrated).await.expect("upsert");

    let found = storage
        .find_by_id("tt0000002")
        .await
        .expect("find")
        .expect("present");
    assert_eq!(found.ratings, Some(Vec::new()));
}

#[tokio::test]
async fn actor_search_is_case_insensitive_substring() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .upsert_many(&[
            movie("tt1", "Both", "Tim Robbins, Tom Hardy"),
            movie("tt2", "Only Tim", "Tim Robbins"),
        ])
        .await
        .expect("seed");

    let mut results = storage.search_by_actor("tom");
    assert_eq!(ids(&next_set(&mut results).await), ["tt1"]);
}

#[tokio::test]
async fn actor_search_matches_wildcard_characters_literally() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .upsert_many(&[
            movie("tt1", "Underscore", "Tom_Hardy"),
            movie("tt2", "Letter", "TomXHardy"),
            movie("tt3", "Percent", "100% Actor"),
        ])
        .await
        .expect("seed");

    let mut underscore = storage.search_by_actor("m_h");
    assert_eq!(ids(&next_set(&mut underscore).await), ["tt1"]);

    let mut percent = storage.search_by_actor("0%");
    assert_eq!(ids(&next_set(&mut percent).await), ["tt3"]);
}

#[tokio::test]
async fn empty_actor_search_matches_everything() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .upsert_many(&[movie("tt1", "One", "Somebody"), movie("tt2", "Two", "")])
        .await
        .expect("seed");

    let mut results = storage.search_by_actor("");
    assert_eq!(ids(&next_set(&mut results).await), ["tt1", "tt2"]);
}

#[tokio::test]
async fn live_queries_re_emit_after_writes() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let mut all = storage.all_movies();
    let mut pacino = storage.search_by_actor("pacino");

    assert!(next_set(&mut all).await.is_empty());
    assert!(next_set(&mut pacino).await.is_empty());

    storage
        .upsert(&movie("tt0068646", "The Godfather", "Marlon Brando, Al Pacino"))
        .await
        .expect("upsert");

    assert_eq!(ids(&next_set(&mut all).await), ["tt0068646"]);
    assert_eq!(ids(&next_set(&mut pacino).await), ["tt0068646"]);

    storage
        .upsert(&movie("tt0133093", "The Matrix", "Keanu Reeves"))
        .await
        .expect("upsert");

    assert_eq!(ids(&next_set(&mut all).await), ["tt0068646", "tt0133093"]);
    assert_eq!(ids(&next_set(&mut pacino).await), ["tt0068646"]);
}

#[tokio::test]
async fn live_query_ordering_is_stable_without_writes() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .upsert_many(&predefined_movies())
        .await
        .expect("seed");

    let first = next_set(&mut storage.all_movies()).await;
    let second = next_set(&mut storage.all_movies()).await;
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn failed_batch_leaves_no_partial_rows() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    sqlx::query(
        "CREATE TRIGGER reject_poison BEFORE INSERT ON movies
         WHEN NEW.imdb_id = 'tt-poison'
         BEGIN SELECT RAISE(ABORT, 'poisoned row'); END",
    )
    .execute(storage.pool())
    .await
    .expect("trigger");

    let err = storage
        .upsert_many(&[
            movie("tt1", "Good", "Someone"),
            movie("tt-poison", "Bad", "Someone"),
        ])
        .await
        .expect_err("batch must fail");
    assert!(matches!(err, StorageError::Sqlx(_)));

    assert!(storage.find_by_id("tt1").await.expect("find").is_none());
    assert!(next_set(&mut storage.all_movies()).await.is_empty());
}

#[tokio::test]
async fn concurrent_upserts_on_disjoint_keys_all_land() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    let writers: Vec<_> = (0..10)
        .map(|n| {
            let storage = storage.clone();
            tokio::spawn(async move {
                let id = format!("tt{n:07}");
                if n % 2 == 0 {
                    storage.upsert(&movie(&id, "Single", "Actor")).await
                } else {
                    storage
                        .upsert_many(&[movie(&id, "Batch", "Actor")])
                        .await
                }
            })
        })
        .collect();
    for writer in writers {
        writer.await.expect("join").expect("write");
    }

    let movies = next_set(&mut storage.all_movies()).await;
    assert_eq!(movies.len(), 10);
}

#[tokio::test]
async fn closed_store_reports_storage_error() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.close().await;

    let err = storage
        .upsert(&movie("tt1", "Late", "Nobody"))
        .await
        .expect_err("closed pool");
    assert!(matches!(err, StorageError::Sqlx(sqlx::Error::PoolClosed)));
}

#[test]
fn escapes_like_metacharacters() {
    assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
    assert_eq!(escape_like("Pacino"), "Pacino");
}

#[test]
fn resolves_sqlite_paths() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/movies.db?mode=rwc"),
        Some(PathBuf::from("./data/movies.db"))
    );
    assert_eq!(sqlite_path("postgres://localhost/movies"), None);
}
