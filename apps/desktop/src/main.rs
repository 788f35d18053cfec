mod config;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{MissingRemoteSource, MovieRemoteSource, MovieViewModel, OmdbClient};
use futures::StreamExt;
use shared::domain::Movie;
use storage::{MovieStream, Storage};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "movieapp", about = "Look up movies and keep a local catalogue")]
struct Cli {
    /// Config file; defaults to ./movieapp.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one movie by exact title.
    Title {
        title: String,
        /// Store the fetched movie in the local catalogue.
        #[arg(long)]
        save: bool,
    },
    /// Search the provider by title term.
    Search { term: String },
    /// Add the predefined movies to the local catalogue.
    Seed,
    /// Local movies whose cast contains the given name.
    Actor {
        name: String,
        #[arg(long)]
        watch: bool,
    },
    /// Every movie in the local catalogue.
    List {
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        settings.database_url = config::normalize_database_url(&url);
    }

    let storage = Storage::new(&settings.database_url)
        .await
        .with_context(|| format!("failed to open database '{}'", settings.database_url))?;

    let remote: Arc<dyn MovieRemoteSource> = if settings.api_key.is_empty() {
        warn!("no OMDb api key configured; remote lookups will fail");
        Arc::new(MissingRemoteSource)
    } else {
        Arc::new(OmdbClient::new(settings.omdb_config()).context("failed to build OMDb client")?)
    };

    let view_model = MovieViewModel::new(storage.clone(), remote);
    let outcome = run(cli.command, &view_model).await;
    storage.close().await;
    outcome
}

async fn run(command: Command, view_model: &MovieViewModel) -> Result<()> {
    match command {
        Command::Title { title, save } => {
            view_model.search_movie_by_title(&title).await;
            let state = view_model.snapshot();
            if let Some(err) = state.error {
                bail!(err);
            }
            let Some(movie) = state.current_movie else {
                bail!("no movie returned for '{title}'");
            };
            print!("{}", render::movie_card(&movie));
            if save {
                view_model.save_current_movie_to_db().await?;
                println!("saved {}", movie.imdb_id);
            }
        }
        Command::Search { term } => {
            view_model.search_movies_by_title_remote(&term).await;
            let state = view_model.snapshot();
            if let Some(err) = state.error {
                bail!(err);
            }
            for item in &state.search_results {
                println!("{}", render::search_row(item));
            }
        }
        Command::Seed => {
            view_model.add_predefined_movies_to_db().await?;
            println!("predefined movies added");
        }
        Command::Actor { name, watch: false } => {
            print_once(view_model.search_movies_by_actor(&name)).await?;
        }
        Command::Actor { name, watch: true } => watch_actor(view_model, &name).await?,
        Command::List { watch: false } => print_once(view_model.all_movies()).await?,
        Command::List { watch: true } => watch_stream(view_model.all_movies()).await?,
    }
    Ok(())
}

fn print_catalogue(movies: &[Movie]) {
    if movies.is_empty() {
        println!("(no movies)");
    }
    for movie in movies {
        println!("{}", render::catalogue_row(movie));
    }
}

async fn print_once(mut stream: MovieStream) -> Result<()> {
    let movies = stream
        .next()
        .await
        .context("catalogue query ended without results")??;
    print_catalogue(&movies);
    Ok(())
}

async fn watch_stream(mut stream: MovieStream) -> Result<()> {
    loop {
        tokio::select! {
            update = stream.next() => {
                let Some(update) = update else { return Ok(()) };
                println!("---");
                print_catalogue(&update?);
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

async fn watch_actor(view_model: &MovieViewModel, name: &str) -> Result<()> {
    let mut search = view_model.actor_search();
    let mut results = search.subscribe();
    search.set_query(name);
    loop {
        tokio::select! {
            changed = results.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let current = results.borrow_and_update().clone();
                if let Some(err) = current.error {
                    bail!(err);
                }
                if !current.loaded {
                    continue;
                }
                println!("--- {}", current.query);
                print_catalogue(&current.movies);
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}
