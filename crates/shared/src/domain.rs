use serde::{Deserialize, Serialize};

use crate::codec::lenient;

/// A movie or series record as returned by the metadata provider and kept in
/// the local store. Keys on the wire follow the provider's casing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    #[serde(rename = "imdbID", deserialize_with = "lenient::string")]
    pub imdb_id: String,
    #[serde(rename = "Title", deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(rename = "Year", deserialize_with = "lenient::string")]
    pub year: String,
    #[serde(rename = "Rated", deserialize_with = "lenient::string")]
    pub rated: String,
    #[serde(rename = "Released", deserialize_with = "lenient::string")]
    pub released: String,
    #[serde(rename = "Runtime", deserialize_with = "lenient::string")]
    pub runtime: String,
    #[serde(rename = "Genre", deserialize_with = "lenient::string")]
    pub genre: String,
    #[serde(rename = "Director", deserialize_with = "lenient::string")]
    pub director: String,
    #[serde(rename = "Writer", deserialize_with = "lenient::string")]
    pub writer: String,
    #[serde(rename = "Actors", deserialize_with = "lenient::string")]
    pub actors: String,
    #[serde(rename = "Plot", deserialize_with = "lenient::string")]
    pub plot: String,
    #[serde(rename = "Language", deserialize_with = "lenient::string")]
    pub language: String,
    #[serde(rename = "Country", deserialize_with = "lenient::string")]
    pub country: String,
    #[serde(rename = "Awards", deserialize_with = "lenient::string")]
    pub awards: String,
    #[serde(rename = "Ratings", deserialize_with = "lenient::ratings")]
    pub ratings: Option<Vec<Rating>>,
    #[serde(rename = "Metascore", deserialize_with = "lenient::string")]
    pub metascore: String,
    #[serde(rename = "imdbRating", deserialize_with = "lenient::string")]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes", deserialize_with = "lenient::string")]
    pub imdb_votes: String,
    #[serde(rename = "Type", deserialize_with = "lenient::string")]
    pub kind: String,
    /// Only present for episodic content.
    #[serde(
        rename = "totalSeasons",
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_seasons: Option<String>,
    #[serde(rename = "Response", deserialize_with = "lenient::string")]
    pub response: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rating {
    #[serde(rename = "Source", deserialize_with = "lenient::string")]
    pub source: String,
    #[serde(rename = "Value", deserialize_with = "lenient::string")]
    pub value: String,
}

impl Rating {
    pub fn new(source: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            value: value.into(),
        }
    }
}

/// One row of a provider search listing. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchItem {
    #[serde(rename = "Title", deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(rename = "Year", deserialize_with = "lenient::string")]
    pub year: String,
    #[serde(rename = "imdbID", deserialize_with = "lenient::string")]
    pub imdb_id: String,
    #[serde(rename = "Type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(rename = "Poster", deserialize_with = "lenient::string")]
    pub poster: String,
}
