//! Conversions between provider JSON and the domain records.
//!
//! The provider answers every request with one JSON object whose `Response`
//! field tells a usable payload apart from an error payload. Replies are
//! decoded sentinel-first into [`ProviderReply`]; movie fields are never read
//! from a rejected payload.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    domain::{Movie, Rating, SearchItem},
    error::DecodeError,
};

pub const SUCCESS_SENTINEL: &str = "True";
pub const TITLE_REJECTED_DEFAULT: &str = "Unknown error";
pub const SEARCH_REJECTED_DEFAULT: &str = "No movies found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderReply<T> {
    Found(T),
    Rejected(String),
}

/// Builds a [`Movie`] from one provider object. Missing text fields become
/// `""`, a missing `totalSeasons` stays `None` and a missing `Ratings` array
/// becomes an empty list.
pub fn parse_movie(json: &Value) -> Result<Movie, DecodeError> {
    if !json.is_object() {
        return Err(DecodeError::NotAnObject("movie"));
    }
    let mut movie = Movie::deserialize(json)?;
    movie.ratings.get_or_insert_with(Vec::new);
    Ok(movie)
}

pub fn parse_search_item(json: &Value) -> Result<SearchItem, DecodeError> {
    if !json.is_object() {
        return Err(DecodeError::NotAnObject("search item"));
    }
    Ok(SearchItem::deserialize(json)?)
}

/// Column text for the `ratings` column. `None` and empty lists both encode
/// as `[]`.
pub fn encode_ratings(ratings: Option<&[Rating]>) -> String {
    let entries = ratings
        .unwrap_or_default()
        .iter()
        .map(|rating| json!({ "Source": rating.source, "Value": rating.value }))
        .collect();
    Value::Array(entries).to_string()
}

pub fn decode_ratings(text: &str) -> Result<Vec<Rating>, DecodeError> {
    let text = text.trim();
    if text.is_empty() || text == "[]" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(text)?)
}

pub fn decode_title_reply(body: &str) -> Result<ProviderReply<Movie>, DecodeError> {
    let json = parse_envelope(body)?;
    if !is_success(&json) {
        return Ok(ProviderReply::Rejected(rejection_message(
            &json,
            TITLE_REJECTED_DEFAULT,
        )));
    }
    parse_movie(&json).map(ProviderReply::Found)
}

pub fn decode_search_reply(body: &str) -> Result<ProviderReply<Vec<SearchItem>>, DecodeError> {
    let json = parse_envelope(body)?;
    let items = match json.get("Search") {
        Some(Value::Array(items)) if is_success(&json) => items,
        _ => {
            return Ok(ProviderReply::Rejected(rejection_message(
                &json,
                SEARCH_REJECTED_DEFAULT,
            )))
        }
    };
    items
        .iter()
        .map(parse_search_item)
        .collect::<Result<Vec<_>, _>>()
        .map(ProviderReply::Found)
}

fn parse_envelope(body: &str) -> Result<Value, DecodeError> {
    let json: Value = serde_json::from_str(body)?;
    if !json.is_object() {
        return Err(DecodeError::NotAnObject("provider reply"));
    }
    Ok(json)
}

fn is_success(json: &Value) -> bool {
    json.get("Response").and_then(Value::as_str) == Some(SUCCESS_SENTINEL)
}

fn rejection_message(json: &Value, default: &str) -> String {
    json.get("Error")
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Field deserializers that read provider scalars the forgiving way: `null`
/// becomes empty text, numbers and booleans keep their JSON spelling.
pub(crate) mod lenient {
    use serde::{de::Error as _, Deserialize, Deserializer};
    use serde_json::Value;

    use crate::domain::Rating;

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => String::new(),
            Value::String(text) => text,
            other => other.to_string(),
        })
    }

    pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        })
    }

    pub fn ratings<'de, D>(deserializer: D) -> Result<Option<Vec<Rating>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Anything but an array (null, "N/A", an object) reads as no ratings.
        match Value::deserialize(deserializer)? {
            Value::Array(entries) => serde_json::from_value::<Vec<Rating>>(Value::Array(entries))
                .map(Some)
                .map_err(D::Error::custom),
            _ => Ok(Some(Vec::new())),
        }
    }
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
