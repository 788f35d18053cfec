pub mod codec;
pub mod domain;
pub mod error;
pub mod seed;

pub use domain::{Movie, Rating, SearchItem};
pub use error::DecodeError;
