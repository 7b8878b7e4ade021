//! Movie module
//!
//! Read-only movie collection backing `GET /api/movies`.

pub mod models;
pub mod store;

pub use models::Movie;
pub use store::{MovieStore, SqliteMovieStore};

/// Maximum number of movies returned by one listing
pub const MOVIE_LIST_LIMIT: u32 = 400;
