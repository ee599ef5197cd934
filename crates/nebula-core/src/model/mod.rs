pub mod song;
pub mod views;

pub use song::{Song, NUMERIC_COLUMNS};
pub use views::{ArtistTrack, RecommendedTrack};
