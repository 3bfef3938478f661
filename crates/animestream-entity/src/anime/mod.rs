//! Anime catalog entities.

pub mod model;

pub use model::{Anime, AnimeDetail, AnimeSummary, Episode, EpisodeSummary, NewAnime, NewEpisode};
