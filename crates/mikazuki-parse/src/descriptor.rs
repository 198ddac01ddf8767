use serde::{Deserialize, Serialize};

/// Season/episode structure extracted from a release title.
///
/// At most one of the episode fields is authoritative: a non-empty
/// `episodes` list wins over `begin_episode`/`end_episode`, and a
/// season with no episode information means the release spans the
/// whole season. All fields absent is a valid result meaning no
/// structure could be inferred from the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDescriptor {
    /// Season number, if present (e.g., `S02` → 2).
    pub season: Option<u32>,
    /// Explicit episode numbers (e.g., `S01E03E04` → [3, 4]).
    pub episodes: Vec<u32>,
    /// First episode of a range (e.g., `E01-E12` → 1).
    pub begin_episode: Option<u32>,
    /// Last episode of a range, inclusive (e.g., `E01-E12` → 12).
    pub end_episode: Option<u32>,
}

impl EpisodeDescriptor {
    /// Whether any episode-level information was parsed (list or range).
    pub fn has_episode_info(&self) -> bool {
        !self.episodes.is_empty() || self.begin_episode.is_some()
    }

    /// Whether nothing at all was parsed from the title.
    pub fn is_empty(&self) -> bool {
        self.season.is_none() && !self.has_episode_info()
    }
}
