use std::collections::HashSet;

use mikazuki_parse::EpisodeDescriptor;

use crate::models::MediaKind;

/// A unit of already-satisfied content. Season and episode tokens are
/// distinct spaces: recording a whole season does not mark its individual
/// episodes as covered, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverageToken {
    Episode(u32),
    Season(u32),
}

/// Per-subscription accumulator of satisfied content units. Created empty
/// at the start of a subscription's processing pass, additive only, and
/// discarded when the pass ends — it never crosses subscriptions.
#[derive(Debug, Default)]
pub struct CoverageSet {
    tokens: HashSet<CoverageToken>,
}

impl CoverageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the content units a descriptor implies. Idempotent. Non-series
    /// media never produce tokens.
    pub fn record(&mut self, kind: MediaKind, descriptor: &EpisodeDescriptor) {
        if kind != MediaKind::Series {
            return;
        }
        self.tokens.extend(expand(descriptor));
    }

    /// True only if every content unit the descriptor implies is already
    /// recorded. A descriptor with no inferable units is never covered, and
    /// non-series media are never covered (movies are not deduplicated by
    /// this mechanism).
    pub fn is_fully_covered(&self, kind: MediaKind, descriptor: &EpisodeDescriptor) -> bool {
        if kind != MediaKind::Series {
            return false;
        }
        let units = expand(descriptor);
        if units.is_empty() {
            return false;
        }
        units.iter().all(|t| self.tokens.contains(t))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Upper bound on materialized range length. Matches the parser's episode
/// cap; a hand-built descriptor claiming more episodes than any real
/// season must not allocate unboundedly.
const MAX_RANGE_EPISODES: u32 = 1999;

/// Expand a descriptor into coverage tokens using the precedence rule:
/// explicit episode list, else begin/end range (inclusive), else a single
/// season marker, else nothing.
fn expand(descriptor: &EpisodeDescriptor) -> Vec<CoverageToken> {
    if !descriptor.episodes.is_empty() {
        return descriptor
            .episodes
            .iter()
            .map(|&e| CoverageToken::Episode(e))
            .collect();
    }
    if let Some(begin) = descriptor.begin_episode {
        let end = descriptor
            .end_episode
            .filter(|&e| e >= begin)
            .unwrap_or(begin)
            .min(begin.saturating_add(MAX_RANGE_EPISODES - 1));
        return (begin..=end).map(CoverageToken::Episode).collect();
    }
    if let Some(season) = descriptor.season {
        return vec![CoverageToken::Season(season)];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episodes(list: &[u32]) -> EpisodeDescriptor {
        EpisodeDescriptor {
            episodes: list.to_vec(),
            ..Default::default()
        }
    }

    fn range(begin: u32, end: u32) -> EpisodeDescriptor {
        EpisodeDescriptor {
            begin_episode: Some(begin),
            end_episode: Some(end),
            ..Default::default()
        }
    }

    fn season_only(n: u32) -> EpisodeDescriptor {
        EpisodeDescriptor {
            season: Some(n),
            ..Default::default()
        }
    }

    #[test]
    fn test_recording_is_idempotent() {
        let mut set = CoverageSet::new();
        set.record(MediaKind::Series, &episodes(&[1, 2]));
        let first = set.len();
        set.record(MediaKind::Series, &episodes(&[1, 2]));
        assert_eq!(set.len(), first);
    }

    #[test]
    fn test_all_or_nothing_coverage() {
        let mut set = CoverageSet::new();
        set.record(MediaKind::Series, &episodes(&[1, 2]));

        assert!(!set.is_fully_covered(MediaKind::Series, &episodes(&[1, 2, 3])));
        assert!(set.is_fully_covered(MediaKind::Series, &episodes(&[1, 2])));
        assert!(set.is_fully_covered(MediaKind::Series, &episodes(&[1])));
    }

    #[test]
    fn test_range_expansion() {
        let mut set = CoverageSet::new();
        set.record(MediaKind::Series, &range(1, 4));
        assert_eq!(set.len(), 4);
        assert!(set.is_fully_covered(MediaKind::Series, &episodes(&[2, 3])));
        assert!(!set.is_fully_covered(MediaKind::Series, &range(3, 5)));
    }

    #[test]
    fn test_list_takes_precedence_over_range() {
        let mut set = CoverageSet::new();
        let d = EpisodeDescriptor {
            episodes: vec![7],
            begin_episode: Some(1),
            end_episode: Some(12),
            ..Default::default()
        };
        set.record(MediaKind::Series, &d);
        assert_eq!(set.len(), 1);
        assert!(set.is_fully_covered(MediaKind::Series, &episodes(&[7])));
    }

    #[test]
    fn test_season_and_episode_tokens_are_distinct() {
        let mut set = CoverageSet::new();
        set.record(MediaKind::Series, &season_only(1));
        assert!(!set.is_fully_covered(MediaKind::Series, &episodes(&[1])));
        assert!(set.is_fully_covered(MediaKind::Series, &season_only(1)));

        let mut set = CoverageSet::new();
        set.record(MediaKind::Series, &episodes(&[1]));
        assert!(!set.is_fully_covered(MediaKind::Series, &season_only(1)));
    }

    #[test]
    fn test_empty_descriptor_never_covered() {
        let mut set = CoverageSet::new();
        set.record(MediaKind::Series, &episodes(&[1]));
        assert!(!set.is_fully_covered(MediaKind::Series, &EpisodeDescriptor::default()));
    }

    #[test]
    fn test_movies_are_immune() {
        let mut set = CoverageSet::new();
        set.record(MediaKind::Movie, &episodes(&[1]));
        assert!(set.is_empty());

        set.record(MediaKind::Series, &episodes(&[1]));
        assert!(!set.is_fully_covered(MediaKind::Movie, &episodes(&[1])));
    }

    #[test]
    fn test_absurd_range_is_clamped() {
        let mut set = CoverageSet::new();
        set.record(MediaKind::Series, &range(1, u32::MAX));
        assert_eq!(set.len(), 1999);
        assert!(set.is_fully_covered(MediaKind::Series, &episodes(&[1999])));
        assert!(!set.is_fully_covered(MediaKind::Series, &episodes(&[2000])));
    }

    #[test]
    fn test_degenerate_range_is_single_episode() {
        let mut set = CoverageSet::new();
        set.record(
            MediaKind::Series,
            &EpisodeDescriptor {
                begin_episode: Some(5),
                end_episode: None,
                ..Default::default()
            },
        );
        assert!(set.is_fully_covered(MediaKind::Series, &episodes(&[5])));
        assert_eq!(set.len(), 1);
    }
}
