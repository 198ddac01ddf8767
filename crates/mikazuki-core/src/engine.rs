use tracing::{debug, info, warn};

use crate::coverage::CoverageSet;
use crate::criteria::FilterCriteria;
use crate::error::MikazukiError;
use crate::models::{CandidateTorrent, MediaIdentity};

/// Pass/fail check of one candidate against the configured criteria.
///
/// Must be pure with respect to engine state: it may log or call out, but
/// it never sees or mutates the coverage set.
pub trait PredicateEvaluator: Send + Sync {
    fn evaluate(
        &self,
        candidate: &CandidateTorrent,
        criteria: &FilterCriteria,
    ) -> Result<bool, MikazukiError>;
}

/// Resolve which candidates of one subscription should be acted upon.
///
/// Two phases, strictly ordered:
///
/// 1. Historical admission (only when `prioritize_downloaded`): each
///    historical candidate runs through the evaluator; passing ones are
///    included in the output and their episode structure is recorded as
///    coverage. Failing ones contribute nothing — a download that no longer
///    meets the rules must not suppress fresh candidates that do.
/// 2. Fresh admission: each fresh candidate is skipped without an evaluator
///    call if every content unit it offers is already covered; otherwise it
///    is evaluated and included on pass.
///
/// With `prioritize_downloaded` disabled, coverage stays empty and
/// historical candidates are evaluated exactly like fresh ones.
///
/// Candidate order within each phase is preserved. A parse or evaluator
/// failure drops that one candidate and processing continues.
pub fn process_subscription(
    identity: &MediaIdentity,
    fresh: &[CandidateTorrent],
    historical: &[CandidateTorrent],
    criteria: &FilterCriteria,
    evaluator: &dyn PredicateEvaluator,
    prioritize_downloaded: bool,
) -> Vec<CandidateTorrent> {
    let mut coverage = CoverageSet::new();
    let mut accepted = Vec::new();

    if prioritize_downloaded {
        for candidate in historical {
            match evaluator.evaluate(candidate, criteria) {
                Ok(true) => {
                    let descriptor = mikazuki_parse::parse(&candidate.title);
                    coverage.record(identity.kind, &descriptor);
                    accepted.push(candidate.clone());
                }
                Ok(false) => {
                    debug!(title = %candidate.title, "historical candidate fails criteria, no coverage");
                }
                Err(e) => {
                    warn!(title = %candidate.title, error = %e, "evaluator failed for historical candidate, dropping it");
                }
            }
        }
        debug!(
            title = %identity.title,
            covered = coverage.len(),
            "historical admission complete"
        );
    } else {
        // Historical candidates get no special treatment: same evaluation
        // as fresh ones, no coverage recorded.
        for candidate in historical {
            match evaluator.evaluate(candidate, criteria) {
                Ok(true) => accepted.push(candidate.clone()),
                Ok(false) => {}
                Err(e) => {
                    warn!(title = %candidate.title, error = %e, "evaluator failed for historical candidate, dropping it");
                }
            }
        }
    }

    for candidate in fresh {
        if prioritize_downloaded {
            let descriptor = mikazuki_parse::parse(&candidate.title);
            if coverage.is_fully_covered(identity.kind, &descriptor) {
                debug!(title = %candidate.title, "fully covered by downloaded content, skipping");
                continue;
            }
        }
        match evaluator.evaluate(candidate, criteria) {
            Ok(true) => accepted.push(candidate.clone()),
            Ok(false) => {}
            Err(e) => {
                warn!(title = %candidate.title, error = %e, "evaluator failed for fresh candidate, dropping it");
            }
        }
    }

    info!(
        title = %identity.title,
        fresh = fresh.len(),
        historical = historical.len(),
        accepted = accepted.len(),
        "subscription processed"
    );
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;

    /// Evaluator that passes everything.
    struct AcceptAll;

    impl PredicateEvaluator for AcceptAll {
        fn evaluate(
            &self,
            _candidate: &CandidateTorrent,
            _criteria: &FilterCriteria,
        ) -> Result<bool, MikazukiError> {
            Ok(true)
        }
    }

    /// Evaluator that rejects titles containing a substring.
    struct RejectContaining(&'static str);

    impl PredicateEvaluator for RejectContaining {
        fn evaluate(
            &self,
            candidate: &CandidateTorrent,
            _criteria: &FilterCriteria,
        ) -> Result<bool, MikazukiError> {
            Ok(!candidate.title.contains(self.0))
        }
    }

    /// Evaluator that errors on titles containing a substring.
    struct ErrorContaining(&'static str);

    impl PredicateEvaluator for ErrorContaining {
        fn evaluate(
            &self,
            candidate: &CandidateTorrent,
            _criteria: &FilterCriteria,
        ) -> Result<bool, MikazukiError> {
            if candidate.title.contains(self.0) {
                Err(MikazukiError::Filter("backend unavailable".into()))
            } else {
                Ok(true)
            }
        }
    }

    fn series_identity() -> MediaIdentity {
        MediaIdentity {
            title: "Show".into(),
            kind: MediaKind::Series,
            year: Some(2024),
            tmdb_id: None,
            season: Some(1),
            episode: None,
            total_episodes: Some(12),
        }
    }

    fn titles(candidates: &[CandidateTorrent]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_covered_fresh_candidate_is_skipped() {
        let identity = series_identity();
        let historical = vec![CandidateTorrent::historical("Show.S01E01.1080p", "site", 1)];
        let fresh = vec![CandidateTorrent::fresh("Show.S01E01.1080p", "site")];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &AcceptAll,
            true,
        );
        assert_eq!(titles(&out), vec!["Show.S01E01.1080p"]);
        assert!(out[0].provenance.is_historical());
    }

    #[test]
    fn test_prioritization_disabled_evaluates_everything() {
        let identity = series_identity();
        let historical = vec![CandidateTorrent::historical("Show.S01E01.1080p", "site", 1)];
        let fresh = vec![CandidateTorrent::fresh("Show.S01E01.1080p", "site")];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &AcceptAll,
            false,
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_failing_historical_contributes_no_coverage() {
        let identity = series_identity();
        // Historical E01 fails the predicate: excluded from output and the
        // fresh E01 must still be evaluated (and pass) normally.
        let historical = vec![CandidateTorrent::historical("Show.S01E01.720p", "site", 1)];
        let fresh = vec![CandidateTorrent::fresh("Show.S01E01.1080p", "site")];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &RejectContaining("720p"),
            true,
        );
        assert_eq!(titles(&out), vec!["Show.S01E01.1080p"]);
        assert!(!out[0].provenance.is_historical());
    }

    #[test]
    fn test_net_new_content_is_kept() {
        let identity = series_identity();
        let historical = vec![CandidateTorrent::historical("Show.S01E01.1080p", "site", 1)];
        let fresh = vec![
            CandidateTorrent::fresh("Show.S01E01.1080p", "site"),
            CandidateTorrent::fresh("Show.S01E02.1080p", "site"),
        ];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &AcceptAll,
            true,
        );
        assert_eq!(
            titles(&out),
            vec!["Show.S01E01.1080p", "Show.S01E02.1080p"]
        );
        assert!(out[0].provenance.is_historical());
        assert!(!out[1].provenance.is_historical());
    }

    #[test]
    fn test_partial_overlap_is_not_skipped() {
        let identity = series_identity();
        // E01 downloaded; a batch offering E01-E03 still has net-new content.
        let historical = vec![CandidateTorrent::historical("Show.S01E01.1080p", "site", 1)];
        let fresh = vec![CandidateTorrent::fresh("Show.S01E01-E03.1080p", "site")];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &AcceptAll,
            true,
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_season_pack_covers_season_only_candidates() {
        let identity = series_identity();
        let historical = vec![CandidateTorrent::historical("Show.S01.COMPLETE.1080p", "site", 1)];
        let fresh = vec![
            // Season-only candidate: covered by the season token.
            CandidateTorrent::fresh("Show.S01.1080p.BluRay", "site"),
            // Episode candidate: distinct token space, not covered.
            CandidateTorrent::fresh("Show.S01E01.1080p", "site"),
        ];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &AcceptAll,
            true,
        );
        assert_eq!(
            titles(&out),
            vec!["Show.S01.COMPLETE.1080p", "Show.S01E01.1080p"]
        );
    }

    #[test]
    fn test_movies_are_never_deduplicated() {
        let identity = MediaIdentity {
            title: "Some Movie".into(),
            kind: MediaKind::Movie,
            year: Some(2020),
            tmdb_id: None,
            season: None,
            episode: None,
            total_episodes: None,
        };
        let historical = vec![CandidateTorrent::historical("Some.Movie.2020.1080p", "site", 1)];
        let fresh = vec![CandidateTorrent::fresh("Some.Movie.2020.1080p", "site")];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &AcceptAll,
            true,
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_evaluator_error_drops_only_that_candidate() {
        let identity = series_identity();
        let historical = vec![CandidateTorrent::historical("Show.S01E01.BROKEN", "site", 1)];
        let fresh = vec![
            CandidateTorrent::fresh("Show.S01E01.1080p", "site"),
            CandidateTorrent::fresh("Show.S01E02.BROKEN", "site"),
            CandidateTorrent::fresh("Show.S01E03.1080p", "site"),
        ];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &ErrorContaining("BROKEN"),
            true,
        );
        // Errored historical leaves no coverage, so fresh E01 survives too.
        assert_eq!(
            titles(&out),
            vec!["Show.S01E01.1080p", "Show.S01E03.1080p"]
        );
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Subscription for "Show" season 1, permit-all criteria.
        let identity = series_identity();
        let historical = vec![CandidateTorrent::historical("Show.S01E01.1080p", "site", 1)];
        let fresh = vec![
            CandidateTorrent::fresh("Show.S01E01.1080p", "site"),
            CandidateTorrent::fresh("Show.S01E02.1080p", "site"),
        ];

        let out = process_subscription(
            &identity,
            &fresh,
            &historical,
            &FilterCriteria::default(),
            &crate::criteria::CriteriaEvaluator,
            true,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "Show.S01E01.1080p");
        assert!(out[0].provenance.is_historical());
        assert_eq!(out[1].title, "Show.S01E02.1080p");
        assert!(!out[1].provenance.is_historical());
    }
}
