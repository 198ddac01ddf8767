use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::PredicateEvaluator;
use crate::error::MikazukiError;
use crate::models::CandidateTorrent;

/// Filter configuration applied to every candidate of a batch. The string
/// fields are matched case-insensitively against the release title; sizes
/// are bytes. Rule-group identifiers are carried through to the evaluator
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub quality: Option<String>,
    pub resolution: Option<String>,
    pub effect: Option<String>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub rule_groups: Vec<String>,
}

impl FilterCriteria {
    /// Parse a rule string: a JSON object, or comma-separated `key=value`
    /// pairs (`resolution=1080p,exclude=HDR`). Unparseable input yields the
    /// unconstrained criteria — a bad rule string must not fail a batch.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::default();
        }

        if let Ok(criteria) = serde_json::from_str::<Self>(input) {
            return criteria;
        }

        let mut criteria = Self::default();
        for pair in input.split(',') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "quality" => criteria.quality = Some(value.to_string()),
                "resolution" => criteria.resolution = Some(value.to_string()),
                "effect" => criteria.effect = Some(value.to_string()),
                "include" => criteria.include = Some(value.to_string()),
                "exclude" => criteria.exclude = Some(value.to_string()),
                "min_size" => criteria.min_size = value.parse().ok(),
                "max_size" => criteria.max_size = value.parse().ok(),
                "rule_groups" => {
                    criteria.rule_groups = value
                        .split(';')
                        .filter(|s| !s.is_empty())
                        .map(|s| s.trim().to_string())
                        .collect();
                }
                other => debug!(key = other, "unknown filter rule key, ignoring"),
            }
        }
        criteria
    }

    /// Whether no constraint is configured (every candidate passes).
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

/// Default predicate: substring and size checks against the raw title.
///
/// Named rule groups are owned by an external filter service; this
/// evaluator treats them as satisfied and only logs their presence.
pub struct CriteriaEvaluator;

impl PredicateEvaluator for CriteriaEvaluator {
    fn evaluate(
        &self,
        candidate: &CandidateTorrent,
        criteria: &FilterCriteria,
    ) -> Result<bool, MikazukiError> {
        let title = candidate.title.to_lowercase();

        for required in [
            &criteria.quality,
            &criteria.resolution,
            &criteria.effect,
            &criteria.include,
        ]
        .into_iter()
        .flatten()
        {
            if !required.is_empty() && !title.contains(&required.to_lowercase()) {
                return Ok(false);
            }
        }

        if let Some(excluded) = &criteria.exclude {
            if !excluded.is_empty() && title.contains(&excluded.to_lowercase()) {
                return Ok(false);
            }
        }

        // Size bounds apply only when the site reported a size.
        if let Some(size) = candidate.size {
            if criteria.min_size.is_some_and(|min| size < min) {
                return Ok(false);
            }
            if criteria.max_size.is_some_and(|max| size > max) {
                return Ok(false);
            }
        }

        if !criteria.rule_groups.is_empty() {
            debug!(
                title = %candidate.title,
                groups = ?criteria.rule_groups,
                "rule groups are evaluated externally, passing through"
            );
        }

        Ok(true)
    }
}
