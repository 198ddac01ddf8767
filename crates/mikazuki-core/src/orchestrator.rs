use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::criteria::FilterCriteria;
use crate::engine::{self, PredicateEvaluator};
use crate::models::{CandidateTorrent, MediaIdentity, Subscription};
use crate::traits::{CandidateSearch, DownloadHistory, MediaResolver, SubscriptionStore};

/// Parameters for one batch run.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Subscriptions to process; empty means all.
    pub subscription_ids: Vec<i64>,
    /// Site scope passed to the search supplier; empty means all.
    pub sites: Vec<String>,
    pub criteria: FilterCriteria,
    /// Gates the historical-admission phase and coverage skipping.
    pub prioritize_downloaded: bool,
    /// Subscriptions processed in parallel. They share no state, so this
    /// is purely a throughput knob; 1 means sequential.
    pub max_concurrency: usize,
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self {
            subscription_ids: Vec::new(),
            sites: Vec::new(),
            criteria: FilterCriteria::default(),
            prioritize_downloaded: true,
            max_concurrency: 1,
        }
    }
}

impl BatchRequest {
    /// A request carrying the configured defaults.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            sites: config.search.sites.clone(),
            criteria: FilterCriteria::parse(&config.filter.default_rules),
            prioritize_downloaded: config.engine.prioritize_downloaded,
            max_concurrency: config.engine.max_concurrency.max(1),
            ..Self::default()
        }
    }
}

/// Accepted candidates for one subscription that resolved successfully.
/// Present even when no candidate survived filtering.
#[derive(Debug, Clone)]
pub struct SubscriptionReport {
    pub subscription_id: i64,
    pub identity: MediaIdentity,
    pub accepted: Vec<CandidateTorrent>,
}

/// Aggregated result of a batch run. Never an error: a failed subscription
/// is logged and absent, and the worst outcome is an empty batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub reports: Vec<SubscriptionReport>,
    pub accepted_total: usize,
}

impl BatchOutcome {
    /// The resolved identities, one per subscription that did not fail
    /// resolution.
    pub fn identities(&self) -> impl Iterator<Item = &MediaIdentity> {
        self.reports.iter().map(|r| &r.identity)
    }
}

/// Run the dedup/filter engine across a batch of subscriptions.
///
/// Per subscription: resolve the identity, fetch fresh and historical
/// candidates, run the engine, accumulate. Every failure is per-subscription
/// (or per-supplier): logged, skipped, and the batch continues. Subscriptions
/// share no mutable state, so they are processed concurrently up to
/// `max_concurrency`; output order between subscriptions is unspecified but
/// results stay grouped per subscription.
pub async fn process_batch<S, R, C, H>(
    store: &S,
    resolver: &R,
    search: &C,
    history: &H,
    evaluator: &dyn PredicateEvaluator,
    request: &BatchRequest,
) -> BatchOutcome
where
    S: SubscriptionStore,
    R: MediaResolver,
    C: CandidateSearch,
    H: DownloadHistory,
{
    let subscriptions = match fetch_subscriptions(store, request).await {
        Ok(subs) => subs,
        Err(e) => {
            warn!(error = %e, "could not load subscriptions, returning empty batch");
            return BatchOutcome::default();
        }
    };
    if subscriptions.is_empty() {
        info!("no subscriptions to process");
        return BatchOutcome::default();
    }

    let reports: Vec<SubscriptionReport> = stream::iter(subscriptions)
        .map(|sub| process_one(resolver, search, history, evaluator, request, sub))
        .buffer_unordered(request.max_concurrency.max(1))
        .filter_map(|report| async move { report })
        .collect()
        .await;

    let accepted_total = reports.iter().map(|r| r.accepted.len()).sum();
    info!(
        subscriptions = reports.len(),
        accepted = accepted_total,
        "batch complete"
    );
    BatchOutcome {
        reports,
        accepted_total,
    }
}

async fn fetch_subscriptions<S: SubscriptionStore>(
    store: &S,
    request: &BatchRequest,
) -> Result<Vec<Subscription>, S::Error> {
    if request.subscription_ids.is_empty() {
        store.list().await
    } else {
        store.get(&request.subscription_ids).await
    }
}

/// Resolve → fetch → engine for one subscription. Returns `None` only when
/// identity resolution fails; supplier failures degrade to empty candidate
/// sets so the subscription still yields a (possibly empty) report.
async fn process_one<R, C, H>(
    resolver: &R,
    search: &C,
    history: &H,
    evaluator: &dyn PredicateEvaluator,
    request: &BatchRequest,
    subscription: Subscription,
) -> Option<SubscriptionReport>
where
    R: MediaResolver,
    C: CandidateSearch,
    H: DownloadHistory,
{
    let identity = match resolver.resolve(&subscription).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!(
                subscription = subscription.id,
                name = %subscription.name,
                error = %e,
                "identity resolution failed, skipping subscription"
            );
            return None;
        }
    };

    let fresh = match search.search(&identity, &request.sites).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(
                subscription = subscription.id,
                title = %identity.title,
                error = %e,
                "search failed, continuing with no fresh candidates"
            );
            Vec::new()
        }
    };

    let historical = match history.fetch(&identity, subscription.id).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(
                subscription = subscription.id,
                title = %identity.title,
                error = %e,
                "history lookup failed, continuing with no historical candidates"
            );
            Vec::new()
        }
    };

    let accepted = engine::process_subscription(
        &identity,
        &fresh,
        &historical,
        &request.criteria,
        evaluator,
        request.prioritize_downloaded,
    );

    Some(SubscriptionReport {
        subscription_id: subscription.id,
        identity,
        accepted,
    })
}
