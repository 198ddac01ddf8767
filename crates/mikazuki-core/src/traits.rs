//! Trait definitions for the external collaborators of the batch
//! orchestrator.
//!
//! Identity resolution, site search, and download history are thin calls
//! into other services; the orchestrator consumes them behind these traits
//! so the dedup/filter core carries no hidden shared state and tests can
//! substitute in-memory suppliers.

use std::future::Future;

use crate::models::{CandidateTorrent, MediaIdentity, Subscription};

/// Source of subscription records.
pub trait SubscriptionStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All subscriptions.
    fn list(&self) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send;

    /// Subscriptions by explicit id list.
    fn get(
        &self,
        ids: &[i64],
    ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send;
}

/// Resolves a subscription record into its canonical media identity.
pub trait MediaResolver: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn resolve(
        &self,
        subscription: &Subscription,
    ) -> impl Future<Output = Result<MediaIdentity, Self::Error>> + Send;
}

/// Executes a site search for fresh candidates.
pub trait CandidateSearch: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search the given sites (empty = all configured) for candidates
    /// matching the identity. Results carry `Provenance::Fresh`.
    fn search(
        &self,
        identity: &MediaIdentity,
        sites: &[String],
    ) -> impl Future<Output = Result<Vec<CandidateTorrent>, Self::Error>> + Send;
}

/// Looks up previously-downloaded candidates for a subscription.
pub trait DownloadHistory: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Results carry `Provenance::Historical` with the owning
    /// `subscription_id`.
    fn fetch(
        &self,
        identity: &MediaIdentity,
        subscription_id: i64,
    ) -> impl Future<Output = Result<Vec<CandidateTorrent>, Self::Error>> + Send;
}
