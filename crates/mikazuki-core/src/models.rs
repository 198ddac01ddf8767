use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of media a subscription tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie => write!(f, "Movie"),
            Self::Series => write!(f, "Series"),
        }
    }
}

/// A standing request to acquire content matching a media identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub kind: MediaKind,
    pub year: Option<u32>,
    pub tmdb_id: Option<u64>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub total_episodes: Option<u32>,
}

/// Canonical subject of a subscription, resolved once per processing pass
/// and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaIdentity {
    pub title: String,
    pub kind: MediaKind,
    pub year: Option<u32>,
    pub tmdb_id: Option<u64>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub total_episodes: Option<u32>,
}

/// Where a candidate came from. Historical candidates always carry the
/// owning subscription id; fresh ones are attributed when matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Fresh,
    Historical { subscription_id: i64 },
}

impl Provenance {
    pub fn is_historical(&self) -> bool {
        matches!(self, Self::Historical { .. })
    }
}

/// One discovered or previously-downloaded download option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTorrent {
    /// Raw release title as listed by the site.
    pub title: String,
    /// Originating site name.
    pub site: String,
    /// Size in bytes, when the site reports one.
    pub size: Option<u64>,
    pub seeders: Option<u32>,
    pub link: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    pub provenance: Provenance,
}

impl CandidateTorrent {
    /// A fresh search result with just the fields the engine needs.
    pub fn fresh(title: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            site: site.into(),
            size: None,
            seeders: None,
            link: None,
            pub_date: None,
            provenance: Provenance::Fresh,
        }
    }

    /// A historical candidate owned by `subscription_id`.
    pub fn historical(
        title: impl Into<String>,
        site: impl Into<String>,
        subscription_id: i64,
    ) -> Self {
        Self {
            provenance: Provenance::Historical { subscription_id },
            ..Self::fresh(title, site)
        }
    }
}
