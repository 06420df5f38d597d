use anyhow::Result;

use crate::fallback::search_fallback;
use crate::models::FoodRecord;

/// Result of a food search, tagged by where the records came from.
///
/// `Fallback` marks results served from the built-in sample table; the
/// API layer surfaces that as `isMock: true` so clients can show a
/// staleness hint.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Live(Vec<FoodRecord>),
    Fallback(Vec<FoodRecord>),
}

impl SearchOutcome {
    #[must_use]
    pub fn records(&self) -> &[FoodRecord] {
        match self {
            Self::Live(r) | Self::Fallback(r) => r,
        }
    }

    #[must_use]
    pub fn into_records(self) -> Vec<FoodRecord> {
        match self {
            Self::Live(r) | Self::Fallback(r) => r,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Fold a remote lookup result into a search outcome.
///
/// Any remote error degrades to the sample table; a successful but empty
/// remote response passes through as live (the upstream genuinely had no
/// match, which is not an outage).
#[must_use]
pub fn resolve(remote: Result<Vec<FoodRecord>>, query: &str, stamp_ms: i64) -> SearchOutcome {
    match remote {
        Ok(records) => SearchOutcome::Live(records),
        Err(err) => {
            eprintln!("nutrition lookup failed, serving sample data: {err:#}");
            SearchOutcome::Fallback(search_fallback(query, stamp_ms))
        }
    }
}
