use std::sync::RwLock;

use chrono::Utc;

use crate::models::{DashboardSnapshot, JournalEntry};
use crate::services::analytics;

/// Holds the latest derived view of the journal. Registered as a store
/// observer, so every entry-list mutation recomputes the whole snapshot.
pub struct DashboardService {
    snapshot: RwLock<DashboardSnapshot>,
}

impl DashboardService {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(DashboardSnapshot::default()),
        }
    }

    pub fn refresh(&self, entries: &[JournalEntry]) {
        let now = Utc::now();
        let fresh = DashboardSnapshot {
            stats: analytics::mood_stats(entries, now.date_naive()),
            trend: analytics::mood_trend(entries),
            emotions: analytics::emotion_distribution(entries),
            weekly_sentiment: analytics::weekly_sentiment(entries),
            insights: analytics::wellness_insights(entries, now),
            updated_at: now.timestamp(),
        };
        if let Ok(mut snapshot) = self.snapshot.write() {
            *snapshot = fresh;
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot
            .read()
            .map(|snapshot| snapshot.clone())
            .unwrap_or_default()
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
