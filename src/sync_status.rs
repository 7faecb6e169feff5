//! Freshness classification of the last successful order sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const JUST_SYNCED_MINUTES: i64 = 5;
const RECENT_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SyncStatus {
    Syncing,
    NeverSynced,
    JustSynced,
    /// Synced within the last hour.
    Recent { minutes_ago: i64 },
    Stale { minutes_ago: i64 },
}

impl SyncStatus {
    pub fn classify(
        last_sync: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        is_loading: bool,
    ) -> Self {
        if is_loading {
            return SyncStatus::Syncing;
        }
        let Some(last) = last_sync else {
            return SyncStatus::NeverSynced;
        };
        let minutes_ago = (now - last).num_minutes();
        if minutes_ago < JUST_SYNCED_MINUTES {
            SyncStatus::JustSynced
        } else if minutes_ago < RECENT_MINUTES {
            SyncStatus::Recent { minutes_ago }
        } else {
            SyncStatus::Stale { minutes_ago }
        }
    }

    pub fn label(&self) -> String {
        match self {
            SyncStatus::Syncing => "Syncing...".to_string(),
            SyncStatus::NeverSynced => "Never synced".to_string(),
            SyncStatus::JustSynced => "Just synced".to_string(),
            SyncStatus::Recent { minutes_ago } | SyncStatus::Stale { minutes_ago } => {
                relative_time(*minutes_ago)
            }
        }
    }
}

fn relative_time(minutes: i64) -> String {
    match minutes {
        m if m < 60 => format!("{m} minutes ago"),
        m if m < 120 => "about 1 hour ago".to_string(),
        m if m < 24 * 60 => format!("about {} hours ago", m / 60),
        m if m < 48 * 60 => "1 day ago".to_string(),
        m => format!("{} days ago", m / (24 * 60)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn loading_wins() {
        let status = SyncStatus::classify(Some(now()), now(), true);
        assert_eq!(status, SyncStatus::Syncing);
        assert_eq!(status.label(), "Syncing...");
    }

    #[test]
    fn never_synced_without_timestamp() {
        assert_eq!(SyncStatus::classify(None, now(), false), SyncStatus::NeverSynced);
    }

    #[test]
    fn thresholds() {
        let at = |mins| SyncStatus::classify(Some(now() - Duration::minutes(mins)), now(), false);
        assert_eq!(at(4), SyncStatus::JustSynced);
        assert_eq!(at(5), SyncStatus::Recent { minutes_ago: 5 });
        assert_eq!(at(59).label(), "59 minutes ago");
        assert_eq!(at(60), SyncStatus::Stale { minutes_ago: 60 });
        assert_eq!(at(180).label(), "about 3 hours ago");
        assert_eq!(at(3 * 24 * 60).label(), "3 days ago");
    }
}
