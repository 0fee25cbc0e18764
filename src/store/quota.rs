//! Daily per-owner request quota.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

use crate::error::DeepSearchError;

/// Default requests per owner per calendar day.
pub const DEFAULT_DAILY_LIMIT: u32 = 100;

struct DayCount {
    day: NaiveDate,
    count: u32,
}

/// Counts requests per owner per UTC calendar day and rejects once the limit
/// is reached. Admins bypass the limit entirely.
pub struct DailyQuota {
    limit: u32,
    counts: Mutex<HashMap<String, DayCount>>,
}

impl Default for DailyQuota {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT)
    }
}

impl DailyQuota {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Admit one request for `owner_id`, or reject with a quota error.
    ///
    /// Counting and the limit check happen under one lock, so concurrent
    /// callers cannot slip past the limit together.
    pub fn check_and_record(&self, owner_id: &str, is_admin: bool) -> Result<(), DeepSearchError> {
        if is_admin {
            return Ok(());
        }
        let today = Utc::now().date_naive();
        let mut counts = self
            .counts
            .lock()
            .map_err(|_| DeepSearchError::Persistence("quota lock poisoned".to_string()))?;
        let entry = counts.entry(owner_id.to_string()).or_insert(DayCount {
            day: today,
            count: 0,
        });
        if entry.day != today {
            entry.day = today;
            entry.count = 0;
        }
        if entry.count >= self.limit {
            tracing::warn!(owner_id, limit = self.limit, "daily quota exceeded");
            return Err(DeepSearchError::QuotaExceeded {
                owner_id: owner_id.to_string(),
            });
        }
        entry.count += 1;
        Ok(())
    }
}
