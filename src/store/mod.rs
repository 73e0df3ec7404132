mod file;
mod memory;
mod redis_store;

pub use file::FileRosterStore;
pub use memory::InMemoryRosterStore;
pub use redis_store::RedisRosterStore;

use crate::error::RosterResult;
use crate::roster::{RevenueMap, RosterSnapshot, WeekKey, WeekRecord};
use async_trait::async_trait;

/// Redis keys for the roster cache
pub mod keys {
    use crate::roster::WeekKey;

    pub const WEEK_INDEX: &str = "roster:weeks";
    pub const WEEK_PREFIX: &str = "roster:week:";
    pub const REVENUE_PREFIX: &str = "roster:revenue:";

    pub fn week_key(week: &WeekKey) -> String {
        format!("{}{}", WEEK_PREFIX, week)
    }

    pub fn revenue_key(week: &WeekKey) -> String {
        format!("{}{}", REVENUE_PREFIX, week)
    }
}

/// Storage for one roster snapshot and revenue map per week
#[async_trait]
pub trait RosterStore: Send + Sync + 'static {
    /// Stored data for a week, `None` if the week was never written
    async fn get_week(&self, week: &WeekKey) -> RosterResult<Option<WeekRecord>>;

    /// Replace everything stored for a week
    async fn put_week(
        &self,
        week: &WeekKey,
        snapshot: &RosterSnapshot,
        revenue: &RevenueMap,
    ) -> RosterResult<()>;

    /// All stored weeks, oldest first
    async fn list_weeks(&self) -> RosterResult<Vec<WeekKey>>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::keys;
    use crate::roster::WeekKey;

    #[test]
    fn test_redis_keys_use_monday() {
        let week: WeekKey = "2024-05-09".parse().unwrap();
        assert_eq!(keys::week_key(&week), "roster:week:2024-05-06");
        assert_eq!(keys::revenue_key(&week), "roster:revenue:2024-05-06");
    }
}
