use super::RosterStore;
use crate::error::RosterResult;
use crate::roster::{RevenueMap, RosterSnapshot, WeekKey, WeekRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory roster store, used for tests and as the Redis fallback
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    weeks: RwLock<HashMap<WeekKey, WeekRecord>>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterStore for InMemoryRosterStore {
    async fn get_week(&self, week: &WeekKey) -> RosterResult<Option<WeekRecord>> {
        let weeks = self.weeks.read().await;
        Ok(weeks.get(week).cloned())
    }

    async fn put_week(
        &self,
        week: &WeekKey,
        snapshot: &RosterSnapshot,
        revenue: &RevenueMap,
    ) -> RosterResult<()> {
        let mut weeks = self.weeks.write().await;
        weeks.insert(
            *week,
            WeekRecord::new(*week, snapshot.clone(), revenue.clone()),
        );
        Ok(())
    }

    async fn list_weeks(&self) -> RosterResult<Vec<WeekKey>> {
        let weeks = self.weeks.read().await;
        let mut keys: Vec<WeekKey> = weeks.keys().copied().collect();
        keys.sort();
        Ok(keys)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
