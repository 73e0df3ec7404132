use super::{keys, RosterStore};
use crate::error::{store_error, RosterResult};
use crate::roster::{RevenueMap, RosterSnapshot, WeekKey, WeekRecord};
use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::{info, warn};

/// Redis-backed roster store
pub struct RedisRosterStore {
    client: RedisClient,
}

impl RedisRosterStore {
    /// Create a client for the given URL; connections are opened per call
    pub fn new(redis_url: &str) -> RosterResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = RedisClient::open(redis_url)
            .map_err(|e| store_error(&format!("Failed to create Redis client: {}", e)))?;

        Ok(Self { client })
    }

    /// Get a Redis connection from the client
    async fn get_connection(&self) -> RosterResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| store_error(&format!("Failed to connect to Redis: {}", e)))
    }
}

#[async_trait]
impl RosterStore for RedisRosterStore {
    async fn get_week(&self, week: &WeekKey) -> RosterResult<Option<WeekRecord>> {
        let mut conn = self.get_connection().await?;

        let snapshot_json: Option<String> = conn.get(keys::week_key(week)).await?;

        let Some(snapshot_json) = snapshot_json else {
            return Ok(None);
        };

        let revenue_json: Option<String> = conn.get(keys::revenue_key(week)).await?;

        let snapshot: RosterSnapshot = serde_json::from_str(&snapshot_json)?;
        let revenue: RevenueMap = match revenue_json {
            Some(json) => serde_json::from_str(&json)?,
            None => RevenueMap::new(),
        };

        Ok(Some(WeekRecord::new(*week, snapshot, revenue)))
    }

    async fn put_week(
        &self,
        week: &WeekKey,
        snapshot: &RosterSnapshot,
        revenue: &RevenueMap,
    ) -> RosterResult<()> {
        let mut conn = self.get_connection().await?;

        let snapshot_json = serde_json::to_string(snapshot)?;
        let revenue_json = serde_json::to_string(revenue)?;

        // Snapshot, revenue and index go in together
        let mut pipe = redis::pipe();
        pipe.atomic()
            .set(keys::week_key(week), snapshot_json)
            .ignore()
            .set(keys::revenue_key(week), revenue_json)
            .ignore()
            .sadd(keys::WEEK_INDEX, week.to_string())
            .ignore();

        let _: () = pipe.query_async(&mut conn).await?;

        info!(
            "Stored roster for week {} with {} rows",
            week,
            snapshot.rows.len()
        );
        Ok(())
    }

    async fn list_weeks(&self) -> RosterResult<Vec<WeekKey>> {
        let mut conn = self.get_connection().await?;

        let members: Vec<String> = conn.smembers(keys::WEEK_INDEX).await?;

        let mut weeks: Vec<WeekKey> = members
            .iter()
            .filter_map(|member| match member.parse::<WeekKey>() {
                Ok(week) => Some(week),
                Err(e) => {
                    warn!("Ignoring bad week index entry {}: {}", member, e);
                    None
                }
            })
            .collect();
        weeks.sort();
        weeks.dedup();

        Ok(weeks)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
