use super::RosterStore;
use crate::error::RosterResult;
use crate::roster::{RevenueMap, RosterSnapshot, WeekKey, WeekRecord};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Roster store kept in a single JSON document on disk
#[derive(Debug)]
pub struct FileRosterStore {
    path: PathBuf,
    // Held across load+save so puts never interleave
    lock: Mutex<()>,
}

impl FileRosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> RosterResult<BTreeMap<WeekKey, WeekRecord>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Roster file {} does not exist yet", self.path.display());
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, weeks: &BTreeMap<WeekKey, WeekRecord>) -> RosterResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(weeks)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl RosterStore for FileRosterStore {
    async fn get_week(&self, week: &WeekKey) -> RosterResult<Option<WeekRecord>> {
        let _guard = self.lock.lock().await;
        let mut weeks = self.load().await?;
        Ok(weeks.remove(week))
    }

    async fn put_week(
        &self,
        week: &WeekKey,
        snapshot: &RosterSnapshot,
        revenue: &RevenueMap,
    ) -> RosterResult<()> {
        let _guard = self.lock.lock().await;
        let mut weeks = self.load().await?;
        weeks.insert(
            *week,
            WeekRecord::new(*week, snapshot.clone(), revenue.clone()),
        );
        self.save(&weeks).await?;

        info!(
            "Stored roster for week {} in {}",
            week,
            self.path.display()
        );
        Ok(())
    }

    async fn list_weeks(&self) -> RosterResult<Vec<WeekKey>> {
        let _guard = self.lock.lock().await;
        let weeks = self.load().await?;
        Ok(weeks.into_keys().collect())
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
