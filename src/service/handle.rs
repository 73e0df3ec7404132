use super::actor::{RosterActor, RosterActorHandle};
use crate::error::RosterResult;
use crate::roster::{
    RevenueMap, RosterSnapshot, SeedBook, ShiftEdit, StaffDirectory, WeekKey, WeekRecord, Weekday,
    WeeklyReport,
};
use crate::store::RosterStore;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the roster actor
#[derive(Clone)]
pub struct RosterHandle {
    actor_handle: RosterActorHandle,
    staff: Arc<StaffDirectory>,
    _actor_task: Arc<JoinHandle<()>>,
}

impl RosterHandle {
    /// Create a new RosterHandle and spawn the actor
    pub fn new(store: Arc<dyn RosterStore>, staff: StaffDirectory, seeds: SeedBook) -> Self {
        let staff = Arc::new(staff);

        // Create the actor and get its handle
        let (mut actor, handle) = RosterActor::new(store, Arc::clone(&staff), Arc::new(seeds));

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            staff,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Staff directory the roster is built from
    pub fn staff(&self) -> &StaffDirectory {
        &self.staff
    }

    /// Stored data for a week, `None` if it was never initialized
    pub async fn get_week(&self, week: WeekKey) -> RosterResult<Option<WeekRecord>> {
        self.actor_handle.get_week(week).await
    }

    /// Replace a week's roster and revenue
    pub async fn put_week(
        &self,
        week: WeekKey,
        snapshot: RosterSnapshot,
        revenue: RevenueMap,
    ) -> RosterResult<()> {
        self.actor_handle.put_week(week, snapshot, revenue).await
    }

    /// Reset a week to its seeded or empty roster
    pub async fn initialize_week(&self, week: WeekKey) -> RosterResult<WeekRecord> {
        self.actor_handle.initialize_week(week).await
    }

    /// Stored week, initializing it first if needed
    pub async fn load_or_initialize(&self, week: WeekKey) -> RosterResult<WeekRecord> {
        self.actor_handle.load_or_initialize(week).await
    }

    /// Change one shift cell and persist the week
    pub async fn edit_shift(&self, week: WeekKey, edit: ShiftEdit) -> RosterResult<WeekRecord> {
        self.actor_handle.edit_shift(week, edit).await
    }

    /// Set one day's revenue and persist the week
    pub async fn set_revenue(
        &self,
        week: WeekKey,
        day: Weekday,
        amount: f64,
    ) -> RosterResult<WeekRecord> {
        self.actor_handle.set_revenue(week, day, amount).await
    }

    /// Hours, wages and labor cost for a week
    pub async fn report(&self, week: WeekKey) -> RosterResult<WeeklyReport> {
        self.actor_handle.report(week).await
    }

    /// All stored weeks, oldest first
    pub async fn list_weeks(&self) -> RosterResult<Vec<WeekKey>> {
        self.actor_handle.list_weeks().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> RosterResult<()> {
        self.actor_handle.shutdown().await
    }
}
