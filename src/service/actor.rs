use crate::error::{not_found_error, service_error, validation_error, RosterResult};
use crate::roster::models::{validate_amount, validate_revenue};
use crate::roster::time::TimeInput;
use crate::roster::{
    aggregate, initialize, RevenueMap, RosterSnapshot, SeedBook, ShiftEdit, StaffDirectory,
    WeekKey, WeekRecord, Weekday, WeeklyReport,
};
use crate::store::RosterStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

type Reply<T> = oneshot::Sender<RosterResult<T>>;

/// The roster actor that serializes every store access
pub struct RosterActor {
    store: Arc<dyn RosterStore>,
    staff: Arc<StaffDirectory>,
    seeds: Arc<SeedBook>,
    command_rx: mpsc::Receiver<RosterCommand>,
}

/// Commands that can be sent to the roster actor
pub enum RosterCommand {
    GetWeek(WeekKey, Reply<Option<WeekRecord>>),
    PutWeek(WeekKey, RosterSnapshot, RevenueMap, Reply<()>),
    InitializeWeek(WeekKey, Reply<WeekRecord>),
    LoadOrInitialize(WeekKey, Reply<WeekRecord>),
    EditShift(WeekKey, ShiftEdit, Reply<WeekRecord>),
    SetRevenue(WeekKey, Weekday, f64, Reply<WeekRecord>),
    Report(WeekKey, Reply<WeeklyReport>),
    ListWeeks(Reply<Vec<WeekKey>>),
    Shutdown,
}

/// Handle for communicating with the roster actor
#[derive(Clone)]
pub struct RosterActorHandle {
    command_tx: mpsc::Sender<RosterCommand>,
}

impl RosterActorHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> RosterCommand,
    ) -> RosterResult<T> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(command(response_tx))
            .await
            .map_err(|e| service_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .await
            .map_err(|_| service_error("Response channel closed"))?
    }

    pub async fn get_week(&self, week: WeekKey) -> RosterResult<Option<WeekRecord>> {
        self.request(|tx| RosterCommand::GetWeek(week, tx)).await
    }

    pub async fn put_week(
        &self,
        week: WeekKey,
        snapshot: RosterSnapshot,
        revenue: RevenueMap,
    ) -> RosterResult<()> {
        self.request(|tx| RosterCommand::PutWeek(week, snapshot, revenue, tx))
            .await
    }

    pub async fn initialize_week(&self, week: WeekKey) -> RosterResult<WeekRecord> {
        self.request(|tx| RosterCommand::InitializeWeek(week, tx))
            .await
    }

    pub async fn load_or_initialize(&self, week: WeekKey) -> RosterResult<WeekRecord> {
        self.request(|tx| RosterCommand::LoadOrInitialize(week, tx))
            .await
    }

    pub async fn edit_shift(&self, week: WeekKey, edit: ShiftEdit) -> RosterResult<WeekRecord> {
        self.request(|tx| RosterCommand::EditShift(week, edit, tx))
            .await
    }

    pub async fn set_revenue(
        &self,
        week: WeekKey,
        day: Weekday,
        amount: f64,
    ) -> RosterResult<WeekRecord> {
        self.request(|tx| RosterCommand::SetRevenue(week, day, amount, tx))
            .await
    }

    pub async fn report(&self, week: WeekKey) -> RosterResult<WeeklyReport> {
        self.request(|tx| RosterCommand::Report(week, tx)).await
    }

    pub async fn list_weeks(&self) -> RosterResult<Vec<WeekKey>> {
        self.request(RosterCommand::ListWeeks).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> RosterResult<()> {
        let _ = self.command_tx.send(RosterCommand::Shutdown).await;
        Ok(())
    }
}

impl RosterActor {
    /// Create a new actor and return its handle
    pub fn new(
        store: Arc<dyn RosterStore>,
        staff: Arc<StaffDirectory>,
        seeds: Arc<SeedBook>,
    ) -> (Self, RosterActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            store,
            staff,
            seeds,
            command_rx,
        };

        let handle = RosterActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Roster actor started on {} store", self.store.backend());

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RosterCommand::GetWeek(week, response_tx) => {
                    let _ = response_tx.send(self.store.get_week(&week).await);
                }
                RosterCommand::PutWeek(week, snapshot, revenue, response_tx) => {
                    let result = self.put_week(&week, &snapshot, &revenue).await;
                    let _ = response_tx.send(result);
                }
                RosterCommand::InitializeWeek(week, response_tx) => {
                    let _ = response_tx.send(self.initialize_week(&week).await);
                }
                RosterCommand::LoadOrInitialize(week, response_tx) => {
                    let _ = response_tx.send(self.load_or_initialize(&week).await);
                }
                RosterCommand::EditShift(week, edit, response_tx) => {
                    let _ = response_tx.send(self.edit_shift(&week, edit).await);
                }
                RosterCommand::SetRevenue(week, day, amount, response_tx) => {
                    let _ = response_tx.send(self.set_revenue(&week, day, amount).await);
                }
                RosterCommand::Report(week, response_tx) => {
                    let _ = response_tx.send(self.report(&week).await);
                }
                RosterCommand::ListWeeks(response_tx) => {
                    let _ = response_tx.send(self.store.list_weeks().await);
                }
                RosterCommand::Shutdown => {
                    info!("Roster actor shutting down");
                    break;
                }
            }
        }

        info!("Roster actor shut down");
    }

    async fn put_week(
        &self,
        week: &WeekKey,
        snapshot: &RosterSnapshot,
        revenue: &RevenueMap,
    ) -> RosterResult<()> {
        snapshot.validate()?;
        validate_revenue(revenue)?;
        self.store.put_week(week, snapshot, revenue).await
    }

    /// Fresh record for a week, not yet persisted
    fn fresh_record(&self, week: &WeekKey) -> WeekRecord {
        let snapshot = initialize(week, &self.staff, &self.seeds);
        WeekRecord::new(*week, snapshot, RevenueMap::new())
    }

    /// Stored record, or a fresh one when the week was never written
    async fn current_record(&self, week: &WeekKey) -> RosterResult<WeekRecord> {
        match self.store.get_week(week).await? {
            Some(record) => Ok(record),
            None => {
                debug!("Week {} not stored yet, starting from a fresh roster", week);
                Ok(self.fresh_record(week))
            }
        }
    }

    async fn save(&self, record: &WeekRecord) -> RosterResult<()> {
        self.store
            .put_week(&record.week, &record.snapshot, &record.revenue)
            .await
    }

    async fn initialize_week(&self, week: &WeekKey) -> RosterResult<WeekRecord> {
        let record = self.fresh_record(week);
        self.save(&record).await?;
        info!(
            "Initialized week {} with {} employees",
            week,
            record.snapshot.rows.len()
        );
        Ok(record)
    }

    async fn load_or_initialize(&self, week: &WeekKey) -> RosterResult<WeekRecord> {
        match self.store.get_week(week).await? {
            Some(record) => Ok(record),
            None => self.initialize_week(week).await,
        }
    }

    async fn edit_shift(&self, week: &WeekKey, edit: ShiftEdit) -> RosterResult<WeekRecord> {
        let start = normalize_cell(edit.start.as_deref(), "start")?;
        let end = normalize_cell(edit.end.as_deref(), "end")?;

        let mut record = self.current_record(week).await?;
        let row = record.snapshot.row_mut(&edit.employee).ok_or_else(|| {
            not_found_error(&format!(
                "Employee {} is not on the roster for week {}",
                edit.employee, week
            ))
        })?;

        let cell = row.cell_mut(edit.day);
        cell.start = start;
        cell.end = end;
        info!(
            "Week {}: {} on {} set to {}",
            week,
            edit.employee,
            edit.day,
            cell.format()
        );

        self.save(&record).await?;
        Ok(record)
    }

    async fn set_revenue(
        &self,
        week: &WeekKey,
        day: Weekday,
        amount: f64,
    ) -> RosterResult<WeekRecord> {
        validate_amount(day, amount)?;

        let mut record = self.current_record(week).await?;
        record.revenue.insert(day, amount);
        self.save(&record).await?;

        info!("Week {}: revenue for {} set to {:.2}", week, day, amount);
        Ok(record)
    }

    async fn report(&self, week: &WeekKey) -> RosterResult<WeeklyReport> {
        let record = self.current_record(week).await?;
        Ok(aggregate(&record.snapshot, &self.staff, &record.revenue))
    }
}

/// Normalize an edited cell: blank clears it, valid times become HH:MM
fn normalize_cell(raw: Option<&str>, field: &str) -> RosterResult<Option<String>> {
    match TimeInput::parse(raw) {
        TimeInput::Empty => Ok(None),
        TimeInput::Valid(time) => Ok(Some(time.to_string())),
        TimeInput::Malformed(text) => Err(validation_error(&format!(
            "Invalid {} time '{}', expected HH:MM",
            field, text
        ))),
    }
}
