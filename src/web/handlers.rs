use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use super::AppState;
use crate::error::{validation_error, Error};
use crate::roster::wage::validate_rate;
use crate::roster::{
    compute_shift_wage, RevenueMap, RosterSnapshot, ShiftEdit, ShiftOutcome, StaffDirectory,
    WeekKey, WeekRecord, Weekday, WeeklyReport,
};

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn parse_week(date: &str) -> Result<WeekKey, ApiError> {
    Ok(date.parse::<WeekKey>()?)
}

// Bad JSON bodies answer with the same 400 shape as every other validation error
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| validation_error(&rejection.body_text()).into())
}

/// Body of a wage calculation request
#[derive(Debug, Deserialize)]
pub struct WageRequest {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    pub rate: f64,
}

/// Hours and pay for one shift plus how it was read
#[derive(Debug, Serialize)]
pub struct WageResponse {
    pub hours: f64,
    pub pay: f64,
    pub outcome: ShiftOutcome,
}

/// Body of a full week replacement
#[derive(Debug, Deserialize)]
pub struct PutWeekRequest {
    pub snapshot: RosterSnapshot,
    #[serde(default)]
    pub revenue: RevenueMap,
}

/// Body of a revenue update
#[derive(Debug, Deserialize)]
pub struct RevenueRequest {
    pub amount: f64,
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Staff directory
pub async fn staff_handler(State(state): State<AppState>) -> Json<StaffDirectory> {
    Json(state.roster.staff().clone())
}

/// Price one shift
pub async fn wage_handler(
    payload: Result<Json<WageRequest>, JsonRejection>,
) -> ApiResult<WageResponse> {
    let request = json_body(payload)?;
    validate_rate(request.rate)?;

    let outcome = compute_shift_wage(request.start.as_deref(), request.end.as_deref(), request.rate);
    let wage = outcome.wage();
    Ok(Json(WageResponse {
        hours: wage.hours,
        pay: wage.pay,
        outcome,
    }))
}

/// All stored weeks
pub async fn list_weeks_handler(State(state): State<AppState>) -> ApiResult<Vec<WeekKey>> {
    Ok(Json(state.roster.list_weeks().await?))
}

/// The current week in the configured timezone, initialized on first visit
pub async fn current_week_handler(State(state): State<AppState>) -> ApiResult<WeekRecord> {
    let now = Utc::now().with_timezone(&state.timezone);
    let week = WeekKey::current(&now);
    Ok(Json(state.roster.load_or_initialize(week).await?))
}

/// Stored week, 404 when it was never initialized
pub async fn get_week_handler(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<WeekRecord> {
    let week = parse_week(&date)?;
    match state.roster.get_week(week).await? {
        Some(record) => Ok(Json(record)),
        None => Err(Error::NotFound(format!("Week {} has not been initialized", week)).into()),
    }
}

/// Replace a week's roster and revenue
pub async fn put_week_handler(
    State(state): State<AppState>,
    Path(date): Path<String>,
    payload: Result<Json<PutWeekRequest>, JsonRejection>,
) -> ApiResult<WeekRecord> {
    let week = parse_week(&date)?;
    let request = json_body(payload)?;
    state
        .roster
        .put_week(week, request.snapshot.clone(), request.revenue.clone())
        .await?;
    info!("Week {} replaced", week);
    Ok(Json(WeekRecord::new(week, request.snapshot, request.revenue)))
}

/// Reset a week to its seeded or empty roster
pub async fn init_week_handler(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<WeekRecord> {
    let week = parse_week(&date)?;
    Ok(Json(state.roster.initialize_week(week).await?))
}

/// Change one shift cell
pub async fn edit_shift_handler(
    State(state): State<AppState>,
    Path(date): Path<String>,
    payload: Result<Json<ShiftEdit>, JsonRejection>,
) -> ApiResult<WeekRecord> {
    let week = parse_week(&date)?;
    let edit = json_body(payload)?;
    Ok(Json(state.roster.edit_shift(week, edit).await?))
}

/// Set one day's revenue
pub async fn set_revenue_handler(
    State(state): State<AppState>,
    Path((date, weekday)): Path<(String, String)>,
    payload: Result<Json<RevenueRequest>, JsonRejection>,
) -> ApiResult<WeekRecord> {
    let week = parse_week(&date)?;
    let day = weekday.parse::<Weekday>()?;
    let request = json_body(payload)?;
    Ok(Json(state.roster.set_revenue(week, day, request.amount).await?))
}

/// Weekly hours, wages and labor cost
pub async fn report_handler(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<WeeklyReport> {
    let week = parse_week(&date)?;
    Ok(Json(state.roster.report(week).await?))
}
