//! services/api/src/web/meetings.rs
//!
//! Handlers for the meeting scheduler. The booking form arrives as strings, the
//! way an HTML form posts it; parsing into typed fields happens here and
//! validation happens in the core scheduler.

use crate::web::{
    error::{ErrorResponse, HttpError},
    state::{run_blocking, AppState},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use portfolio_core::{
    domain::clock_time,
    scheduler::weekly_availability,
    Meeting, MeetingFormat, MeetingRequest, MeetingType, PortError, PortResult,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Duration in minutes. Forms post it as a string, scripts as a number.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(untagged)]
pub enum Minutes {
    Number(u32),
    Text(String),
}

impl Minutes {
    fn parse(&self) -> PortResult<Option<u32>> {
        match self {
            Minutes::Number(n) => Ok(Some(*n)),
            Minutes::Text(raw) if raw.trim().is_empty() => Ok(None),
            Minutes::Text(raw) => raw
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| PortError::Validation(format!("duration '{}' is not a number", raw))),
        }
    }
}

/// The booking form, used for both create and update.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(default)]
pub struct MeetingPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub meeting_type: String,
    pub format: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub duration: Option<Minutes>,
    pub topic: String,
}

impl MeetingPayload {
    /// Blank fields become `None` so the scheduler reports them as missing.
    /// Fields that are present but unparseable are rejected here.
    pub fn into_request(self) -> PortResult<MeetingRequest> {
        let meeting_type = non_blank(&self.meeting_type)
            .map(|raw| {
                raw.parse::<MeetingType>()
                    .map_err(|e| PortError::Validation(format!("type: {}", e)))
            })
            .transpose()?;
        let format = non_blank(&self.format)
            .map(|raw| {
                raw.parse::<MeetingFormat>()
                    .map_err(|e| PortError::Validation(format!("format: {}", e)))
            })
            .transpose()?;
        let date = non_blank(&self.date)
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    PortError::Validation(format!("date '{}' is not YYYY-MM-DD", raw))
                })
            })
            .transpose()?;
        let time = non_blank(&self.time)
            .map(|raw| {
                clock_time::parse(raw)
                    .map_err(|_| PortError::Validation(format!("time '{}' is not HH:MM", raw)))
            })
            .transpose()?;
        let duration = match &self.duration {
            Some(minutes) => minutes.parse()?,
            None => None,
        };

        Ok(MeetingRequest {
            name: self.name,
            email: self.email,
            phone: self.phone,
            meeting_type,
            format,
            date,
            time,
            duration,
            topic: self.topic,
        })
    }
}

fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingView {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub meeting_type: String,
    pub format: String,
    pub date: String,
    pub time: String,
    pub duration: u32,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

impl From<&Meeting> for MeetingView {
    fn from(meeting: &Meeting) -> Self {
        Self {
            id: meeting.id,
            name: meeting.name.clone(),
            email: meeting.email.clone(),
            phone: meeting.phone.clone(),
            meeting_type: meeting.meeting_type.to_string(),
            format: meeting.format.to_string(),
            date: meeting.date.format("%Y-%m-%d").to_string(),
            time: meeting.time.format("%H:%M").to_string(),
            duration: meeting.duration,
            topic: meeting.topic.clone(),
            created_at: meeting.created_at,
            status: meeting.status.as_str().to_string(),
        }
    }
}

/// One weekday's bookable window. `start` and `end` are `HH:00`, end exclusive.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AvailabilityView {
    pub day: String,
    pub open: bool,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List bookings, newest first.
#[utoipa::path(
    get,
    path = "/meetings",
    responses(
        (status = 200, description = "All bookings", body = [MeetingView])
    )
)]
pub async fn list_meetings_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<MeetingView>> {
    let scheduler = app_state.scheduler.lock().await;
    Json(scheduler.list().iter().map(MeetingView::from).collect())
}

/// Book a meeting.
#[utoipa::path(
    post,
    path = "/meetings",
    request_body = MeetingPayload,
    responses(
        (status = 201, description = "Meeting booked", body = MeetingView),
        (status = 400, description = "Missing field, past date or unavailable time", body = ErrorResponse)
    )
)]
pub async fn create_meeting_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<MeetingPayload>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(payload) = payload?;
    let request = payload.into_request()?;
    let meeting =
        run_blocking(&app_state.scheduler, move |scheduler| scheduler.create(request)).await?;

    info!(
        "Meeting {} booked for {} at {}",
        meeting.id, meeting.date, meeting.time
    );
    Ok((StatusCode::CREATED, Json(MeetingView::from(&meeting))))
}

/// Fetch one booking.
#[utoipa::path(
    get,
    path = "/meetings/{id}",
    params(("id" = u64, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "The booking", body = MeetingView),
        (status = 404, description = "No such booking", body = ErrorResponse)
    )
)]
pub async fn get_meeting_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<MeetingView>, HttpError> {
    let Path(id) = id?;
    let scheduler = app_state.scheduler.lock().await;
    Ok(Json(MeetingView::from(scheduler.get(id)?)))
}

/// Replace a booking's details. The whole form is validated again.
#[utoipa::path(
    put,
    path = "/meetings/{id}",
    params(("id" = u64, Path, description = "Meeting id")),
    request_body = MeetingPayload,
    responses(
        (status = 200, description = "Updated booking", body = MeetingView),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 404, description = "No such booking", body = ErrorResponse)
    )
)]
pub async fn update_meeting_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<MeetingPayload>, JsonRejection>,
) -> Result<Json<MeetingView>, HttpError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let request = payload.into_request()?;
    let meeting = run_blocking(&app_state.scheduler, move |scheduler| {
        scheduler.update(id, request)
    })
    .await?;
    Ok(Json(MeetingView::from(&meeting)))
}

/// Cancel a booking.
#[utoipa::path(
    delete,
    path = "/meetings/{id}",
    params(("id" = u64, Path, description = "Meeting id")),
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 404, description = "No such booking", body = ErrorResponse)
    )
)]
pub async fn delete_meeting_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, HttpError> {
    let Path(id) = id?;
    let cancelled =
        run_blocking(&app_state.scheduler, move |scheduler| scheduler.remove(id)).await?;
    info!("Meeting {} cancelled", cancelled.id);
    Ok(StatusCode::NO_CONTENT)
}

/// The weekly availability table, Monday first.
#[utoipa::path(
    get,
    path = "/meetings/availability",
    responses(
        (status = 200, description = "Bookable hours per weekday", body = [AvailabilityView])
    )
)]
pub async fn availability_handler() -> Json<Vec<AvailabilityView>> {
    let week = weekly_availability()
        .into_iter()
        .map(|day| AvailabilityView {
            day: day_name(day.weekday).to_string(),
            open: day.hours.is_some(),
            start: day.hours.map(|(start, _)| format!("{:02}:00", start)),
            end: day.hours.map(|(_, end)| format!("{:02}:00", end)),
        })
        .collect();
    Json(week)
}
