use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Package, Role};
use crate::services::auth;
use crate::services::booking::{self, NewBooking};
use crate::state::AppState;

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub photographer_id: String,
    pub date: String,
    pub time_slot: String,
    pub package: String,
    pub notes: String,
}

#[derive(Serialize)]
pub struct CreateBookingResponse {
    message: String,
    booking: Booking,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::User])?;

    let date = NaiveDate::parse_from_str(&body.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date, expected YYYY-MM-DD".to_string()))?;
    let package = Package::parse(&body.package)
        .ok_or_else(|| AppError::Validation("Invalid package selected".to_string()))?;

    let booking = {
        let db = state.db.lock().unwrap();
        booking::create_booking(
            &db,
            NewBooking {
                photographer_id: body.photographer_id,
                user_id: ctx.id.clone(),
                date,
                time_slot: body.time_slot,
                package,
                title: body.notes,
            },
        )?
    };

    tracing::info!(booking = %booking.id, user = %ctx.id, "booking created");

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            message: "Booking created successfully".to_string(),
            booking,
        }),
    ))
}

// GET /api/bookings/mine
#[derive(Serialize)]
pub struct ActivityResponse {
    id: String,
    photographer: String,
    event: String,
    date: String,
    time: String,
    status: String,
}

#[derive(Serialize)]
pub struct MyBookingsResponse {
    activities: Vec<ActivityResponse>,
    total_bookings: i64,
    pending_bookings: i64,
    completed_bookings: i64,
    rejected_bookings: i64,
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MyBookingsResponse>, AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::User, Role::Photographer])?;

    let db = state.db.lock().unwrap();

    let (rows, counts) = match ctx.role {
        Role::Photographer => (
            queries::bookings_for_photographer(&db, &ctx.id)?,
            [
                queries::count_bookings_for_photographer(&db, &ctx.id, None)?,
                queries::count_bookings_for_photographer(&db, &ctx.id, Some(BookingStatus::Pending))?,
                queries::count_bookings_for_photographer(&db, &ctx.id, Some(BookingStatus::Completed))?,
                queries::count_bookings_for_photographer(&db, &ctx.id, Some(BookingStatus::Rejected))?,
            ],
        ),
        _ => (
            queries::bookings_for_user(&db, &ctx.id)?,
            [
                queries::count_bookings_for_user(&db, &ctx.id, None)?,
                queries::count_bookings_for_user(&db, &ctx.id, Some(BookingStatus::Pending))?,
                queries::count_bookings_for_user(&db, &ctx.id, Some(BookingStatus::Completed))?,
                queries::count_bookings_for_user(&db, &ctx.id, Some(BookingStatus::Rejected))?,
            ],
        ),
    };

    let now = Utc::now().naive_utc();
    let activities = rows
        .into_iter()
        .map(|(booking, photographer_name)| ActivityResponse {
            id: booking.id,
            photographer: photographer_name,
            event: booking.title,
            date: booking.date.format("%-d %b %Y").to_string(),
            time: time_ago(booking.created_at, now),
            status: booking.status.label().to_string(),
        })
        .collect();

    Ok(Json(MyBookingsResponse {
        activities,
        total_bookings: counts[0],
        pending_bookings: counts[1],
        completed_bookings: counts[2],
        rejected_bookings: counts[3],
    }))
}

// PATCH /api/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    message: String,
    booking: Booking,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::Photographer, Role::Admin])?;

    let target = BookingStatus::parse(&body.status)
        .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?;

    let booking = {
        let db = state.db.lock().unwrap();
        booking::update_booking_status(&db, &id, target)?
    };

    tracing::info!(booking = %booking.id, status = %target.as_str(), "booking status updated");

    Ok(Json(UpdateStatusResponse {
        message: format!("Booking {} successfully", target.as_str()),
        booking,
    }))
}

/// Relative time for the activity feed; anything older than a week shows
/// the calendar date instead.
fn time_ago(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let diff = now - then;
    let days = diff.num_days();

    if days > 7 {
        return then.format("%-d/%-m/%Y").to_string();
    }
    if days >= 1 {
        return format!("{days} day{} ago", if days > 1 { "s" } else { "" });
    }
    let hours = diff.num_hours();
    if hours >= 1 {
        return format!("{hours} hour{} ago", if hours > 1 { "s" } else { "" });
    }
    let minutes = diff.num_minutes();
    if minutes >= 1 {
        return format!("{minutes} minute{} ago", if minutes > 1 { "s" } else { "" });
    }
    "Just now".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_time_ago_just_now() {
        let now = dt("2025-09-05 12:00:00");
        assert_eq!(time_ago(dt("2025-09-05 11:59:30"), now), "Just now");
    }

    #[test]
    fn test_time_ago_minutes_and_hours() {
        let now = dt("2025-09-05 12:00:00");
        assert_eq!(time_ago(dt("2025-09-05 11:59:00"), now), "1 minute ago");
        assert_eq!(time_ago(dt("2025-09-05 11:30:00"), now), "30 minutes ago");
        assert_eq!(time_ago(dt("2025-09-05 11:00:00"), now), "1 hour ago");
        assert_eq!(time_ago(dt("2025-09-05 03:00:00"), now), "9 hours ago");
    }

    #[test]
    fn test_time_ago_days() {
        let now = dt("2025-09-05 12:00:00");
        assert_eq!(time_ago(dt("2025-09-04 11:00:00"), now), "1 day ago");
        assert_eq!(time_ago(dt("2025-09-01 12:00:00"), now), "4 days ago");
    }

    #[test]
    fn test_time_ago_falls_back_to_date() {
        let now = dt("2025-09-15 12:00:00");
        assert_eq!(time_ago(dt("2025-09-05 12:00:00"), now), "5/9/2025");
    }
}
