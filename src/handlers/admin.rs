use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{AccountStatus, ProfileStatus, Role};
use crate::services::auth::{self, AuthContext};
use crate::state::AppState;

fn require_admin(headers: &HeaderMap, config: &AppConfig) -> Result<AuthContext, AppError> {
    let ctx = auth::auth_context(headers, config)?;
    ctx.require_role(&[Role::Admin])?;
    Ok(ctx)
}

fn parse_id(id: &str, kind: &str) -> Result<(), AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::Validation(format!("Invalid {kind} ID format")))?;
    Ok(())
}

async fn notify(state: &AppState, to: &str, subject: &str, html: &str) {
    if let Err(e) = state.email.send_email(to, subject, html).await {
        tracing::error!(error = %e, to = %to, "failed to send moderation email");
    }
}

// ── Users ──

// GET /api/admin/users
#[derive(Serialize)]
pub struct UserSummary {
    id: String,
    name: String,
    email: String,
    role: Role,
    is_active: bool,
    status: AccountStatus,
    created_at: String,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    require_admin(&headers, &state.config)?;

    let users = {
        let db = state.db.lock().unwrap();
        queries::list_users(&db)?
    };

    let response = users
        .into_iter()
        .map(|u| UserSummary {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            is_active: u.is_active,
            status: u.status,
            created_at: u.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// PATCH /api/admin/users/:id/approve
#[derive(Deserialize, Default)]
pub struct ApproveUserRequest {
    pub status: Option<String>,
}

pub async fn approve_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<ApproveUserRequest>>,
) -> Result<Json<UserSummary>, AppError> {
    require_admin(&headers, &state.config)?;
    parse_id(&id, "user")?;

    let status_str = body
        .and_then(|Json(b)| b.status)
        .unwrap_or_else(|| "approved".to_string());
    let status = AccountStatus::parse(&status_str)
        .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?;
    let is_active = status == AccountStatus::Approved;

    let user = {
        let db = state.db.lock().unwrap();
        if !queries::set_user_status(&db, &id, status, is_active)? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        queries::get_user_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
    };

    if status == AccountStatus::Approved {
        let html = format!(
            "<p>Hello {},</p><p>Your account has been approved. You can now use all features!</p>",
            user.name
        );
        notify(&state, &user.email, "Account approved", &html).await;
    }

    Ok(Json(UserSummary {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        is_active: user.is_active,
        status: user.status,
        created_at: user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

// PATCH /api/admin/users/:id/block
pub async fn block_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<UserSummary>, AppError> {
    require_admin(&headers, &state.config)?;
    parse_id(&id, "user")?;

    let user = {
        let db = state.db.lock().unwrap();
        if !queries::set_user_status(&db, &id, AccountStatus::Blocked, false)? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        queries::get_user_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
    };

    let html = format!(
        "<p>Hello {},</p><p>Unfortunately, your account has been blocked. Contact support for details.</p>",
        user.name
    );
    notify(&state, &user.email, "Account blocked", &html).await;

    Ok(Json(UserSummary {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        is_active: user.is_active,
        status: user.status,
        created_at: user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

// DELETE /api/admin/users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;
    parse_id(&id, "user")?;

    let db = state.db.lock().unwrap();
    if !queries::delete_user(&db, &id)? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "message": "User deleted successfully",
        "id": id,
    })))
}

// ── Photographers ──

// GET /api/admin/photographers
#[derive(Serialize)]
pub struct PhotographerSummary {
    id: String,
    name: String,
    email: String,
    status: ProfileStatus,
    joined: String,
    rating: f64,
    base_price: f64,
}

pub async fn list_photographers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<PhotographerSummary>>, AppError> {
    require_admin(&headers, &state.config)?;

    let photographers = {
        let db = state.db.lock().unwrap();
        queries::list_photographers_with_rating(&db)?
    };

    let response = photographers
        .into_iter()
        .map(|(p, rating)| PhotographerSummary {
            id: p.id,
            name: p.name,
            email: p.email,
            status: p.status,
            joined: p.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            rating,
            base_price: p.pricing.base_rate,
        })
        .collect();

    Ok(Json(response))
}

// PATCH /api/admin/photographers/:id/approve
pub async fn approve_photographer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;
    parse_id(&id, "photographer")?;

    let (photographer, rating) = {
        let db = state.db.lock().unwrap();
        if !queries::set_photographer_status(&db, &id, ProfileStatus::Approved, true)? {
            return Err(AppError::NotFound("Photographer not found".to_string()));
        }
        let photographer = queries::get_photographer_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;
        let (rating, _) = queries::rating_summary(&db, &id)?;
        (photographer, rating)
    };

    let html = format!(
        "<p>Hello {},</p><p>Your profile has been approved. You can now start accepting bookings!</p>",
        photographer.display_name
    );
    notify(&state, &photographer.email, "Profile approved", &html).await;

    Ok(Json(serde_json::json!({
        "id": photographer.id,
        "name": photographer.name,
        "email": photographer.email,
        "status": photographer.status,
        "is_active": photographer.is_active,
        "rating": rating,
        "base_price": photographer.pricing.base_rate,
    })))
}

// PATCH /api/admin/photographers/:id/block
pub async fn block_photographer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;
    parse_id(&id, "photographer")?;

    let photographer = {
        let db = state.db.lock().unwrap();
        if !queries::set_photographer_status(&db, &id, ProfileStatus::Blocked, false)? {
            return Err(AppError::NotFound("Photographer not found".to_string()));
        }
        queries::get_photographer_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?
    };

    let html = format!(
        "<p>Hello {},</p><p>Unfortunately, your profile registration was rejected. Contact support for details.</p>",
        photographer.display_name
    );
    notify(&state, &photographer.email, "Profile rejected", &html).await;

    Ok(Json(serde_json::json!({
        "id": photographer.id,
        "status": photographer.status,
        "is_active": photographer.is_active,
    })))
}

// DELETE /api/admin/photographers/:id
pub async fn delete_photographer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;
    parse_id(&id, "photographer")?;

    let db = state.db.lock().unwrap();
    if !queries::delete_photographer(&db, &id)? {
        return Err(AppError::NotFound("Photographer not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "message": "Photographer deleted successfully",
        "id": id,
    })))
}

// ── Stats ──

// GET /api/admin/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;

    let db = state.db.lock().unwrap();
    let stats = queries::admin_stats(&db)?;

    Ok(Json(serde_json::json!({
        "total_users": stats.total_users,
        "blocked_users": stats.blocked_users,
        "active_photographers": stats.active_photographers,
        "pending_approvals": stats.pending_approvals,
        "pending_bookings": stats.pending_bookings,
        "completed_bookings": stats.completed_bookings,
    })))
}

// GET /api/admin/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;

    let db = state.db.lock().unwrap();
    let stats = queries::admin_stats(&db)?;

    Ok(Json(serde_json::json!({
        "total_users": stats.total_users,
        "blocked_users": stats.blocked_users,
        "active_photographers": stats.active_photographers,
        "photographers_pending": stats.pending_approvals,
        "bookings_pending": stats.pending_bookings,
        "bookings_completed": stats.completed_bookings,
    })))
}
