use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{AccountStatus, BookingStatus, Photographer, Pricing, ProfileStatus, Role, User};
use crate::services::auth;
use crate::state::AppState;

// POST /api/auth/register
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    token: String,
    id: String,
    name: String,
    email: String,
    phone: String,
    role: Role,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    auth::validate_name(&body.name)?;
    auth::validate_email(&body.email)?;
    auth::validate_password(&body.password)?;
    auth::validate_phone(&body.phone)?;

    // Admin accounts are never self-registered.
    let role = match body.role.as_deref() {
        None => Role::User,
        Some(r) => match Role::parse(r) {
            Some(Role::User) => Role::User,
            Some(Role::Photographer) => Role::Photographer,
            _ => return Err(AppError::Validation("Invalid role".to_string())),
        },
    };

    let email = body.email.trim().to_lowercase();
    let password_hash = auth::hash_password(&body.password)?;
    let now = Utc::now().naive_utc();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        email: email.clone(),
        password_hash,
        phone: body.phone.clone(),
        role,
        is_active: true,
        status: AccountStatus::Approved,
        permissions: vec![],
        last_login: None,
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        if queries::get_user_by_email(&db, &email)?.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }
        queries::create_user(&db, &user)?;
    }

    tracing::info!(user = %user.id, role = %role.as_str(), "registered new account");

    let token = auth::issue_token(&state.config, &user.id, user.role, &user.name, vec![])?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token,
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
        }),
    ))
}

// POST /api/auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = body.email.trim().to_lowercase();

    let user = {
        let db = state.db.lock().unwrap();
        let user = queries::get_user_by_email(&db, &email)?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::Validation("Invalid Email".to_string()))?;

        if !auth::verify_password(&user.password_hash, &body.password) {
            return Err(AppError::Validation("Invalid Password".to_string()));
        }

        queries::touch_last_login(&db, &user.id)?;
        user
    };

    let token = auth::issue_token(
        &state.config,
        &user.id,
        user.role,
        &user.name,
        user.permissions.clone(),
    )?;

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "token": token,
        "user": { "id": user.id, "name": user.name, "email": user.email },
    })))
}

// PUT /api/auth/update
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::User, Role::Photographer])?;

    if let Some(phone) = body.phone.as_deref() {
        auth::validate_phone(phone)?;
    }

    let db = state.db.lock().unwrap();
    match ctx.role {
        Role::Photographer => {
            let mut photographer = queries::get_photographer_by_id(&db, &ctx.id)?
                .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;
            if let Some(name) = body.name {
                photographer.name = name;
            }
            if let Some(phone) = body.phone {
                photographer.phone = phone;
            }
            queries::save_photographer_profile(&db, &photographer)?;

            Ok(Json(serde_json::json!({
                "message": "Profile updated successfully",
                "user": { "id": photographer.id, "name": photographer.name, "email": photographer.email },
            })))
        }
        _ => {
            let mut user = queries::get_user_by_id(&db, &ctx.id)?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
            if let Some(name) = body.name {
                user.name = name;
            }
            if let Some(phone) = body.phone {
                user.phone = phone;
            }
            queries::update_user_contact(&db, &user)?;

            Ok(Json(serde_json::json!({
                "message": "Profile updated successfully",
                "user": { "id": user.id, "name": user.name, "email": user.email },
            })))
        }
    }
}

// POST /api/photographers/auth/register
#[derive(Deserialize)]
pub struct PhotographerRegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub display_name: String,
    pub bio: String,
    pub location: String,
    pub genres: Vec<String>,
    pub base_rate: f64,
}

pub async fn photographer_register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PhotographerRegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    auth::validate_name(&body.name)?;
    auth::validate_email(&body.email)?;
    auth::validate_password(&body.password)?;
    auth::validate_phone(&body.phone)?;
    for (field, value) in [
        ("Display name", &body.display_name),
        ("Bio", &body.bio),
        ("Location", &body.location),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }
    if body.genres.is_empty() {
        return Err(AppError::Validation("Genres are required".to_string()));
    }
    if !body.base_rate.is_finite() || body.base_rate < 0.0 {
        return Err(AppError::Validation(
            "Base rate must be a non-negative number".to_string(),
        ));
    }

    let email = body.email.trim().to_lowercase();
    let password_hash = auth::hash_password(&body.password)?;
    let now = Utc::now().naive_utc();
    let photographer = Photographer {
        id: Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        email: email.clone(),
        password_hash,
        phone: body.phone.clone(),
        is_active: true,
        display_name: body.display_name.trim().to_string(),
        location: body.location.trim().to_string(),
        bio: body.bio.trim().to_string(),
        genres: body.genres.clone(),
        pricing: Pricing::new(body.base_rate),
        portfolio: vec![],
        profile_pic: String::new(),
        status: ProfileStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        if queries::get_photographer_by_email(&db, &email)?.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }
        queries::create_photographer(&db, &photographer)?;
    }

    tracing::info!(photographer = %photographer.id, "registered new photographer, pending approval");

    let token = auth::issue_token(
        &state.config,
        &photographer.id,
        Role::Photographer,
        &photographer.name,
        vec![],
    )?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "token": token,
            "id": photographer.id,
            "name": photographer.name,
            "email": photographer.email,
            "display_name": photographer.display_name,
            "status": photographer.status,
        })),
    ))
}

// POST /api/photographers/auth/login
pub async fn photographer_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = body.email.trim().to_lowercase();

    let photographer = {
        let db = state.db.lock().unwrap();
        let photographer = queries::get_photographer_by_email(&db, &email)?
            .filter(|p| p.is_active)
            .ok_or_else(|| AppError::Validation("Invalid Email".to_string()))?;

        if !auth::verify_password(&photographer.password_hash, &body.password) {
            return Err(AppError::Validation("Invalid Password".to_string()));
        }
        photographer
    };

    let token = auth::issue_token(
        &state.config,
        &photographer.id,
        Role::Photographer,
        &photographer.name,
        vec![],
    )?;

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "token": token,
        "photographer": {
            "id": photographer.id,
            "name": photographer.name,
            "email": photographer.email,
            "display_name": photographer.display_name,
            "status": photographer.status,
        },
    })))
}

// GET /api/photographers/auth/dashboard
#[derive(Serialize)]
pub struct DashboardResponse {
    total_bookings: i64,
    pending_bookings: i64,
    completed_bookings: i64,
    rejected_bookings: i64,
    avg_rating: f64,
    total_reviews: i64,
}

pub async fn photographer_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::Photographer])?;

    let db = state.db.lock().unwrap();

    let total_bookings = queries::count_bookings_for_photographer(&db, &ctx.id, None)?;
    let pending_bookings =
        queries::count_bookings_for_photographer(&db, &ctx.id, Some(BookingStatus::Pending))?;
    let completed_bookings =
        queries::count_bookings_for_photographer(&db, &ctx.id, Some(BookingStatus::Completed))?;
    let rejected_bookings =
        queries::count_bookings_for_photographer(&db, &ctx.id, Some(BookingStatus::Rejected))?;
    let (avg_rating, total_reviews) = queries::rating_summary(&db, &ctx.id)?;

    Ok(Json(DashboardResponse {
        total_bookings,
        pending_bookings,
        completed_bookings,
        rejected_bookings,
        avg_rating,
        total_reviews,
    }))
}

// POST /api/admin/auth/login
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = body.email.trim().to_lowercase();

    let admin = {
        let db = state.db.lock().unwrap();
        let admin = queries::get_user_by_email(&db, &email)?
            .filter(|u| u.role == Role::Admin && u.is_active)
            .ok_or_else(|| AppError::NotFound("Invalid credentials".to_string()))?;

        if !auth::verify_password(&admin.password_hash, &body.password) {
            return Err(AppError::Unauthorized);
        }

        queries::touch_last_login(&db, &admin.id)?;
        admin
    };

    let token = auth::issue_token(
        &state.config,
        &admin.id,
        Role::Admin,
        &admin.name,
        admin.permissions.clone(),
    )?;

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "token": token,
        "admin": {
            "id": admin.id,
            "name": admin.name,
            "email": admin.email,
            "role": admin.role,
            "permissions": admin.permissions,
        },
    })))
}
