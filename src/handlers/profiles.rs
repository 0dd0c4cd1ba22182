use std::cmp::Ordering;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Photographer, PortfolioItem, Pricing, Role};
use crate::services::auth;
use crate::state::AppState;

// GET /api/profiles — public browse
#[derive(Deserialize)]
pub struct BrowseQuery {
    pub location: Option<String>,
    pub genre: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

pub async fn list_approved(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Vec<Photographer>>, AppError> {
    let mut photographers = {
        let db = state.db.lock().unwrap();
        queries::list_approved_photographers(&db)?
    };

    if let Some(location) = query.location.as_deref() {
        photographers.retain(|p| p.location.eq_ignore_ascii_case(location));
    }
    if let Some(genre) = query.genre.as_deref() {
        let needle = genre.to_lowercase();
        photographers.retain(|p| p.genres.iter().any(|g| g.to_lowercase().contains(&needle)));
    }

    let descending = query.sort_order.as_deref() == Some("desc");
    photographers.sort_by(|a, b| {
        let ord = a
            .pricing
            .base_rate
            .partial_cmp(&b.pricing.base_rate)
            .unwrap_or(Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let paged = photographers
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Ok(Json(paged))
}

// GET /api/profiles/:id
#[derive(Serialize)]
pub struct ProfileResponse {
    photographer: Photographer,
    bookings: Vec<Booking>,
    avg_rating: f64,
    total_reviews: i64,
    completed_bookings: i64,
    pending_bookings: i64,
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::Photographer])?;

    let db = state.db.lock().unwrap();

    let photographer = queries::get_photographer_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;

    let bookings = queries::bookings_for_photographer(&db, &id)?
        .into_iter()
        .map(|(booking, _)| booking)
        .collect();
    let (avg_rating, total_reviews) = queries::rating_summary(&db, &id)?;
    let completed_bookings =
        queries::count_bookings_for_photographer(&db, &id, Some(BookingStatus::Completed))?;
    let pending_bookings =
        queries::count_bookings_for_photographer(&db, &id, Some(BookingStatus::Pending))?;

    Ok(Json(ProfileResponse {
        photographer,
        bookings,
        avg_rating,
        total_reviews,
        completed_bookings,
        pending_bookings,
    }))
}

// PATCH /api/profiles/:id
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub genres: Option<Vec<String>>,
    pub pricing: Option<Pricing>,
    pub profile_pic: Option<String>,
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Photographer>, AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::Photographer])?;

    if let Some(phone) = body.phone.as_deref() {
        auth::validate_phone(phone)?;
    }
    if let Some(pricing) = &body.pricing {
        pricing
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
    }

    let db = state.db.lock().unwrap();
    let mut photographer = queries::get_photographer_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;

    if let Some(name) = body.name {
        photographer.name = name;
    }
    if let Some(phone) = body.phone {
        photographer.phone = phone;
    }
    if let Some(display_name) = body.display_name {
        photographer.display_name = display_name;
    }
    if let Some(location) = body.location {
        photographer.location = location;
    }
    if let Some(bio) = body.bio {
        photographer.bio = bio;
    }
    if let Some(genres) = body.genres {
        photographer.genres = genres;
    }
    if let Some(pricing) = body.pricing {
        photographer.pricing = pricing;
    }
    if let Some(profile_pic) = body.profile_pic {
        photographer.profile_pic = profile_pic;
    }

    queries::save_photographer_profile(&db, &photographer)?;

    let updated = queries::get_photographer_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;
    Ok(Json(updated))
}

// PATCH /api/profiles/:id/pictures
#[derive(Deserialize)]
pub struct UpdatePicturesRequest {
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub portfolio: Vec<String>,
}

pub async fn update_pictures(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdatePicturesRequest>,
) -> Result<Json<Photographer>, AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::Photographer])?;

    let db = state.db.lock().unwrap();
    let mut photographer = queries::get_photographer_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;

    if let Some(profile_pic) = body.profile_pic {
        photographer.profile_pic = profile_pic;
    }
    photographer
        .portfolio
        .extend(body.portfolio.into_iter().map(|url| PortfolioItem {
            url,
            caption: "MyPortfolio".to_string(),
            genre: None,
            price: None,
        }));

    queries::save_photographer_profile(&db, &photographer)?;

    let updated = queries::get_photographer_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;
    Ok(Json(updated))
}

// GET /api/profiles/:id/portfolio — any authenticated role
pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Photographer>, AppError> {
    auth::auth_context(&headers, &state.config)?;

    let db = state.db.lock().unwrap();
    let photographer = queries::get_photographer_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;

    Ok(Json(photographer))
}
