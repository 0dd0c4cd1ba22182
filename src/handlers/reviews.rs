use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{review, Review, Role};
use crate::services::auth;
use crate::state::AppState;

// POST /api/reviews
#[derive(Deserialize)]
pub struct AddReviewRequest {
    pub photographer_id: String,
    pub rating: f64,
    pub text: Option<String>,
    pub name: Option<String>,
}

pub async fn add_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AddReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let ctx = auth::auth_context(&headers, &state.config)?;
    ctx.require_role(&[Role::User])?;

    if !(1.0..=5.0).contains(&body.rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    let rating = review::round_to_tenth(body.rating);

    let review = Review {
        id: Uuid::new_v4().to_string(),
        user_id: ctx.id.clone(),
        photographer_id: body.photographer_id.clone(),
        name: body.name.unwrap_or_else(|| ctx.name.clone()),
        rating,
        comment: body.text,
        created_at: Utc::now().naive_utc(),
    };

    let photographer = {
        let db = state.db.lock().unwrap();
        let photographer = queries::get_photographer_by_id(&db, &body.photographer_id)?
            .ok_or_else(|| AppError::NotFound("Photographer not found".to_string()))?;
        queries::insert_review(&db, &review)?;
        photographer
    };

    let html = format!(
        "<p>Hello {},</p>\
         <p>You received a new review from {}:</p>\
         <p>Rating: {}</p>\
         <p>Comment: {}</p>",
        photographer.display_name,
        review.name,
        review.rating,
        review.comment.as_deref().unwrap_or(""),
    );
    if let Err(e) = state
        .email
        .send_email(&photographer.email, "You received a new review!", &html)
        .await
    {
        tracing::error!(error = %e, photographer = %photographer.id, "failed to send review notification");
    }

    Ok((StatusCode::CREATED, Json(review)))
}

// GET /api/reviews/:id — reviews for a photographer
pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    auth::auth_context(&headers, &state.config)?;

    let db = state.db.lock().unwrap();
    let reviews = queries::reviews_for_photographer(&db, &id)?;
    Ok(Json(reviews))
}
