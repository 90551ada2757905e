use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::CustomerUser;
use crate::api::dtos::requests::CreateAnimalRequest;
use crate::domain::models::animal::Animal;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_animal(
    State(state): State<Arc<AppState>>,
    user: CustomerUser,
    Json(payload): Json<CreateAnimalRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }

    let animal = Animal::new(
        user.customer_id,
        payload.name,
        payload.species.unwrap_or_else(|| "dog".to_string()),
        payload.breed,
        payload.notes,
    );

    let created = state.animal_repo.create(&animal).await?;
    info!("Animal registered: {} ({})", created.name, created.id);
    Ok(Json(created))
}

pub async fn list_animals(
    State(state): State<Arc<AppState>>,
    user: CustomerUser,
) -> Result<impl IntoResponse, AppError> {
    let animals = state.animal_repo.list_by_customer(&user.customer_id).await?;
    Ok(Json(animals))
}
