use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use spaceport_core::{ResourceError, resource::Resource};
use spaceport_model::RecordId;

use crate::{
    auth::OptionalCaller,
    infra::{
        app_state::AppState,
        errors::{AppError, AppResult},
    },
};

fn unreadable_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
}

pub async fn list<R: Resource>(State(state): State<AppState>) -> AppResult<Json<Vec<R::View>>> {
    let records = state.resources::<R>().list().await?;
    Ok(Json(records.into_iter().map(R::into_view).collect()))
}

pub async fn get<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<R::View>> {
    let record = state.resources::<R>().get(&id).await?;
    Ok(Json(record.into_view()))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    OptionalCaller(caller): OptionalCaller,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> AppResult<Json<R::View>> {
    let Json(draft) = payload.map_err(unreadable_body)?;
    let record = state.resources::<R>().create(draft, caller.as_ref()).await?;
    Ok(Json(record.into_view()))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    OptionalCaller(caller): OptionalCaller,
    payload: Result<Json<R::Patch>, JsonRejection>,
) -> AppResult<Json<R::View>> {
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => {
            // A bad identifier is reported ahead of a bad body.
            RecordId::parse(&id).map_err(ResourceError::from)?;
            return Err(unreadable_body(rejection));
        }
    };

    let record = state
        .resources::<R>()
        .update(&id, patch, caller.as_ref())
        .await?;
    Ok(Json(record.into_view()))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<R::View>> {
    let record = state.resources::<R>().delete(&id).await?;
    Ok(Json(record.into_view()))
}
