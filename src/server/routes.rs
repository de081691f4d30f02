use axum::{
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::entity::{Entity, Fields};
use crate::manager::Manager;
use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult, MessageResponse};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Integer id taken from the request path.
///
/// Ids that do not parse answer with the same JSON body as every other
/// invalid request.
pub struct EntityId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidData)?;
        Ok(EntityId(id))
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /{entity}/get
pub async fn list_entities<E: Entity>(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Fields>>> {
    let mut session = state.sessions.session()?;
    let entities = Manager::<E>::new(&mut session).get_all()?;
    Ok(Json(entities.iter().map(E::to_fields).collect()))
}

/// GET /{entity}/get/{id}
pub async fn get_entity<E: Entity>(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> ApiResult<Json<Fields>> {
    let mut session = state.sessions.session()?;
    Manager::<E>::new(&mut session)
        .get_by_id(id)?
        .map(|entity| Json(entity.to_fields()))
        .ok_or(ApiError::NotFound(E::LABEL))
}

/// POST /{entity}/add
///
/// Every field of the entity must be present; keys the entity does not
/// know are ignored.
pub async fn add_entity<E: Entity>(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Fields>)> {
    let body = parse_object(&body)?;
    if !E::missing_fields(&body).is_empty() {
        return Err(ApiError::InvalidData);
    }
    let fields: Fields = E::FIELDS
        .iter()
        .filter_map(|f| body.get(f.name).map(|v| (f.name.to_string(), v.clone())))
        .collect();

    let mut session = state.sessions.session()?;
    let created = Manager::<E>::new(&mut session)
        .create(&fields)
        .map_err(|e| ApiError::write("creating", E::LABEL, e))?;

    tracing::info!("Added {} {}", E::LABEL, created.id());
    Ok((StatusCode::CREATED, Json(created.to_fields())))
}

/// PUT /{entity}/update/{id}
///
/// Partial update; unknown keys, including `id`, are rejected.
pub async fn update_entity<E: Entity>(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    body: Bytes,
) -> ApiResult<Json<Fields>> {
    let fields = parse_object(&body)?;

    let mut session = state.sessions.session()?;
    Manager::<E>::new(&mut session)
        .update(id, &fields)
        .map_err(|e| ApiError::write("updating", E::LABEL, e))?
        .map(|entity| Json(entity.to_fields()))
        .ok_or(ApiError::NotFound(E::LABEL))
}

/// DELETE /{entity}/delete/{id}
pub async fn delete_entity<E: Entity>(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> ApiResult<Json<MessageResponse>> {
    let mut session = state.sessions.session()?;
    let removed = Manager::<E>::new(&mut session)
        .delete(id)
        .map_err(|e| ApiError::write("deleting", E::LABEL, e))?;

    if removed {
        Ok(Json(MessageResponse::new(format!("{} deleted", E::LABEL))))
    } else {
        Err(ApiError::NotFound(E::LABEL))
    }
}

/// Parse a request body that must be a JSON object
fn parse_object(body: &[u8]) -> ApiResult<Fields> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::InvalidData),
    }
}
