//! Ownership-scoped CRUD over server inventory records.
//!
//! Every route resolves the caller first, then parses the path identifier
//! through `RecordId::parse`, then hits the store with the owner baked into
//! the predicate. A record that exists under someone else's account looks
//! exactly like one that does not exist.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::store::{NewServer, RecordId, ServerPatch, ServerRecord};

use super::{AppState, require_identity};

#[derive(Debug, Deserialize)]
pub struct ServerCreate {
    name: String,
    ip_address: String,
    #[serde(default = "default_status")]
    status: String,
}

fn default_status() -> String {
    "active".to_string()
}

#[derive(Debug, Serialize)]
pub struct ServerResponse {
    id: String,
    name: String,
    ip_address: String,
    status: String,
    owner_email: String,
}

impl From<ServerRecord> for ServerResponse {
    fn from(rec: ServerRecord) -> Self {
        Self {
            id: rec.id.to_string(),
            name: rec.name,
            ip_address: rec.ip_address,
            status: rec.status,
            owner_email: rec.owner_email,
        }
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Server not found".into())
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ServerResponse>>> {
    let identity = require_identity(&state, &headers)?;
    let records = state.servers.list_owned(&identity.email, state.list_limit).await?;
    Ok(Json(records.into_iter().map(ServerResponse::from).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ServerCreate>, JsonRejection>,
) -> ApiResult<Json<ServerResponse>> {
    let identity = require_identity(&state, &headers)?;
    let Json(payload) = payload?;
    let record = state
        .servers
        .insert_server(NewServer {
            name: payload.name,
            ip_address: payload.ip_address,
            status: payload.status,
            // owner comes from the session, never from the body
            owner_email: identity.email,
        })
        .await?;
    Ok(Json(record.into()))
}

pub async fn get_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(server_id): Path<String>,
) -> ApiResult<Json<ServerResponse>> {
    let identity = require_identity(&state, &headers)?;
    let id = RecordId::parse(&server_id)?;
    let record = state
        .servers
        .find_owned(id, &identity.email)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(record.into()))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(server_id): Path<String>,
    payload: Result<Json<ServerPatch>, JsonRejection>,
) -> ApiResult<Json<ServerResponse>> {
    let identity = require_identity(&state, &headers)?;
    let id = RecordId::parse(&server_id)?;
    let Json(patch) = payload?;
    if !patch.is_empty() && state.servers.update_owned(id, &identity.email, &patch).await? == 0 {
        return Err(not_found());
    }
    // Re-read by id alone; an empty patch skips the write and still returns
    // the current record. A concurrent delete lands here as not-found.
    let record = state.servers.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(record.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(server_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let identity = require_identity(&state, &headers)?;
    let id = RecordId::parse(&server_id)?;
    if state.servers.delete_owned(id, &identity.email).await? == 0 {
        return Err(not_found());
    }
    Ok(Json(json!({"message": "Server deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_defaults_status_to_active() {
        let payload: ServerCreate =
            serde_json::from_str(r#"{"name": "web-1", "ip_address": "10.0.0.1"}"#).unwrap();
        assert_eq!(payload.status, "active");

        let payload: ServerCreate = serde_json::from_str(
            r#"{"name": "web-1", "ip_address": "10.0.0.1", "status": "retired"}"#,
        )
        .unwrap();
        assert_eq!(payload.status, "retired");
    }

    #[test]
    fn response_renders_id_as_string() {
        let rec = ServerRecord {
            id: RecordId::new(),
            name: "web-1".into(),
            ip_address: "10.0.0.1".into(),
            status: "active".into(),
            owner_email: "a@example.com".into(),
        };
        let expect = rec.id.to_string();
        let resp = ServerResponse::from(rec);
        assert_eq!(resp.id, expect);
        assert_eq!(RecordId::parse(&resp.id).unwrap().to_string(), expect);
    }
}
