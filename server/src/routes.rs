//! Route table and request handlers.
//!
//! Mirrors the legacy API surface one-to-one. The host layer is fully
//! blocking (process spawns), so every handler crosses into it through
//! `spawn_blocking`.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, put};
use axum::Json;
use serde::Deserialize;
use tokio::task;

use iisman_core::{
    DirEntry, MachineState, Website, WebsiteAction, WebsiteRequest, validate_request,
};
use iisman_host::{HostController, machine};

use crate::models::{ApiError, LogsResponse, MessageResponse};

#[derive(Clone)]
pub struct AppState {
    pub host: Arc<HostController>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(root))
        .route("/api/website", get(list_websites).post(create_website))
        .route(
            "/api/website/:name",
            put(update_website).delete(delete_website),
        )
        .route("/api/website/:site/:action", patch(update_status))
        .route("/api/log/:site", get(site_logs))
        .route("/api/dir/:site", get(site_directory))
        .route("/api/dirtree/:site", get(site_directory_tree))
        .route("/api/machine/info", get(machine_info))
        .route("/api/machine/process", get(machine_processes))
        .with_state(state)
}

/// Runs a blocking host operation off the async runtime.
async fn run_host<T, F>(state: &AppState, operation: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&HostController) -> Result<T, iisman_host::HostError> + Send + 'static,
{
    let host = state.host.clone();
    task::spawn_blocking(move || operation(&host))
        .await
        .map_err(|error| ApiError::Internal(format!("blocking task failed: {error}")))?
        .map_err(ApiError::from)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("IIS Server API"))
}

async fn list_websites(State(state): State<AppState>) -> Result<Json<Vec<Website>>, ApiError> {
    let listing = run_host(&state, |host| host.list_sites()).await?;
    Ok(Json(listing.sites))
}

async fn create_website(
    State(state): State<AppState>,
    Json(request): Json<WebsiteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let problems = validate_request(&request);
    if !problems.is_empty() {
        let joined = problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::BadRequest(joined));
    }

    let name = request.name.clone();
    let exists = run_host(&state, move |host| host.site_exists(&name)).await?;
    if exists {
        return Err(ApiError::BadRequest("Website already exists".to_string()));
    }

    run_host(&state, move |host| host.create_site(&request)).await?;
    Ok(Json(MessageResponse::new("Website created")))
}

async fn update_website(
    State(state): State<AppState>,
    Path(original): Path<String>,
    Json(request): Json<WebsiteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let problems = validate_request(&request);
    if !problems.is_empty() {
        let joined = problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::BadRequest(joined));
    }

    run_host(&state, move |host| host.update_site(&original, &request)).await?;
    Ok(Json(MessageResponse::new("Website updated")))
}

async fn update_status(
    State(state): State<AppState>,
    Path((site, action)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let action: WebsiteAction = action.parse().map_err(|_| {
        ApiError::BadRequest("Invalid action, valid actions are: Start, Stop, Restart".to_string())
    })?;

    run_host(&state, move |host| {
        if !host.site_exists(&site)? {
            return Err(iisman_host::HostError::SiteNotFound(site.clone()));
        }
        host.control_site(action, &site)
    })
    .await?;

    Ok(Json(MessageResponse::new("Website status updated")))
}

async fn delete_website(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    run_host(&state, move |host| host.delete_site(&name)).await?;
    Ok(Json(MessageResponse::new("Website deleted")))
}

async fn site_logs(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> Result<Json<LogsResponse>, ApiError> {
    let logs = run_host(&state, move |host| host.tail_logs(&site)).await?;
    Ok(Json(LogsResponse { logs }))
}

async fn site_directory(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> Result<Json<Vec<DirEntry>>, ApiError> {
    let entries = run_host(&state, move |host| host.list_directory(&site, None)).await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
struct TreeQuery {
    tree: Option<String>,
}

async fn site_directory_tree(
    State(state): State<AppState>,
    Path(site): Path<String>,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Vec<DirEntry>>, ApiError> {
    let entries = run_host(&state, move |host| {
        host.list_directory(&site, query.tree.as_deref())
    })
    .await?;
    Ok(Json(entries))
}

async fn machine_info() -> Result<Json<MachineState>, ApiError> {
    let state = task::spawn_blocking(machine::machine_state)
        .await
        .map_err(|error| ApiError::Internal(format!("blocking task failed: {error}")))?;
    Ok(Json(state))
}

async fn machine_processes() -> Result<Json<Vec<String>>, ApiError> {
    let processes = task::spawn_blocking(machine::process_list)
        .await
        .map_err(|error| ApiError::Internal(format!("blocking task failed: {error}")))?;
    Ok(Json(processes))
}
