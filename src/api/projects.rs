//! CRUD over projects. Ids are server-assigned UUIDs.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::state::AppState;
use crate::core::models::Project;
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct ProjectInput {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub employees: Vec<String>,
}

impl ProjectInput {
    fn into_project(self, id: String) -> Result<Project, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        Ok(Project {
            id,
            name,
            description: self.description,
            status: self.status,
            employees: self.employees,
        })
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Project {id} not found"))
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(state.store.list().await?))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    state
        .store
        .find::<Project>(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let project = input.into_project(Uuid::new_v4().to_string())?;
    state.store.insert_new(&project).await?;
    info!(id = %project.id, name = %project.name, "Created project");
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Project>, AppError> {
    if state.store.find::<Project>(&id).await?.is_none() {
        return Err(not_found(&id));
    }

    let project = input.into_project(id)?;
    state.store.upsert(&project).await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.store.delete::<Project>(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}
