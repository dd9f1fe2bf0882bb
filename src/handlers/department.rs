//! Department handlers

use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::Value;

use crate::entity::department::DepartmentView;
use crate::error::AppResult;
use crate::handlers::employee::DEFAULT_FIELDS;
use crate::handlers::extract::{ApiJson, ApiPath};
use crate::handlers::{parse_data, project_all};
use crate::routes::ApiResponse;
use crate::service::DepartmentFields;
use crate::state::AppState;
use crate::store::Filter;

#[derive(Debug, Deserialize)]
pub struct ListDepartmentsRequest {
    #[serde(default)]
    pub domain: Filter,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub department_id: i64,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct DepartmentIdRequest {
    pub department_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CopyDepartmentRequest {
    pub department_id: i64,
    pub code: String,
}

/// POST /api/department/list
pub async fn list_departments(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ListDepartmentsRequest>,
) -> AppResult<Json<ApiResponse<Vec<DepartmentView>>>> {
    let limit = req.limit.unwrap_or(state.config.api.list_limit);
    let departments = state.departments.list(&req.domain, Some(limit)).await?;
    Ok(Json(ApiResponse::list(departments)))
}

/// POST /api/department/create
pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateDepartmentRequest>,
) -> AppResult<Json<ApiResponse<DepartmentView>>> {
    let fields: DepartmentFields = parse_data(req.data)?;
    let view = state.departments.create(fields).await?;
    Ok(Json(
        ApiResponse::success(view).with_message("Department created successfully"),
    ))
}

/// POST /api/department/:id
pub async fn get_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<DepartmentView>>> {
    let view = state.departments.get(id).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// POST /api/department/update
pub async fn update_department(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateDepartmentRequest>,
) -> AppResult<Json<ApiResponse<DepartmentView>>> {
    let fields: DepartmentFields = parse_data(req.data)?;
    let view = state.departments.update(req.department_id, fields).await?;
    Ok(Json(
        ApiResponse::success(view).with_message("Department updated successfully"),
    ))
}

/// POST /api/department/delete
pub async fn delete_department(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DepartmentIdRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.departments.delete(req.department_id).await?;
    Ok(Json(ApiResponse::success_msg("Department deleted successfully")))
}

/// POST /api/department/copy
pub async fn copy_department(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CopyDepartmentRequest>,
) -> AppResult<Json<ApiResponse<DepartmentView>>> {
    let view = state.departments.copy(req.department_id, req.code).await?;
    Ok(Json(
        ApiResponse::success(view).with_message("Department copied successfully"),
    ))
}

/// POST /api/department/:id/employees
pub async fn department_employees(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let members = state.departments.list_employees(id).await?;
    Ok(Json(ApiResponse::list(project_all(&members, &DEFAULT_FIELDS[..])?)))
}
