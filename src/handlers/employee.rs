//! Employee handlers

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::employee::{ActiveStatus, Model as Employee};
use crate::error::{AppError, AppResult};
use crate::handlers::extract::{ApiJson, ApiPath};
use crate::handlers::{parse_data, project_all};
use crate::routes::ApiResponse;
use crate::service::EmployeeFields;
use crate::state::AppState;
use crate::store::Filter;

/// Fields returned by list and search when none are requested
pub const DEFAULT_FIELDS: [&str; 4] = ["name", "employee_code", "work_email", "department_id"];

#[derive(Debug, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub domain: Filter,
    pub fields: Option<Vec<String>>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub employee_id: i64,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub employee_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}

/// Summary returned by the detail endpoint
#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    pub id: i64,
    pub name: String,
    pub employee_code: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    /// Department name
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub status: ActiveStatus,
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub id: i64,
    pub employee_code: String,
    pub active_status: ActiveStatus,
    pub active: bool,
}

impl From<Employee> for StatusView {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            employee_code: e.employee_code,
            active_status: e.active_status,
            active: e.active,
        }
    }
}

/// POST /api/employee/list
pub async fn list_employees(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ListRequest>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let limit = req.limit.unwrap_or(state.config.api.list_limit);
    let records = state.employees.list(&req.domain, Some(limit)).await?;

    let rows = match &req.fields {
        Some(fields) if !fields.is_empty() => project_all(&records, fields.as_slice())?,
        _ => project_all(&records, &DEFAULT_FIELDS[..])?,
    };
    Ok(Json(ApiResponse::list(rows)))
}

/// POST /api/employee/create
pub async fn create_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let fields: EmployeeFields = parse_data(req.data)?;
    let employee = state.employees.create(fields).await?;

    Ok(Json(
        ApiResponse::success_msg("Employee created successfully")
            .with("employee_id", employee.id)
            .with("employee_code", employee.employee_code),
    ))
}

/// POST /api/employee/:id
pub async fn get_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<EmployeeDetail>>> {
    let employee = state.employees.get(id).await?;

    let department = match employee.department_id {
        Some(dept_id) => match state.departments.get(dept_id).await {
            Ok(view) => Some(view.department.name),
            Err(AppError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        },
        None => None,
    };

    Ok(Json(ApiResponse::success(EmployeeDetail {
        id: employee.id,
        name: employee.name,
        employee_code: employee.employee_code,
        email: employee.work_email,
        mobile: employee.work_phone,
        department,
        job_title: employee.job_title,
        status: employee.active_status,
    })))
}

/// POST /api/employee/update
pub async fn update_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let fields: EmployeeFields = parse_data(req.data)?;
    state.employees.update(req.employee_id, fields).await?;
    Ok(Json(ApiResponse::success_msg("Employee updated successfully")))
}

/// POST /api/employee/delete
pub async fn delete_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<IdRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.employees.delete(req.employee_id).await?;
    Ok(Json(ApiResponse::success_msg("Employee deleted successfully")))
}

/// POST /api/employee/search
pub async fn search_employees(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let records = state
        .employees
        .search(&req.search_term, state.config.api.search_limit)
        .await?;
    Ok(Json(ApiResponse::list(project_all(&records, &DEFAULT_FIELDS[..])?)))
}

/// POST /api/employee/activate
pub async fn activate_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<IdRequest>,
) -> AppResult<Json<ApiResponse<StatusView>>> {
    let employee = state.employees.activate(req.employee_id).await?;
    Ok(Json(ApiResponse::success(employee.into())))
}

/// POST /api/employee/deactivate
pub async fn deactivate_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<IdRequest>,
) -> AppResult<Json<ApiResponse<StatusView>>> {
    let employee = state.employees.deactivate(req.employee_id).await?;
    Ok(Json(ApiResponse::success(employee.into())))
}

/// POST /api/employee/terminate
pub async fn terminate_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<IdRequest>,
) -> AppResult<Json<ApiResponse<StatusView>>> {
    let employee = state.employees.terminate(req.employee_id).await?;
    Ok(Json(ApiResponse::success(employee.into())))
}
