//! Department aggregate

use futures::future::try_join_all;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::entity::department::{DepartmentView, Model as Department};
use crate::entity::employee;
use crate::error::{AppResult, OptionExt};
use crate::store::{Filter, Record, Repository, UnitOfWork};
use crate::validation::{validate_department_code_unique, validate_required};

use super::{merge_fields, nullable};

/// Writable department fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepartmentFields {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub budget: Option<Option<f64>>,
    pub active: Option<bool>,
}

impl DepartmentFields {
    fn apply(self, record: &mut Department) {
        let fields = self;
        merge_fields!(fields => record; name, code, description, budget, active);
    }
}

pub struct DepartmentService {
    departments: Arc<dyn Repository<Department>>,
    employees: Arc<dyn Repository<employee::Model>>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl DepartmentService {
    pub fn new(
        departments: Arc<dyn Repository<Department>>,
        employees: Arc<dyn Repository<employee::Model>>,
        unit_of_work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            departments,
            employees,
            unit_of_work,
        }
    }

    pub async fn create(&self, fields: DepartmentFields) -> AppResult<DepartmentView> {
        let mut record = Department::draft();
        fields.apply(&mut record);
        self.check(&record, true, true).await?;

        let created = self.departments.create(record).await?;
        info!("Department created: id={}, code={}", created.id, created.code);
        Ok(DepartmentView {
            department: created,
            employee_count: 0,
        })
    }

    pub async fn update(&self, id: i64, fields: DepartmentFields) -> AppResult<DepartmentView> {
        let mut record = self.find(id).await?;
        let (name_touched, code_touched) = (fields.name.is_some(), fields.code.is_some());
        fields.apply(&mut record);
        self.check(&record, name_touched, code_touched).await?;

        let updated = self.departments.update(record).await?;
        self.view(updated).await
    }

    /// Copy a department under a new code; codes are never copied.
    pub async fn copy(&self, id: i64, code: String) -> AppResult<DepartmentView> {
        let source = self.find(id).await?;
        let mut record = source.duplicate();
        record.code = code;
        self.check(&record, true, true).await?;

        let created = self.departments.create(record).await?;
        info!("Department {} copied as {}", id, created.id);
        Ok(DepartmentView {
            department: created,
            employee_count: 0,
        })
    }

    /// Delete a department; member employees lose their reference in the
    /// same unit of work.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let record = self.find(id).await?;
        let detached = self.unit_of_work.delete_department(id).await?;
        info!(
            "Department deleted: id={}, code={}, detached {} employees",
            id, record.code, detached
        );
        Ok(())
    }

    pub async fn get(&self, id: i64) -> AppResult<DepartmentView> {
        let record = self.find(id).await?;
        self.view(record).await
    }

    pub async fn list(&self, filter: &Filter, limit: Option<u64>) -> AppResult<Vec<DepartmentView>> {
        let records = self.departments.search(filter, limit).await?;
        try_join_all(records.into_iter().map(|record| self.view(record))).await
    }

    /// Live count of employees referencing the department.
    pub async fn employee_count(&self, id: i64) -> AppResult<u64> {
        self.employees
            .count(&Filter::eq("department_id", id))
            .await
    }

    pub async fn list_employees(&self, id: i64) -> AppResult<Vec<employee::Model>> {
        self.find(id).await?;
        self.employees
            .search(&Filter::eq("department_id", id), None)
            .await
    }

    async fn find(&self, id: i64) -> AppResult<Department> {
        self.departments
            .read(id)
            .await?
            .ok_or_not_found(Department::MODEL, id)
    }

    async fn view(&self, department: Department) -> AppResult<DepartmentView> {
        let employee_count = self.employee_count(department.id).await?;
        Ok(DepartmentView {
            department,
            employee_count,
        })
    }

    async fn check(&self, record: &Department, name: bool, code: bool) -> AppResult<()> {
        if name {
            validate_required("Department name", &record.name)?;
        }
        if code {
            validate_required("Department code", &record.code)?;
            let holders = self
                .departments
                .search(&Filter::eq("code", record.code.as_str()), None)
                .await?;
            let self_id = (record.id != 0).then_some(record.id);
            validate_department_code_unique(
                &record.code,
                self_id,
                holders.iter().map(|d| (d.id, d.code.as_str())),
            )?;
        }
        Ok(())
    }
}
