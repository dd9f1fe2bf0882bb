//! Employee record lifecycle

use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::derived::{compute_age, compute_total_experience, today};
use crate::entity::employee::{
    is_assigned_code, ActiveStatus, BloodGroup, EmployeeType, Gender, MaritalStatus,
    Model as Employee, SENTINEL_CODE,
};
use crate::entity::department;
use crate::error::{AppError, AppResult, OptionExt};
use crate::sequence::{Sequence, EMPLOYEE_CODE_SEQUENCE};
use crate::store::{Filter, Record, Repository};
use crate::validation::{
    validate_email, validate_pan, validate_phone, validate_required, ValidationError,
};

use super::{merge_fields, nullable};

/// Writable employee fields; absent keys leave the record untouched and
/// `null` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeFields {
    pub employee_code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub job_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub work_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub work_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub personal_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub personal_mobile: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub emergency_contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub emergency_contact_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub current_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub permanent_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Option<Option<Gender>>,
    #[serde(default, deserialize_with = "nullable")]
    pub blood_group: Option<Option<BloodGroup>>,
    #[serde(default, deserialize_with = "nullable")]
    pub marital_status: Option<Option<MaritalStatus>>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_of_joining: Option<Option<NaiveDate>>,
    pub employee_type: Option<EmployeeType>,
    pub probation_period: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub confirmation_date: Option<Option<NaiveDate>>,
    pub notice_period: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub qualification: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub skills: Option<Option<String>>,
    pub previous_experience: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub bank_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub bank_account_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub bank_ifsc_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub pan_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub aadhar_number: Option<Option<String>>,
    pub active_status: Option<ActiveStatus>,
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub department_id: Option<Option<i64>>,
}

/// Which guarded field groups a write touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Touched {
    name: bool,
    email: bool,
    phone: bool,
    pan: bool,
    department: bool,
}

impl Touched {
    fn all() -> Self {
        Self {
            name: true,
            email: true,
            phone: true,
            pan: true,
            department: true,
        }
    }
}

impl EmployeeFields {
    fn touched(&self) -> Touched {
        Touched {
            name: self.name.is_some(),
            email: self.personal_email.is_some() || self.work_email.is_some(),
            phone: self.personal_mobile.is_some() || self.work_phone.is_some(),
            pan: self.pan_number.is_some(),
            department: self.department_id.is_some(),
        }
    }

    /// Merge every present field except the code onto `record`.
    fn apply(self, record: &mut Employee) {
        let fields = self;
        merge_fields!(fields => record;
            name, job_title, work_email, work_phone, personal_email, personal_mobile,
            emergency_contact_name, emergency_contact_number, current_address,
            permanent_address, date_of_birth, gender, blood_group, marital_status,
            date_of_joining, employee_type, probation_period, confirmation_date,
            notice_period, qualification, skills, previous_experience, bank_name,
            bank_account_number, bank_ifsc_code, pan_number, aadhar_number,
            active_status, active, department_id,
        );

        // Blank text counts as unset
        for value in [
            &mut record.work_email,
            &mut record.work_phone,
            &mut record.personal_email,
            &mut record.personal_mobile,
            &mut record.pan_number,
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }
    }
}

/// Store the derived fields for `today`.
pub fn recompute(record: &mut Employee, today: NaiveDate) {
    record.age = compute_age(record.date_of_birth, today);
    record.total_experience =
        compute_total_experience(record.date_of_joining, record.previous_experience, today);
}

fn check_fields(record: &Employee, touched: Touched) -> Result<(), ValidationError> {
    if touched.name {
        validate_required("Name", &record.name)?;
    }
    if touched.email {
        validate_email("personal email", record.personal_email.as_deref())?;
        validate_email("work email", record.work_email.as_deref())?;
    }
    if touched.phone {
        validate_phone("Personal mobile", record.personal_mobile.as_deref())?;
        validate_phone("Work phone", record.work_phone.as_deref())?;
    }
    if touched.pan {
        validate_pan(record.pan_number.as_deref())?;
    }
    Ok(())
}

/// Sequence values tried before falling back to the placeholder
const MAX_CODE_DRAWS: usize = 100;

pub struct EmployeeService {
    employees: Arc<dyn Repository<Employee>>,
    departments: Arc<dyn Repository<department::Model>>,
    sequence: Arc<dyn Sequence>,
}

impl EmployeeService {
    pub fn new(
        employees: Arc<dyn Repository<Employee>>,
        departments: Arc<dyn Repository<department::Model>>,
        sequence: Arc<dyn Sequence>,
    ) -> Self {
        Self {
            employees,
            departments,
            sequence,
        }
    }

    /// Create an employee, assigning a sequence code unless one is supplied.
    pub async fn create(&self, mut fields: EmployeeFields) -> AppResult<Employee> {
        let requested = fields.employee_code.take();
        let mut record = Employee::draft();

        record.employee_code = match requested {
            Some(code) if is_assigned_code(&code) => {
                let code = code.trim().to_string();
                self.ensure_code_free(&code, None).await?;
                code
            }
            _ => self.allocate_code().await?,
        };

        fields.apply(&mut record);
        recompute(&mut record, today());
        self.check(&record, Touched::all()).await?;

        let created = self.employees.create(record).await?;
        info!(
            "Employee created: id={}, code={}",
            created.id, created.employee_code
        );
        Ok(created)
    }

    /// Merge `fields` into an existing employee.
    pub async fn update(&self, id: i64, mut fields: EmployeeFields) -> AppResult<Employee> {
        let mut record = self.find(id).await?;

        if let Some(code) = fields.employee_code.take() {
            let code = code.trim();
            if record.has_code() {
                validate_required("Employee code", code)?;
                if code != record.employee_code {
                    return Err(ValidationError::ImmutableCode.into());
                }
            } else if is_assigned_code(code) {
                self.ensure_code_free(code, Some(id)).await?;
                record.employee_code = code.to_string();
            }
        }

        let touched = fields.touched();
        fields.apply(&mut record);
        recompute(&mut record, today());
        self.check(&record, touched).await?;

        let updated = self.employees.update(record).await?;
        debug!("Employee updated: id={}", id);
        Ok(updated)
    }

    /// Remove an employee permanently.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let record = self.find(id).await?;
        self.employees.delete(id).await?;
        info!("Employee deleted: id={}, code={}", id, record.employee_code);
        Ok(())
    }

    pub async fn activate(&self, id: i64) -> AppResult<Employee> {
        self.set_status(id, ActiveStatus::Active, true).await
    }

    pub async fn deactivate(&self, id: i64) -> AppResult<Employee> {
        self.set_status(id, ActiveStatus::Inactive, false).await
    }

    pub async fn terminate(&self, id: i64) -> AppResult<Employee> {
        self.set_status(id, ActiveStatus::Terminated, false).await
    }

    /// Employee by id with fresh derived fields.
    pub async fn get(&self, id: i64) -> AppResult<Employee> {
        let mut record = self.find(id).await?;
        recompute(&mut record, today());
        Ok(record)
    }

    pub async fn list(&self, filter: &Filter, limit: Option<u64>) -> AppResult<Vec<Employee>> {
        let mut records = self.employees.search(filter, limit).await?;
        let today = today();
        for record in &mut records {
            recompute(record, today);
        }
        Ok(records)
    }

    /// Case-insensitive match on name, code or work email.
    pub async fn search(&self, term: &str, limit: u64) -> AppResult<Vec<Employee>> {
        let filter = Filter::Or(vec![
            Filter::ilike("name", term),
            Filter::ilike("employee_code", term),
            Filter::ilike("work_email", term),
        ]);
        self.list(&filter, Some(limit)).await
    }

    async fn find(&self, id: i64) -> AppResult<Employee> {
        self.employees
            .read(id)
            .await?
            .ok_or_not_found(Employee::MODEL, id)
    }

    async fn set_status(&self, id: i64, status: ActiveStatus, enabled: bool) -> AppResult<Employee> {
        let mut record = self.find(id).await?;
        let previous = record.active_status;

        record.active_status = status;
        record.active = enabled;
        recompute(&mut record, today());
        let updated = self.employees.update(record).await?;

        if previous != status {
            info!(
                "Employee {} status changed: {} -> {}",
                id,
                previous.as_str(),
                status.as_str()
            );
        }
        Ok(updated)
    }

    /// Draw sequence values until one is not already held, e.g. by a
    /// caller-supplied code. Sequence failures keep the placeholder.
    async fn allocate_code(&self) -> AppResult<String> {
        for _ in 0..MAX_CODE_DRAWS {
            let code = match self.sequence.next_value(EMPLOYEE_CODE_SEQUENCE).await {
                Ok(code) => code,
                Err(e) => {
                    warn!("Employee code allocation failed, keeping placeholder: {}", e);
                    return Ok(SENTINEL_CODE.to_string());
                }
            };
            if self.code_is_free(&code, None).await? {
                return Ok(code);
            }
            debug!("Employee code {} already taken, drawing again", code);
        }
        warn!(
            "No free employee code after {} draws, keeping placeholder",
            MAX_CODE_DRAWS
        );
        Ok(SENTINEL_CODE.to_string())
    }

    async fn code_is_free(&self, code: &str, self_id: Option<i64>) -> AppResult<bool> {
        let holders = self
            .employees
            .search(&Filter::eq("employee_code", code), None)
            .await?;
        Ok(holders.iter().all(|e| Some(e.id) == self_id))
    }

    async fn ensure_code_free(&self, code: &str, self_id: Option<i64>) -> AppResult<()> {
        if !self.code_is_free(code, self_id).await? {
            return Err(ValidationError::DuplicateEmployeeCode(code.to_string()).into());
        }
        Ok(())
    }

    async fn check(&self, record: &Employee, touched: Touched) -> AppResult<()> {
        check_fields(record, touched)?;
        if touched.department {
            if let Some(dept_id) = record.department_id {
                if !self.departments.exists(dept_id).await? {
                    return Err(AppError::not_found(department::Model::MODEL, dept_id));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{CodeFormat, MemorySequence};
    use crate::store::MemoryTable;
    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::json;
    use std::collections::HashSet;
    use tokio_test::{assert_err, assert_ok};

    struct BrokenSequence;

    #[async_trait]
    impl Sequence for BrokenSequence {
        async fn next_value(&self, name: &str) -> AppResult<String> {
            Err(AppError::Allocation(format!("{} unavailable", name)))
        }
    }

    struct Fixture {
        service: Arc<EmployeeService>,
        departments: Arc<MemoryTable<department::Model>>,
    }

    fn fixture_with(sequence: Arc<dyn Sequence>) -> Fixture {
        let departments: Arc<MemoryTable<department::Model>> = Arc::new(MemoryTable::new());
        let service = EmployeeService::new(
            Arc::new(MemoryTable::<Employee>::new()),
            departments.clone(),
            sequence,
        );
        Fixture {
            service: Arc::new(service),
            departments,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(MemorySequence::new(CodeFormat {
            prefix: "EMP".to_string(),
            padding: 4,
        })))
    }

    fn fields(value: serde_json::Value) -> EmployeeFields {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_code_and_defaults() {
        let fx = fixture();
        let emp = assert_ok!(fx.service.create(fields(json!({"name": "Asha Mehta"}))).await);
        assert_eq!(emp.employee_code, "EMP0001");
        assert_eq!(emp.notice_period, 30);
        assert_eq!(emp.active_status, ActiveStatus::Active);

        let read_back = fx.service.get(emp.id).await.unwrap();
        assert!(read_back.has_code());
        assert_eq!(read_back.employee_code, emp.employee_code);
    }

    #[tokio::test]
    async fn test_create_with_sentinel_code_allocates() {
        let fx = fixture();
        let emp = fx
            .service
            .create(fields(json!({"name": "Ravi", "employee_code": "New"})))
            .await
            .unwrap();
        assert_eq!(emp.employee_code, "EMP0001");
    }

    #[tokio::test]
    async fn test_supplied_code_is_kept_and_must_be_unique() {
        let fx = fixture();
        let emp = fx
            .service
            .create(fields(json!({"name": "Ravi", "employee_code": "X-1"})))
            .await
            .unwrap();
        assert_eq!(emp.employee_code, "X-1");

        let err = assert_err!(
            fx.service
                .create(fields(json!({"name": "Mira", "employee_code": "X-1"})))
                .await
        );
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::DuplicateEmployeeCode(_))
        ));
    }

    #[tokio::test]
    async fn test_allocation_failure_falls_back_to_sentinel() {
        let fx = fixture_with(Arc::new(BrokenSequence));
        let emp = fx.service.create(fields(json!({"name": "Asha"}))).await.unwrap();
        assert_eq!(emp.employee_code, SENTINEL_CODE);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let fx = fixture();
        let cases = [
            json!({"name": "A", "work_email": "not-an-email"}),
            json!({"name": "A", "personal_email": "a@b"}),
            json!({"name": "A", "personal_mobile": "98765432"}),
            json!({"name": "A", "work_phone": "987654321A"}),
            json!({"name": "A", "pan_number": "ABCD1234F"}),
            json!({"name": "  "}),
        ];
        for case in cases {
            let result = fx.service.create(fields(case.clone())).await;
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "{} -> {:?}",
                case,
                result
            );
        }
        // Nothing was persisted
        assert!(fx.service.list(&Filter::All, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lowercase_pan_accepted() {
        let fx = fixture();
        let emp = fx
            .service
            .create(fields(json!({"name": "A", "pan_number": "abcde1234f"})))
            .await;
        assert_ok!(emp);
    }

    #[tokio::test]
    async fn test_unknown_department_rejected() {
        let fx = fixture();
        let result = fx
            .service
            .create(fields(json!({"name": "A", "department_id": 42})))
            .await;
        assert!(matches!(
            result,
            Err(AppError::NotFound { model: "Department", id: 42 })
        ));

        let dept = fx
            .departments
            .create(department::Model {
                name: "Engineering".to_string(),
                code: "ENG".to_string(),
                ..department::Model::draft()
            })
            .await
            .unwrap();
        let emp = fx
            .service
            .create(fields(json!({"name": "A", "department_id": dept.id})))
            .await
            .unwrap();
        assert_eq!(emp.department_id, Some(dept.id));
    }

    #[tokio::test]
    async fn test_derived_fields_recomputed_on_write() {
        let fx = fixture();
        let today = today();
        let joined = today - Duration::days(730);
        let emp = fx
            .service
            .create(fields(json!({
                "name": "A",
                "date_of_joining": joined,
                "previous_experience": 3.0,
            })))
            .await
            .unwrap();
        assert!((emp.total_experience - 5.0).abs() < 0.01);

        let born = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let emp = fx
            .service
            .update(emp.id, fields(json!({"date_of_birth": born})))
            .await
            .unwrap();
        assert_eq!(emp.age, compute_age(Some(born), today));

        let emp = fx
            .service
            .update(emp.id, fields(json!({"date_of_birth": null, "date_of_joining": null})))
            .await
            .unwrap();
        assert_eq!(emp.age, 0);
        assert_eq!(emp.total_experience, 3.0);
    }

    #[tokio::test]
    async fn test_update_validates_touched_fields() {
        let fx = fixture();
        let emp = fx.service.create(fields(json!({"name": "A"}))).await.unwrap();

        let err = fx
            .service
            .update(emp.id, fields(json!({"work_phone": "12345"})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Work phone must be at least 10 digits!");

        // Failed write left the record untouched
        assert_eq!(fx.service.get(emp.id).await.unwrap().work_phone, None);

        let emp = fx
            .service
            .update(emp.id, fields(json!({"work_phone": "9876543210", "job_title": "Engineer"})))
            .await
            .unwrap();
        assert_eq!(emp.work_phone.as_deref(), Some("9876543210"));
        assert_eq!(emp.job_title.as_deref(), Some("Engineer"));
    }

    #[tokio::test]
    async fn test_blank_contact_fields_are_cleared() {
        let fx = fixture();
        let emp = fx
            .service
            .create(fields(json!({"name": "A", "work_email": "", "personal_mobile": " "})))
            .await
            .unwrap();
        assert_eq!(emp.work_email, None);
        assert_eq!(emp.personal_mobile, None);
    }

    #[tokio::test]
    async fn test_code_is_immutable_once_assigned() {
        let fx = fixture();
        let emp = fx.service.create(fields(json!({"name": "A"}))).await.unwrap();

        let err = fx
            .service
            .update(emp.id, fields(json!({"employee_code": "OTHER"})))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::ImmutableCode)));

        // Re-saving the same code is a no-op
        let same = fx
            .service
            .update(emp.id, fields(json!({"employee_code": emp.employee_code.clone()})))
            .await
            .unwrap();
        assert_eq!(same.employee_code, emp.employee_code);
    }

    #[tokio::test]
    async fn test_sentinel_code_can_be_set_later() {
        let fx = fixture_with(Arc::new(BrokenSequence));
        let emp = fx.service.create(fields(json!({"name": "A"}))).await.unwrap();
        let emp = fx
            .service
            .update(emp.id, fields(json!({"employee_code": "MANUAL-7"})))
            .await
            .unwrap();
        assert_eq!(emp.employee_code, "MANUAL-7");
    }

    #[tokio::test]
    async fn test_allocation_skips_supplied_codes() {
        let fx = fixture();
        let a = fx
            .service
            .create(fields(json!({"name": "A", "employee_code": "EMP0001"})))
            .await
            .unwrap();
        let b = fx.service.create(fields(json!({"name": "B"}))).await.unwrap();
        assert_eq!(a.employee_code, "EMP0001");
        assert_eq!(b.employee_code, "EMP0002");
    }

    #[tokio::test]
    async fn test_blank_code_is_allocated() {
        let fx = fixture();
        let emp = fx
            .service
            .create(fields(json!({"name": "A", "employee_code": "  "})))
            .await
            .unwrap();
        assert_eq!(emp.employee_code, "EMP0001");
        assert!(emp.has_code());
    }

    #[tokio::test]
    async fn test_blank_code_cannot_replace_assigned() {
        let fx = fixture();
        let emp = fx.service.create(fields(json!({"name": "A"}))).await.unwrap();
        let err = fx
            .service
            .update(emp.id, fields(json!({"employee_code": ""})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Employee code is required!");
        assert_eq!(fx.service.get(emp.id).await.unwrap().employee_code, "EMP0001");
    }

    #[tokio::test]
    async fn test_blank_code_on_placeholder_is_ignored() {
        let fx = fixture_with(Arc::new(BrokenSequence));
        let emp = fx.service.create(fields(json!({"name": "A"}))).await.unwrap();
        let emp = fx
            .service
            .update(emp.id, fields(json!({"employee_code": " "})))
            .await
            .unwrap();
        assert_eq!(emp.employee_code, SENTINEL_CODE);
    }

    #[tokio::test]
    async fn test_missing_records() {
        let fx = fixture();
        assert!(matches!(
            fx.service.delete(99).await,
            Err(AppError::NotFound { model: "Employee", id: 99 })
        ));

        let emp = fx.service.create(fields(json!({"name": "A"}))).await.unwrap();
        fx.service.delete(emp.id).await.unwrap();
        assert!(matches!(
            fx.service.update(emp.id, fields(json!({"name": "B"}))).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            fx.service.activate(emp.id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_status_actions() {
        let fx = fixture();
        let emp = fx.service.create(fields(json!({"name": "A"}))).await.unwrap();

        let once = fx.service.activate(emp.id).await.unwrap();
        let twice = fx.service.activate(emp.id).await.unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.active_status, ActiveStatus::Active);
        assert!(twice.active);

        let off = fx.service.deactivate(emp.id).await.unwrap();
        assert_eq!(off.active_status, ActiveStatus::Inactive);
        assert!(!off.active);

        let gone = fx.service.terminate(emp.id).await.unwrap();
        assert_eq!(gone.active_status, ActiveStatus::Terminated);
        assert!(!gone.active);

        // No transition guard: a terminated employee can be reactivated
        let back = fx.service.activate(emp.id).await.unwrap();
        assert_eq!(back.active_status, ActiveStatus::Active);
        assert!(back.active);
    }

    #[tokio::test]
    async fn test_terminate_from_on_leave() {
        let fx = fixture();
        let emp = fx
            .service
            .create(fields(json!({"name": "A", "active_status": "on_leave"})))
            .await
            .unwrap();
        let gone = fx.service.terminate(emp.id).await.unwrap();
        assert!(!gone.active);
    }

    #[tokio::test]
    async fn test_search_term() {
        let fx = fixture();
        for (name, email) in [
            ("Asha Mehta", "asha@dayflow.io"),
            ("Ravi Kumar", "ravi@dayflow.io"),
            ("Mira Shah", "mshah@example.com"),
        ] {
            fx.service
                .create(fields(json!({"name": name, "work_email": email})))
                .await
                .unwrap();
        }

        let hits = fx.service.search("DAYFLOW", 50).await.unwrap();
        assert_eq!(hits.len(), 2);
        let hits = fx.service.search("emp0003", 50).await.unwrap();
        assert_eq!(hits[0].name, "Mira Shah");
        let hits = fx.service.search("kumar", 50).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(fx.service.search("", 2).await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_codes() {
        let fx = fixture();
        let handles: Vec<_> = (0..50)
            .map(|i| {
                let service = fx.service.clone();
                tokio::spawn(async move {
                    service
                        .create(fields(json!({"name": format!("Employee {}", i)})))
                        .await
                        .unwrap()
                        .employee_code
                })
            })
            .collect();

        let mut codes = HashSet::new();
        for handle in handles {
            assert!(codes.insert(handle.await.unwrap()));
        }
        assert_eq!(codes.len(), 50);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<EmployeeFields, _> = serde_json::from_value(json!({"salary": 10}));
        assert!(result.is_err());
        let result: Result<EmployeeFields, _> = serde_json::from_value(json!({"age": 10}));
        assert!(result.is_err());
    }

    #[test]
    fn test_null_distinguished_from_absent() {
        let patch = fields(json!({"work_email": null}));
        assert_eq!(patch.work_email, Some(None));
        assert_eq!(patch.personal_email, None);
    }
}
