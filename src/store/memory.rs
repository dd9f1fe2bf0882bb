//! In-process record storage

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use crate::entity::{department, employee};
use crate::error::{AppError, AppResult};
use crate::store::{Filter, Record, Repository, UnitOfWork};

/// One table of records keyed by id
pub struct MemoryTable<M> {
    rows: DashMap<i64, M>,
    next_id: AtomicI64,
    /// Serializes writes so the unique-key check and the write are one step
    writes: Mutex<()>,
}

impl<M: Record> MemoryTable<M> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
            writes: Mutex::new(()),
        }
    }

    /// Insert or replace `record`, rejecting a unique key held by another row.
    fn write(&self, record: M, insert: bool) -> AppResult<M> {
        let _guard = self.writes.lock().unwrap_or_else(|e| e.into_inner());

        if !insert && !self.rows.contains_key(&record.id()) {
            return Err(AppError::not_found(M::MODEL, record.id()));
        }
        if let Some(key) = record.unique_key() {
            let taken = self
                .rows
                .iter()
                .any(|row| row.id() != record.id() && row.unique_key() == Some(key));
            if taken {
                return Err(record.duplicate_error());
            }
        }

        let mut record = record;
        if insert {
            record.set_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        }
        self.rows.insert(record.id(), record.clone());
        Ok(record)
    }

    fn matching(&self, filter: &Filter) -> AppResult<Vec<M>> {
        filter.check::<M>()?;
        let mut found = Vec::new();
        for row in self.rows.iter() {
            let json = serde_json::to_value(row.value())?;
            if filter.matches(&json) {
                found.push(row.value().clone());
            }
        }
        found.sort_by_key(|r| r.id());
        Ok(found)
    }
}

impl<M: Record> Default for MemoryTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M: Record> Repository<M> for MemoryTable<M> {
    async fn create(&self, record: M) -> AppResult<M> {
        self.write(record, true)
    }

    async fn read(&self, id: i64) -> AppResult<Option<M>> {
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }

    async fn update(&self, record: M) -> AppResult<M> {
        self.write(record, false)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(M::MODEL, id))
    }

    async fn search(&self, filter: &Filter, limit: Option<u64>) -> AppResult<Vec<M>> {
        let mut found = self.matching(filter)?;
        if let Some(limit) = limit {
            found.truncate(limit as usize);
        }
        Ok(found)
    }

    async fn count(&self, filter: &Filter) -> AppResult<u64> {
        Ok(self.matching(filter)?.len() as u64)
    }
}

/// Cross-table writes over the in-memory tables
pub struct MemoryUnitOfWork {
    employees: Arc<MemoryTable<employee::Model>>,
    departments: Arc<MemoryTable<department::Model>>,
}

impl MemoryUnitOfWork {
    pub fn new(
        employees: Arc<MemoryTable<employee::Model>>,
        departments: Arc<MemoryTable<department::Model>>,
    ) -> Self {
        Self {
            employees,
            departments,
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn delete_department(&self, id: i64) -> AppResult<u64> {
        if !self.departments.rows.contains_key(&id) {
            return Err(AppError::not_found(department::Model::MODEL, id));
        }

        let mut detached = 0;
        for mut row in self.employees.rows.iter_mut() {
            if row.department_id == Some(id) {
                row.department_id = None;
                detached += 1;
            }
        }

        self.departments
            .rows
            .remove(&id)
            .ok_or_else(|| AppError::not_found(department::Model::MODEL, id))?;
        Ok(detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::department;

    fn dept(code: &str) -> department::Model {
        department::Model {
            name: format!("{} dept", code),
            code: code.to_string(),
            ..department::Model::draft()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let table: MemoryTable<department::Model> = MemoryTable::new();
        let a = table.create(dept("ENG")).await.unwrap();
        let b = table.create(dept("HR")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(table.read(2).await.unwrap().unwrap().code, "HR");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let table: MemoryTable<department::Model> = MemoryTable::new();
        let mut ghost = dept("X");
        ghost.id = 9;
        assert!(matches!(table.update(ghost).await, Err(AppError::NotFound { .. })));
        assert!(matches!(table.delete(9).await, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_search_orders_and_limits() {
        let table: MemoryTable<department::Model> = MemoryTable::new();
        for code in ["ENG", "OPS", "ENG-QA"] {
            table.create(dept(code)).await.unwrap();
        }
        let found = table.search(&Filter::ilike("code", "eng"), None).await.unwrap();
        let codes: Vec<_> = found.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, ["ENG", "ENG-QA"]);

        let limited = table.search(&Filter::All, Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(table.count(&Filter::All).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unique_key_enforced_on_write() {
        let table: MemoryTable<department::Model> = MemoryTable::new();
        table.create(dept("ENG")).await.unwrap();
        let mut ops = table.create(dept("OPS")).await.unwrap();

        let err = table.create(dept("ENG")).await.unwrap_err();
        assert_eq!(err.public_message(), "Department code must be unique!");

        ops.code = "ENG".to_string();
        assert!(matches!(table.update(ops.clone()).await, Err(AppError::Validation(_))));

        ops.code = "OPS".to_string();
        ops.budget = Some(5.0);
        assert_eq!(table.update(ops).await.unwrap().budget, Some(5.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_keep_key_unique() {
        let table: Arc<MemoryTable<department::Model>> = Arc::new(MemoryTable::new());
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let table = table.clone();
                tokio::spawn(async move { table.create(dept("ENG")).await.is_ok() })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(table.count(&Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unit_of_work_detaches_members() {
        let employees: Arc<MemoryTable<employee::Model>> = Arc::new(MemoryTable::new());
        let departments: Arc<MemoryTable<department::Model>> = Arc::new(MemoryTable::new());
        let eng = departments.create(dept("ENG")).await.unwrap();

        for code in ["E1", "E2"] {
            employees
                .create(employee::Model {
                    name: code.to_string(),
                    employee_code: code.to_string(),
                    department_id: Some(eng.id),
                    ..employee::Model::draft()
                })
                .await
                .unwrap();
        }

        let uow = MemoryUnitOfWork::new(employees.clone(), departments.clone());
        assert_eq!(uow.delete_department(eng.id).await.unwrap(), 2);
        assert_eq!(employees.count(&Filter::eq("department_id", eng.id)).await.unwrap(), 0);
        assert!(departments.read(eng.id).await.unwrap().is_none());
        assert!(matches!(
            uow.delete_department(eng.id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_field() {
        let table: MemoryTable<department::Model> = MemoryTable::new();
        let result = table.search(&Filter::eq("headcount", 1), None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
