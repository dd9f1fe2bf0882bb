//! Persistence layer
//!
//! Records are stored by numeric id and searched with [`Filter`]
//! predicates. Two backends implement [`Repository`]: an in-process table
//! and a SeaORM database store.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{AppError, AppResult};

pub mod database;
pub mod filter;
pub mod memory;

pub use database::DbStore;
pub use filter::Filter;
pub use memory::{MemoryTable, MemoryUnitOfWork};

/// A persisted model addressable by numeric id
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Model name used in error messages
    const MODEL: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Whether `name` is a stored field of this model
    fn has_field(name: &str) -> bool;

    /// Value that must not repeat across the table, if any
    fn unique_key(&self) -> Option<&str> {
        None
    }

    /// Error reported when `unique_key` collides with a stored record
    fn duplicate_error(&self) -> AppError {
        AppError::BadRequest(format!("Duplicate {}", Self::MODEL))
    }
}

/// Storage operations for one model
#[async_trait]
pub trait Repository<M: Record>: Send + Sync {
    /// Insert a record; the returned copy carries the assigned id.
    async fn create(&self, record: M) -> AppResult<M>;

    async fn read(&self, id: i64) -> AppResult<Option<M>>;

    /// Overwrite the stored record with the same id.
    async fn update(&self, record: M) -> AppResult<M>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Matching records ordered by id.
    async fn search(&self, filter: &Filter, limit: Option<u64>) -> AppResult<Vec<M>>;

    async fn count(&self, filter: &Filter) -> AppResult<u64>;

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.read(id).await?.is_some())
    }
}

/// Writes spanning the employee and department tables that must land
/// together or not at all
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Clear every member's department reference and delete the department.
    /// Returns the number of detached employees.
    async fn delete_department(&self, id: i64) -> AppResult<u64>;
}
