use std::sync::Arc;
use tracing::info;

use crate::config::{Config, StorageKind};
use crate::db;
use crate::entity::{department, employee};
use crate::sequence::{CodeFormat, DbSequence, MemorySequence, Sequence};
use crate::service::{DepartmentService, EmployeeService};
use crate::store::{DbStore, MemoryTable, MemoryUnitOfWork, Repository, UnitOfWork};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Employee lifecycle
    pub employees: Arc<EmployeeService>,
    /// Department aggregate
    pub departments: Arc<DepartmentService>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire services over the given collaborators
    pub fn new(
        employees: Arc<dyn Repository<employee::Model>>,
        departments: Arc<dyn Repository<department::Model>>,
        sequence: Arc<dyn Sequence>,
        unit_of_work: Arc<dyn UnitOfWork>,
        config: Config,
    ) -> Self {
        Self {
            employees: Arc::new(EmployeeService::new(
                employees.clone(),
                departments.clone(),
                sequence,
            )),
            departments: Arc::new(DepartmentService::new(departments, employees, unit_of_work)),
            config: Arc::new(config),
        }
    }

    /// State backed by process memory
    pub fn in_memory(config: Config) -> Self {
        let sequence = MemorySequence::new(CodeFormat::from(&config.sequence));
        let employees = Arc::new(MemoryTable::<employee::Model>::new());
        let departments = Arc::new(MemoryTable::<department::Model>::new());
        let unit_of_work = MemoryUnitOfWork::new(employees.clone(), departments.clone());
        Self::new(
            employees,
            departments,
            Arc::new(sequence),
            Arc::new(unit_of_work),
            config,
        )
    }

    /// State for the configured storage backend
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        match config.storage {
            StorageKind::Memory => {
                info!("Using in-memory storage; records are lost on exit");
                Ok(Self::in_memory(config))
            }
            StorageKind::Postgres => {
                let conn = db::init_database(&config.database).await.map_err(|e| {
                    tracing::error!("Database initialization failed: {}", e);
                    anyhow::anyhow!("Database initialization failed: {}", e)
                })?;
                let store = Arc::new(DbStore::new(conn.clone()));
                let sequence = DbSequence::new(conn, CodeFormat::from(&config.sequence));
                Ok(Self::new(
                    store.clone(),
                    store.clone(),
                    Arc::new(sequence),
                    store,
                    config,
                ))
            }
        }
    }
}
