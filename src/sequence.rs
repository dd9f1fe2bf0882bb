//! Code sequences
//!
//! A [`Sequence`] hands out a fresh token per call, formatted as a prefix
//! followed by a zero-padded counter (`EMP0001`). Allocation is serialized
//! per sequence name so concurrent callers never share a value.

use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};

use crate::config::SequenceConfig;
use crate::error::{AppError, AppResult};

/// Sequence used for employee codes
pub const EMPLOYEE_CODE_SEQUENCE: &str = "hr.employee.code";

#[async_trait]
pub trait Sequence: Send + Sync {
    async fn next_value(&self, name: &str) -> AppResult<String>;
}

/// Token layout shared by the sequence backends
#[derive(Debug, Clone)]
pub struct CodeFormat {
    pub prefix: String,
    pub padding: usize,
}

impl CodeFormat {
    pub fn render(&self, number: u64) -> String {
        format!("{}{:0width$}", self.prefix, number, width = self.padding)
    }
}

impl From<&SequenceConfig> for CodeFormat {
    fn from(config: &SequenceConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            padding: config.padding,
        }
    }
}

/// In-process counters
pub struct MemorySequence {
    format: CodeFormat,
    counters: DashMap<String, u64>,
}

impl MemorySequence {
    pub fn new(format: CodeFormat) -> Self {
        Self {
            format,
            counters: DashMap::new(),
        }
    }
}

#[async_trait]
impl Sequence for MemorySequence {
    async fn next_value(&self, name: &str) -> AppResult<String> {
        // The entry guard holds the shard lock across the increment
        let mut counter = self.counters.entry(name.to_string()).or_insert(0);
        *counter += 1;
        Ok(self.format.render(*counter))
    }
}

/// Counters kept in the `hr_sequence` table
pub struct DbSequence {
    db: DatabaseConnection,
    format: CodeFormat,
}

const NEXT_VALUE_SQL: &str = r#"INSERT INTO hr_sequence (code, number_next) VALUES ($1, 1)
ON CONFLICT (code) DO UPDATE SET number_next = hr_sequence.number_next + 1
RETURNING number_next"#;

impl DbSequence {
    pub fn new(db: DatabaseConnection, format: CodeFormat) -> Self {
        Self { db, format }
    }
}

#[async_trait]
impl Sequence for DbSequence {
    async fn next_value(&self, name: &str) -> AppResult<String> {
        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, NEXT_VALUE_SQL, [name.into()]);
        let row = self
            .db
            .query_one(stmt)
            .await?
            .ok_or_else(|| AppError::Allocation(format!("no value returned for {}", name)))?;
        let number: i64 = row.try_get("", "number_next")?;
        let number = u64::try_from(number)
            .map_err(|_| AppError::Allocation(format!("negative counter for {}", name)))?;
        Ok(self.format.render(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn format() -> CodeFormat {
        CodeFormat {
            prefix: "EMP".to_string(),
            padding: 4,
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(format().render(7), "EMP0007");
        assert_eq!(format().render(12345), "EMP12345");
    }

    #[tokio::test]
    async fn test_sequences_are_independent() {
        let seq = MemorySequence::new(format());
        assert_eq!(seq.next_value("a").await.unwrap(), "EMP0001");
        assert_eq!(seq.next_value("a").await.unwrap(), "EMP0002");
        assert_eq!(seq.next_value("b").await.unwrap(), "EMP0001");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_allocation_is_unique() {
        let seq = Arc::new(MemorySequence::new(format()));
        let handles: Vec<_> = (0..200)
            .map(|_| {
                let seq = seq.clone();
                tokio::spawn(async move { seq.next_value(EMPLOYEE_CODE_SEQUENCE).await.unwrap() })
            })
            .collect();

        let mut codes = HashSet::new();
        for handle in handles {
            assert!(codes.insert(handle.await.unwrap()));
        }
        assert_eq!(codes.len(), 200);
    }
}
