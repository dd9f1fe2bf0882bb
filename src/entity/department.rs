//! Department entity - organizational unit
//!
//! Table: hr_department

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{IdenStatic, Iterable};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::store::Record;
use crate::validation::ValidationError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hr_department")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    /// Unique department code
    #[sea_orm(column_type = "Text", unique)]
    pub code: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub budget: Option<f64>,

    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn draft() -> Self {
        Self {
            id: 0,
            name: String::new(),
            code: String::new(),
            description: None,
            budget: None,
            active: true,
        }
    }

    /// Active model with every column marked for writing.
    pub fn into_active_model_set(self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id),
            name: Set(self.name),
            code: Set(self.code),
            description: Set(self.description),
            budget: Set(self.budget),
            active: Set(self.active),
        }
    }

    /// Copy for duplication; the code is not carried over.
    pub fn duplicate(&self) -> Self {
        Self {
            id: 0,
            code: String::new(),
            ..self.clone()
        }
    }
}

impl Record for Model {
    const MODEL: &'static str = "Department";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn has_field(name: &str) -> bool {
        Column::iter().any(|column| column.as_str() == name)
    }

    fn unique_key(&self) -> Option<&str> {
        Some(self.code.as_str())
    }

    fn duplicate_error(&self) -> AppError {
        ValidationError::DuplicateCode(self.code.clone()).into()
    }
}

/// Department with its live member count (API response)
#[derive(Clone, Debug, Serialize)]
pub struct DepartmentView {
    #[serde(flatten)]
    pub department: Model,
    pub employee_count: u64,
}
