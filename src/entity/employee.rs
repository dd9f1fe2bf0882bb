//! Employee entity - employee master data
//!
//! Table: hr_employee

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{IdenStatic, Iterable};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::store::Record;
use crate::validation::ValidationError;

/// Placeholder employee code until a sequence value is assigned
pub const SENTINEL_CODE: &str = "New";

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(8))")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(4))")]
pub enum BloodGroup {
    #[sea_orm(string_value = "a+")]
    #[serde(rename = "a+")]
    APositive,
    #[sea_orm(string_value = "a-")]
    #[serde(rename = "a-")]
    ANegative,
    #[sea_orm(string_value = "b+")]
    #[serde(rename = "b+")]
    BPositive,
    #[sea_orm(string_value = "b-")]
    #[serde(rename = "b-")]
    BNegative,
    #[sea_orm(string_value = "o+")]
    #[serde(rename = "o+")]
    OPositive,
    #[sea_orm(string_value = "o-")]
    #[serde(rename = "o-")]
    ONegative,
    #[sea_orm(string_value = "ab+")]
    #[serde(rename = "ab+")]
    AbPositive,
    #[sea_orm(string_value = "ab-")]
    #[serde(rename = "ab-")]
    AbNegative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    #[sea_orm(string_value = "single")]
    Single,
    #[sea_orm(string_value = "married")]
    Married,
    #[sea_orm(string_value = "divorced")]
    Divorced,
    #[sea_orm(string_value = "widowed")]
    Widowed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeType {
    #[default]
    #[sea_orm(string_value = "permanent")]
    Permanent,
    #[sea_orm(string_value = "contract")]
    Contract,
    #[sea_orm(string_value = "intern")]
    Intern,
    #[sea_orm(string_value = "temporary")]
    Temporary,
}

/// Employment status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum ActiveStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "on_leave")]
    OnLeave,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

impl ActiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveStatus::Active => "active",
            ActiveStatus::Inactive => "inactive",
            ActiveStatus::OnLeave => "on_leave",
            ActiveStatus::Terminated => "terminated",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hr_employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Sequence-issued code, `New` until assigned. Unique among assigned
    /// codes through a partial index created at migration.
    #[sea_orm(column_type = "Text")]
    pub employee_code: String,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub job_title: Option<String>,

    // Contact
    #[sea_orm(column_type = "Text", nullable)]
    pub work_email: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub work_phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub personal_email: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub personal_mobile: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub emergency_contact_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub emergency_contact_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub current_address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub permanent_address: Option<String>,

    // Personal
    pub date_of_birth: Option<Date>,
    /// Derived from date_of_birth
    pub age: i32,
    pub gender: Option<Gender>,
    pub blood_group: Option<BloodGroup>,
    pub marital_status: Option<MaritalStatus>,

    // Employment
    pub date_of_joining: Option<Date>,
    pub employee_type: EmployeeType,
    /// Months
    pub probation_period: i32,
    pub confirmation_date: Option<Date>,
    /// Days
    pub notice_period: i32,

    // Professional
    #[sea_orm(column_type = "Text", nullable)]
    pub qualification: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub skills: Option<String>,
    /// Years
    pub previous_experience: f64,
    /// Derived from date_of_joining and previous_experience
    pub total_experience: f64,

    // Bank and tax
    #[sea_orm(column_type = "Text", nullable)]
    pub bank_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bank_account_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bank_ifsc_code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub pan_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub aadhar_number: Option<String>,

    // Status
    pub active_status: ActiveStatus,
    /// Enabled flag, kept in step with active_status by the status actions
    pub active: bool,

    #[sea_orm(nullable)]
    pub department_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

// Department membership is resolved through manual queries

impl ActiveModelBehavior for ActiveModel {}

/// A code other than the placeholder or blank text
pub fn is_assigned_code(code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code != SENTINEL_CODE
}

impl Model {
    /// Unsaved record carrying the field defaults.
    pub fn draft() -> Self {
        Self {
            id: 0,
            employee_code: SENTINEL_CODE.to_string(),
            name: String::new(),
            job_title: None,
            work_email: None,
            work_phone: None,
            personal_email: None,
            personal_mobile: None,
            emergency_contact_name: None,
            emergency_contact_number: None,
            current_address: None,
            permanent_address: None,
            date_of_birth: None,
            age: 0,
            gender: None,
            blood_group: None,
            marital_status: None,
            date_of_joining: None,
            employee_type: EmployeeType::default(),
            probation_period: 6,
            confirmation_date: None,
            notice_period: 30,
            qualification: None,
            skills: None,
            previous_experience: 0.0,
            total_experience: 0.0,
            bank_name: None,
            bank_account_number: None,
            bank_ifsc_code: None,
            pan_number: None,
            aadhar_number: None,
            active_status: ActiveStatus::default(),
            active: true,
            department_id: None,
        }
    }

    /// Whether a real code has been assigned; blank counts as unassigned.
    pub fn has_code(&self) -> bool {
        is_assigned_code(&self.employee_code)
    }

    /// Active model with every column marked for writing.
    pub fn into_active_model_set(self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id),
            employee_code: Set(self.employee_code),
            name: Set(self.name),
            job_title: Set(self.job_title),
            work_email: Set(self.work_email),
            work_phone: Set(self.work_phone),
            personal_email: Set(self.personal_email),
            personal_mobile: Set(self.personal_mobile),
            emergency_contact_name: Set(self.emergency_contact_name),
            emergency_contact_number: Set(self.emergency_contact_number),
            current_address: Set(self.current_address),
            permanent_address: Set(self.permanent_address),
            date_of_birth: Set(self.date_of_birth),
            age: Set(self.age),
            gender: Set(self.gender),
            blood_group: Set(self.blood_group),
            marital_status: Set(self.marital_status),
            date_of_joining: Set(self.date_of_joining),
            employee_type: Set(self.employee_type),
            probation_period: Set(self.probation_period),
            confirmation_date: Set(self.confirmation_date),
            notice_period: Set(self.notice_period),
            qualification: Set(self.qualification),
            skills: Set(self.skills),
            previous_experience: Set(self.previous_experience),
            total_experience: Set(self.total_experience),
            bank_name: Set(self.bank_name),
            bank_account_number: Set(self.bank_account_number),
            bank_ifsc_code: Set(self.bank_ifsc_code),
            pan_number: Set(self.pan_number),
            aadhar_number: Set(self.aadhar_number),
            active_status: Set(self.active_status),
            active: Set(self.active),
            department_id: Set(self.department_id),
        }
    }
}

impl Record for Model {
    const MODEL: &'static str = "Employee";

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
        self.has_code().then_some(self.employee_code.as_str())
    }

    fn duplicate_error(&self) -> AppError {
        ValidationError::DuplicateEmployeeCode(self.employee_code.clone()).into()
    }
}
