//! Business rules for employees and departments
//!
//! Services own the write paths: they merge incoming fields, recompute
//! derived values, validate, and only then hand the record to storage.

use serde::{Deserialize, Deserializer};

pub mod department;
pub mod employee;

pub use department::{DepartmentFields, DepartmentService};
pub use employee::{EmployeeFields, EmployeeService};

/// Distinguishes a missing key (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Move every present field of `$src` onto `$dst`.
macro_rules! merge_fields {
    ($src:ident => $dst:ident; $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = $src.$field {
                $dst.$field = value;
            }
        )*
    };
}

pub(crate) use merge_fields;
