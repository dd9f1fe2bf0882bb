//! SeaORM record storage

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::ActiveValue::{NotSet, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IdenStatic, Iterable, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait, Value,
};

use crate::entity::{department, employee};
use crate::error::{AppError, AppResult};
use crate::store::{Filter, Record, Repository, UnitOfWork};

/// Database-backed store, one instance serves every entity
#[derive(Clone)]
pub struct DbStore {
    db: DatabaseConnection,
}

impl DbStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn column<C: ColumnTrait>(field: &str, model: &str) -> AppResult<C> {
    C::iter()
        .find(|c| c.as_str() == field)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid field '{}' on {}", field, model)))
}

/// JSON scalar to a bindable value; `None` stands for NULL.
fn db_value(value: &serde_json::Value) -> AppResult<Option<Value>> {
    use serde_json::Value as Json;
    Ok(match value {
        Json::Null => None,
        Json::Bool(b) => Some((*b).into()),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Some(i.into()),
            None => Some(n.as_f64().unwrap_or_default().into()),
        },
        Json::String(s) => Some(s.clone().into()),
        Json::Array(_) | Json::Object(_) => {
            return Err(AppError::BadRequest(
                "Filter values must be scalars".to_string(),
            ))
        }
    })
}

/// Translate a filter into a SQL condition over the columns `C`.
fn condition<C: ColumnTrait>(filter: &Filter, model: &str) -> AppResult<Condition> {
    Ok(match filter {
        Filter::All => Condition::all(),
        Filter::Eq { field, value } => {
            let col = column::<C>(field, model)?;
            match db_value(value)? {
                Some(v) => Condition::all().add(col.eq(v)),
                None => Condition::all().add(col.is_null()),
            }
        }
        Filter::Ne { field, value } => {
            let col = column::<C>(field, model)?;
            match db_value(value)? {
                // NULL columns differ from any value
                Some(v) => Condition::any().add(col.ne(v)).add(col.is_null()),
                None => Condition::all().add(col.is_not_null()),
            }
        }
        Filter::Ilike { field, value } => {
            let col = column::<C>(field, model)?;
            let pattern = format!("%{}%", value.to_lowercase());
            Condition::all().add(Expr::expr(Func::lower(Expr::col(col))).like(pattern))
        }
        Filter::And(items) => {
            let mut cond = Condition::all();
            for item in items {
                cond = cond.add(condition::<C>(item, model)?);
            }
            cond
        }
        Filter::Or(items) => {
            let mut cond = Condition::any();
            for item in items {
                cond = cond.add(condition::<C>(item, model)?);
            }
            cond
        }
    })
}

/// A unique-index violation becomes the model's duplicate error.
fn write_error(err: DbErr, conflict: AppError) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => err.into(),
    }
}

macro_rules! db_repository {
    ($entity:ident) => {
        #[async_trait]
        impl Repository<$entity::Model> for DbStore {
            async fn create(&self, record: $entity::Model) -> AppResult<$entity::Model> {
                let conflict = record.duplicate_error();
                let mut active = record.into_active_model_set();
                active.id = NotSet;
                active
                    .insert(&self.db)
                    .await
                    .map_err(|e| write_error(e, conflict))
            }

            async fn read(&self, id: i64) -> AppResult<Option<$entity::Model>> {
                Ok($entity::Entity::find_by_id(id).one(&self.db).await?)
            }

            async fn update(&self, record: $entity::Model) -> AppResult<$entity::Model> {
                let id = record.id;
                let conflict = record.duplicate_error();
                let mut active = record.into_active_model_set();
                active.id = Unchanged(id);
                active.update(&self.db).await.map_err(|e| match e {
                    DbErr::RecordNotUpdated => {
                        AppError::not_found(<$entity::Model as Record>::MODEL, id)
                    }
                    other => write_error(other, conflict),
                })
            }

            async fn delete(&self, id: i64) -> AppResult<()> {
                let res = $entity::Entity::delete_by_id(id).exec(&self.db).await?;
                if res.rows_affected == 0 {
                    return Err(AppError::not_found(<$entity::Model as Record>::MODEL, id));
                }
                Ok(())
            }

            async fn search(
                &self,
                filter: &Filter,
                limit: Option<u64>,
            ) -> AppResult<Vec<$entity::Model>> {
                let cond = condition::<$entity::Column>(filter, <$entity::Model as Record>::MODEL)?;
                let mut query = $entity::Entity::find()
                    .filter(cond)
                    .order_by_asc($entity::Column::Id);
                if let Some(limit) = limit {
                    query = query.limit(limit);
                }
                Ok(query.all(&self.db).await?)
            }

            async fn count(&self, filter: &Filter) -> AppResult<u64> {
                let cond = condition::<$entity::Column>(filter, <$entity::Model as Record>::MODEL)?;
                Ok($entity::Entity::find().filter(cond).count(&self.db).await?)
            }
        }
    };
}

db_repository!(employee);
db_repository!(department);

#[async_trait]
impl UnitOfWork for DbStore {
    async fn delete_department(&self, id: i64) -> AppResult<u64> {
        // Dropping the transaction on an early return rolls it back
        let txn = self.db.begin().await?;

        let detached = employee::Entity::update_many()
            .col_expr(employee::Column::DepartmentId, Expr::value(Option::<i64>::None))
            .filter(employee::Column::DepartmentId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        let res = department::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(AppError::not_found(department::Model::MODEL, id));
        }

        txn.commit().await?;
        Ok(detached)
    }
}
