//! The [`GridSource`] trait and statement execution.
//!
//! Implementing [`GridSource`] for a row type ties it to one [`GridEntity`]
//! and gives it a ready-made `fetch` covering the whole pipeline: fit,
//! statement assembly, count and data execution, response envelope. Row
//! types derive `sea_orm::FromQueryResult` so arbitrary projections (joins,
//! aggregates) map onto them.
//!
//! ```rust,ignore
//! #[derive(FromQueryResult, Serialize)]
//! struct UserRow { id: Uuid, name: String, age: i64 }
//!
//! impl GridSource for UserRow {
//!     fn grid() -> GridEntity {
//!         GridEntity::new("users u")
//!             .field(FieldDef::new("name", "u.name").searchable())
//!             .field(FieldDef::new("age", "u.age"))
//!             .default_sort("name", "ASC")
//!     }
//! }
//! ```

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, Statement};

use crate::convert::ValueRegistry;
use crate::entity::GridEntity;
use crate::errors::GridError;
use crate::fit::fit;
use crate::models::{GridQuery, GridResponse};
use crate::query::build_statements;

/// A row type backed by one grid entity.
#[async_trait]
pub trait GridSource: FromQueryResult + Sized + Send + Sync {
    /// The entity configuration this row type is queried through.
    fn grid() -> GridEntity;

    /// The value registry used to convert filter values. Defaults to the
    /// built-in converters.
    fn registry() -> ValueRegistry {
        ValueRegistry::with_defaults()
    }

    /// Run one grid request end to end.
    async fn fetch(
        db: &DatabaseConnection,
        query: GridQuery,
    ) -> Result<GridResponse<Self>, GridError> {
        fetch_with(db, &Self::grid(), &Self::registry(), query).await
    }
}

/// Run one grid request against an explicit entity and registry.
///
/// Fits the query, builds both statements, executes the count first and the
/// page second, and assembles the response envelope with the request state
/// echoed back.
pub async fn fetch_with<T, C>(
    db: &C,
    entity: &GridEntity,
    registry: &ValueRegistry,
    mut query: GridQuery,
) -> Result<GridResponse<T>, GridError>
where
    T: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    fit(entity, registry, &mut query)?;
    let stmts = build_statements(entity, &query)?;
    let backend = db.get_database_backend();

    tracing::debug!(
        count_sql = %stmts.count_query,
        data_sql = %stmts.query,
        "executing grid statements"
    );

    let count_stmt =
        Statement::from_sql_and_values(backend, &stmts.count_query, stmts.count_args);
    let total = match db.query_one(count_stmt).await? {
        Some(row) => {
            let count: i64 = row.try_get_by_index(0).map_err(DbErr::from)?;
            u64::try_from(count).unwrap_or(0)
        }
        None => 0,
    };

    let data_stmt = Statement::from_sql_and_values(backend, &stmts.query, stmts.args);
    let items = T::find_by_statement(data_stmt).all(db).await?;

    let paging = crate::filtering::Paging::compute(query.paging, total);
    Ok(GridResponse {
        items,
        paging,
        search: query.search,
        sorter: query.sorter,
        filter: query.filter,
    })
}
