//! Generic axum handlers for grid endpoints.
//!
//! Two encodings of the same request model:
//!
//! - `GET ?_search=…&_filter:…` via [`grid_get`] (flat query parameters)
//! - `POST` with a JSON [`GridQuery`] body via [`grid_post`]
//!
//! Both are generic over the [`GridSource`] row type; [`grid_routes`] wires
//! them onto one path with the database connection as router state.
//!
//! ```rust,ignore
//! let app: Router = Router::new()
//!     .nest("/users/grid", grid_routes::<UserRow>())
//!     .with_state(db);
//! ```

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::errors::GridError;
use crate::models::{GridQuery, GridResponse};
use crate::params::parse_query_pairs;
use crate::traits::GridSource;

/// Handle a grid request encoded as flat query parameters.
pub async fn grid_get<T>(
    State(db): State<DatabaseConnection>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<GridResponse<T>>, GridError>
where
    T: GridSource + Serialize,
{
    let query = parse_query_pairs(&pairs)?;
    Ok(Json(T::fetch(&db, query).await?))
}

/// Handle a grid request with a JSON body.
pub async fn grid_post<T>(
    State(db): State<DatabaseConnection>,
    Json(query): Json<GridQuery>,
) -> Result<Json<GridResponse<T>>, GridError>
where
    T: GridSource + Serialize,
{
    Ok(Json(T::fetch(&db, query).await?))
}

/// Both handlers on one path, GET and POST.
pub fn grid_routes<T>() -> Router<DatabaseConnection>
where
    T: GridSource + Serialize + 'static,
{
    Router::new().route("/", get(grid_get::<T>).post(grid_post::<T>))
}
