use axum::{Router, routing::get};
use gridcrate::{FieldDef, GridEntity, GridSource, grid_get, grid_post};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, FromQueryResult};
use serde::Serialize;

/// Plain row over the users table.
#[derive(Debug, FromQueryResult, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl GridSource for UserRow {
    fn grid() -> GridEntity {
        GridEntity::new("users u")
            .field(FieldDef::new("id", "u.id"))
            .field(FieldDef::new("name", "u.name").searchable())
            .field(FieldDef::new("email", "u.email").searchable())
            .field(FieldDef::new("age", "u.age"))
            .field(FieldDef::new("secret", "u.secret").filterable_only().skip())
            .default_sort("id", "ASC")
    }
}

/// Aggregated row: users joined with their order counts.
#[derive(Debug, FromQueryResult, Serialize)]
pub struct UserOrderSummary {
    pub id: i64,
    pub name: String,
    pub order_count: i64,
}

impl GridSource for UserOrderSummary {
    fn grid() -> GridEntity {
        GridEntity::new("users u")
            .field(FieldDef::new("id", "u.id"))
            .field(FieldDef::new("name", "u.name").searchable())
            .field(FieldDef::new("order_count", "order_count").filterable_only())
            .base_query(|select| {
                select
                    .columns(["u.id AS id", "u.name AS name", "COUNT(o.id) AS order_count"])
                    .join("LEFT JOIN orders o ON o.user_id = u.id")
                    .group_by("u.id");
            })
            .query_hook("order_count", |select, _, values| {
                select.having("COUNT(o.id) >= ?", values.to_vec());
            })
            .default_sort("id", "ASC")
    }
}

/// In-memory database with `user_count` users.
///
/// User `i` (1-based) is named `user{i:02}` with a matching email, age
/// `18 + i` and `i % 4` orders.
pub async fn seeded_db(user_count: i64) -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.execute_unprepared(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            age INTEGER NOT NULL,
            secret TEXT
        )",
    )
    .await
    .unwrap();
    db.execute_unprepared(
        "CREATE TABLE orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users (id)
        )",
    )
    .await
    .unwrap();

    for i in 1..=user_count {
        db.execute_unprepared(&format!(
            "INSERT INTO users (id, name, email, age) \
             VALUES ({i}, 'user{i:02}', 'user{i:02}@example.com', {})",
            18 + i
        ))
        .await
        .unwrap();
        for _ in 0..(i % 4) {
            db.execute_unprepared(&format!("INSERT INTO orders (user_id) VALUES ({i})"))
                .await
                .unwrap();
        }
    }

    db
}

pub fn user_grid_app(db: DatabaseConnection) -> Router {
    Router::new()
        .route(
            "/users/grid",
            get(grid_get::<UserRow>).post(grid_post::<UserRow>),
        )
        .with_state(db)
}
