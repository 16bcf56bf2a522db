//! Repository functions for manipulating rows in the `users` table.
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// Application-level representation of a stored user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Determine whether a login is already registered.
pub async fn exists(db: &SqlitePool, login: &str) -> sqlx::Result<bool> {
    let cnt: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE login = ?")
        .bind(login)
        .fetch_one(db)
        .await?;
    Ok(cnt.0 > 0)
}

fn from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        login: row.get("login"),
        admin: row.get::<i64, _>("admin") != 0,
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

pub async fn find_by_login(db: &SqlitePool, login: &str) -> sqlx::Result<Option<User>> {
    let row = sqlx::query("SELECT id, login, admin, created_at FROM users WHERE login = ?")
        .bind(login)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
    let row = sqlx::query("SELECT id, login, admin, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().map(from_row))
}

/// Create a new user row.
pub async fn insert(db: &SqlitePool, login: &str, admin: bool) -> sqlx::Result<i64> {
    let res = sqlx::query("INSERT INTO users (login, admin, created_at) VALUES (?, ?, ?)")
        .bind(login)
        .bind(if admin { 1 } else { 0 })
        .bind(Utc::now())
        .execute(db)
        .await?;

    Ok(res.last_insert_rowid())
}

/// Grant or revoke administrator rights.
pub async fn set_admin(db: &SqlitePool, user_id: i64, admin: bool) -> sqlx::Result<()> {
    sqlx::query("UPDATE users SET admin = ? WHERE id = ?")
        .bind(if admin { 1 } else { 0 })
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}
