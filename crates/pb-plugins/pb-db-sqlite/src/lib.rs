//! # pb-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `pb-core` domain models.

use async_trait::async_trait;
use pb_core::error::{AppError, Result};
use pb_core::models::{NewPost, NewUser, Permission, Post, PostPatch, Role, RolePermission, User};
use pb_core::traits::{PostRepo, RoleRepo, UserRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;

/// Table definitions, applied in order. Safe to run on every start.
///
/// `AUTOINCREMENT` keeps ids strictly increasing: SQLite never hands out
/// the id of a deleted row again.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS roles (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS permissions (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS role_permissions (
        role_id       INTEGER NOT NULL REFERENCES roles(id),
        permission_id INTEGER NOT NULL REFERENCES permissions(id),
        PRIMARY KEY (role_id, permission_id)
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role_id  INTEGER REFERENCES roles(id)
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        title   TEXT NOT NULL,
        content TEXT NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id)
    )",
];

pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Opens (creating if missing) the database at `url` with foreign keys enforced.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(map_db_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(map_db_err)?;

        log::info!("connected to SQLite database at {url}");
        Ok(Self { pool })
    }

    /// A private in-memory database with the schema already applied.
    ///
    /// Every SQLite connection to `:memory:` gets its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(map_db_err)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(map_db_err)?;

        let repo = Self { pool };
        repo.init_schema().await?;
        Ok(repo)
    }

    /// Creates any missing tables.
    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(map_db_err)?;
        }
        log::info!("database schema ready");
        Ok(())
    }

    /// Waits for checked-out connections and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Maps driver failures onto the domain error taxonomy.
///
/// Constraint violations are the caller's fault; anything else is ours.
fn map_db_err(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::Conflict(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::ValidationError("referenced row does not exist".to_string());
        }
    }
    log::error!("database error: {err}");
    AppError::Internal(err.to_string())
}

fn row_to_user(row: &SqliteRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password")?,
        role_id: row.try_get("role_id")?,
    })
}

fn row_to_post(row: &SqliteRow) -> std::result::Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        user_id: row.try_get("user_id")?,
    })
}

fn row_to_role(row: &SqliteRow) -> std::result::Result<Role, sqlx::Error> {
    Ok(Role {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

fn row_to_permission(row: &SqliteRow) -> std::result::Result<Permission, sqlx::Error> {
    Ok(Permission {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl UserRepo for SqliteRepo {
    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT id, username, password, role_id FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.iter()
            .map(row_to_user)
            .collect::<std::result::Result<_, _>>()
            .map_err(map_db_err)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, password, role_id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.as_ref().map(row_to_user).transpose().map_err(map_db_err)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, password, role_id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.as_ref().map(row_to_user).transpose().map_err(map_db_err)
    }

    /// The UNIQUE constraint on `username` makes this atomic; no pre-check.
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (username, password, role_id) VALUES (?, ?, ?)")
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match map_db_err(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("username '{}' is already taken", user.username))
                }
                other => other,
            })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username,
            password_hash: user.password_hash,
            role_id: user.role_id,
        })
    }
}

#[async_trait]
impl PostRepo for SqliteRepo {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query("SELECT id, title, content, user_id FROM posts ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.iter()
            .map(row_to_post)
            .collect::<std::result::Result<_, _>>()
            .map_err(map_db_err)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT id, title, content, user_id FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.as_ref().map(row_to_post).transpose().map_err(map_db_err)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let result = sqlx::query("INSERT INTO posts (title, content, user_id) VALUES (?, ?, ?)")
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(Post {
            id: result.last_insert_rowid(),
            title: post.title,
            content: post.content,
            user_id: post.user_id,
        })
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>> {
        let Some(mut post) = self.get_post(id).await? else {
            return Ok(None);
        };
        patch.apply(&mut post);

        sqlx::query("UPDATE posts SET title = ?, content = ? WHERE id = ?")
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(Some(post))
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RoleRepo for SqliteRepo {
    async fn list_roles(&self) -> Result<Vec<Role>> {
        let rows = sqlx::query("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.iter()
            .map(row_to_role)
            .collect::<std::result::Result<_, _>>()
            .map_err(map_db_err)
    }

    async fn get_role(&self, id: i64) -> Result<Option<Role>> {
        let row = sqlx::query("SELECT id, name FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.as_ref().map(row_to_role).transpose().map_err(map_db_err)
    }

    async fn create_role(&self, name: &str) -> Result<Role> {
        let result = sqlx::query("INSERT INTO roles (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(Role { id: result.last_insert_rowid(), name: name.to_string() })
    }

    async fn create_permission(&self, name: &str) -> Result<Permission> {
        let result = sqlx::query("INSERT INTO permissions (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(Permission { id: result.last_insert_rowid(), name: name.to_string() })
    }

    async fn grant_permission(&self, role_id: i64, permission_id: i64) -> Result<RolePermission> {
        sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
            .bind(role_id)
            .bind(permission_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(RolePermission { role_id, permission_id })
    }

    async fn list_role_permissions(&self, role_id: i64) -> Result<Vec<Permission>> {
        let rows = sqlx::query(
            "SELECT p.id, p.name FROM permissions p
             JOIN role_permissions rp ON rp.permission_id = p.id
             WHERE rp.role_id = ? ORDER BY p.id"
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.iter()
            .map(row_to_permission)
            .collect::<std::result::Result<_, _>>()
            .map_err(map_db_err)
    }
}
