//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::error::Result;
use crate::models::{NewPost, NewUser, Permission, Post, PostPatch, Role, RolePermission, User};

/// Data persistence contract for user accounts.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    /// Exact, case-sensitive match.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Inserts a user. A taken username fails with `AppError::Conflict`,
    /// an unknown `role_id` with `AppError::ValidationError`.
    async fn create_user(&self, user: NewUser) -> Result<User>;
}

/// Data persistence contract for posts.
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>>;

    /// Fails with `AppError::ValidationError` when `user_id` has no matching user.
    async fn create_post(&self, post: NewPost) -> Result<Post>;

    /// Returns `None` if the post does not exist.
    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>>;

    /// Returns `false` if nothing was deleted.
    async fn delete_post(&self, id: i64) -> Result<bool>;
}

/// Roles and permissions. Not reachable over HTTP.
#[async_trait]
pub trait RoleRepo: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<Role>>;
    async fn get_role(&self, id: i64) -> Result<Option<Role>>;
    async fn create_role(&self, name: &str) -> Result<Role>;
    async fn create_permission(&self, name: &str) -> Result<Permission>;
    async fn grant_permission(&self, role_id: i64, permission_id: i64) -> Result<RolePermission>;
    async fn list_role_permissions(&self, role_id: i64) -> Result<Vec<Permission>>;
}

/// Password hashing contract.
pub trait AuthProvider: Send + Sync {
    /// Produces a salted one-way hash suitable for storage.
    fn hash_password(&self, password: &str) -> Result<String>;

    /// Checks a plaintext password against a stored hash.
    /// An unparseable hash never verifies.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
